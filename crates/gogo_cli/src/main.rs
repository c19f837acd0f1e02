//! gogo: run Go source files like scripts.
//!
//! Reads a program from a file or standard input, compiles it with the `go`
//! toolchain and runs it. Builds are cached by source content so unchanged
//! programs start without recompiling.

#![warn(missing_docs)]

mod logging;
mod pipeline;

use std::error::Error;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use gogo_common::TOOL_VERSION;
use gogo_config::{load_config, load_default_config, Action, RunConfig, RunMode, ToolConfig};

/// gogo: run Go code like a script.
#[derive(Parser, Debug)]
#[command(name = "gogo", disable_version_flag = true, about = "Run Go code like a script")]
pub struct Cli {
    /// Go source file to run. Reads standard input when omitted.
    pub file: Option<PathBuf>,

    /// Compile and run without saving to the cache.
    #[arg(long)]
    pub once: bool,

    /// Remove all cached binaries.
    #[arg(long)]
    pub clear: bool,

    /// Print the version.
    #[arg(long = "ver", short = 'V', visible_alias = "version")]
    pub ver: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `config.toml` file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

impl Cli {
    /// Builds the run configuration from the parsed flags.
    ///
    /// Version takes precedence over clear, which takes precedence over running.
    pub fn run_config(&self) -> RunConfig {
        let action = if self.ver {
            Action::PrintVersion
        } else if self.clear {
            Action::ClearCache
        } else {
            Action::Run {
                input: self.file.clone(),
            }
        };
        let color = match self.color {
            ColorChoice::Auto => std::io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };
        RunConfig {
            action,
            mode: if self.once { RunMode::Once } else { RunMode::Cached },
            quiet: self.quiet,
            verbose: self.verbose,
            color,
        }
    }
}

/// Accepts the single-dash spellings `-once`, `-clear` and `-ver` as well.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(flag @ ("-once" | "-clear" | "-ver")) => OsString::from(format!("-{flag}")),
            _ => arg,
        })
        .collect()
}

fn load_tool_config(path: Option<&Path>) -> Result<ToolConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => load_default_config()?,
    };
    Ok(config)
}

fn run(cli: &Cli) -> Result<i32, Box<dyn Error>> {
    let config = cli.run_config();
    logging::init(&config);

    match &config.action {
        Action::PrintVersion => {
            println!("{TOOL_VERSION}");
            Ok(0)
        }
        Action::ClearCache => {
            let tool = load_tool_config(cli.config.as_deref())?;
            Ok(pipeline::clear_cache(&tool))
        }
        Action::Run { input } => {
            let tool = load_tool_config(cli.config.as_deref())?;
            pipeline::run_program(input.as_deref(), &config, &tool)
        }
    }
}

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
