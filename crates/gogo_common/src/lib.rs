//! Shared foundational types used across the gogo script runner.
//!
//! This crate provides the content [`Fingerprint`] used as cache identity and
//! small filesystem helpers shared by the cache and build crates.

#![warn(missing_docs)]

pub mod fs;
pub mod hash;

pub use fs::make_executable;
pub use hash::{Fingerprint, ParseFingerprintError, SHORT_LEN};

/// Name of the tool, used for cache and config directory namespaces.
pub const TOOL_NAME: &str = "gogo";

/// Version string reported by `gogo --ver`.
pub const TOOL_VERSION: &str = "gogo v0.1.0";
