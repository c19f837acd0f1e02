//! Source unit representation, normalization and input loading.
//!
//! A [`SourceUnit`] is the immutable byte buffer of one Go program. Normalization
//! strips a leading `#!` interpreter line and checks that the program opens with a
//! `package` clause before it reaches the cache or build stages.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod normalize;
pub mod source_unit;

pub use error::SourceError;
pub use loader::{load_source, read_source, STDIN_NAME};
pub use normalize::{strip_leading_directive, validate_structure, DIRECTIVE_MARKER};
pub use source_unit::SourceUnit;
