//! Content-addressed build cache.
//!
//! Each compiled program lives in its own entry directory named after the short
//! form of its source [`Fingerprint`](gogo_common::Fingerprint). An entry holds
//! a debug copy of the source, the executable, and a plain-text metadata
//! record. Entries are either complete or absent: population goes through a
//! [`PendingEntry`] that removes the directory unless it is committed.

#![warn(missing_docs)]

pub mod entry;
pub mod error;
pub mod metadata;
pub mod store;

pub use entry::{CacheEntry, ARTIFACT_NAME, METADATA_FILE, SOURCE_FILE};
pub use error::CacheError;
pub use metadata::BuildMetadata;
pub use store::{is_fresh, CacheStore, Lookup, MissReason, PendingEntry};
