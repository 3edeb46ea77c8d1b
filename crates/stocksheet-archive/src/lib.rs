//! Stocksheet Archive Builder
//!
//! Streams uploaded photos into a ZIP container (DEFLATE at maximum
//! compression). Entry names are derived from sanitized identifiers, never
//! raw barcode text, and are collision-free within one archive. A snapshot
//! with no photos still produces a valid empty archive.

mod builder;
mod names;

pub use builder::{build, ArchiveBuilder};
pub use names::archive_entry_name;
