//! Stocksheet Core Types
//!
//! This crate provides the fundamental types used throughout Stocksheet:
//! - Inventory entry and artifact types
//! - Session identifiers
//! - Core error taxonomy

pub mod entry;
pub mod error;
pub mod session_id;

pub use entry::{Entry, EntrySubmission, GeneratedArtifacts, PhotoRef, PhotoUpload, ReportStats};
pub use error::{Error, Result};
pub use session_id::{validate_session_id, SessionId};
