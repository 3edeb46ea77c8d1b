//! Error types for Stocksheet Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing required entry fields. Rejected before any
    /// session mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The barcode encoder cannot render the given text. Never fatal to a
    /// generate call: the affected entry is skipped in the report.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Failure writing the PDF document stream. Fatal to the generate call.
    #[error("Document error: {0}")]
    Document(String),

    /// Failure writing the archive stream. Fatal to the generate call.
    #[error("Archive error: {0}")]
    Archive(String),

    // Session store errors
    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error aborts a whole generate call, as opposed to
    /// degrading a single entry.
    pub fn is_fatal_to_generate(&self) -> bool {
        !matches!(self, Error::Encoding(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
