//! Inventory entries and generated artifacts
//!
//! An [`Entry`] is one barcode + stock count + optional photo accumulated in
//! a session. Entries are created by `add_entry`, are immutable afterwards,
//! and are owned by their session until a generate call consumes a snapshot
//! of them.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Display value used when a stock count is absent or blank
pub const STOCK_COUNT_FALLBACK: &str = "N/A";

/// Reference to an uploaded photo staged on disk, owned by one entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoRef {
    /// Location in the staging area
    pub path: PathBuf,

    /// Filename as submitted by the client (display only, never used as a
    /// disk or archive name)
    pub original_name: String,
}

/// One accumulated inventory entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    /// Text to encode as a barcode (non-empty, validated at intake)
    pub barcode_text: String,

    /// Stock count as submitted. `None` when absent or blank.
    pub stock_count: Option<String>,

    /// Uploaded photo, if the client attached one
    pub photo: Option<PhotoRef>,
}

impl Entry {
    /// Create an entry without a photo
    pub fn new(barcode_text: impl Into<String>, stock_count: Option<String>) -> Self {
        Self {
            barcode_text: barcode_text.into(),
            stock_count: normalize_stock_count(stock_count),
            photo: None,
        }
    }

    /// Attach a staged photo
    pub fn with_photo(mut self, photo: PhotoRef) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Stock count as rendered in the report (`"N/A"` when absent)
    pub fn display_stock_count(&self) -> &str {
        self.stock_count.as_deref().unwrap_or(STOCK_COUNT_FALLBACK)
    }
}

/// Normalize a submitted stock count: blank strings collapse to `None`
pub fn normalize_stock_count(stock_count: Option<String>) -> Option<String> {
    stock_count
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Photo payload submitted alongside an entry, before staging
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Raw image bytes
    pub bytes: Bytes,

    /// Filename as submitted by the client
    pub original_name: String,
}

/// Intake form for `add_entry`
#[derive(Debug, Clone, Default)]
pub struct EntrySubmission {
    pub barcode_text: String,
    pub stock_count: Option<String>,
    pub photo: Option<PhotoUpload>,
}

impl EntrySubmission {
    pub fn new(barcode_text: impl Into<String>) -> Self {
        Self {
            barcode_text: barcode_text.into(),
            stock_count: None,
            photo: None,
        }
    }

    pub fn with_stock_count(mut self, stock_count: impl Into<String>) -> Self {
        self.stock_count = Some(stock_count.into());
        self
    }

    pub fn with_photo(mut self, bytes: Bytes, original_name: impl Into<String>) -> Self {
        self.photo = Some(PhotoUpload {
            bytes,
            original_name: original_name.into(),
        });
        self
    }
}

/// Per-report rendering statistics
///
/// Surfaced so callers and tests can observe partial degradation (skipped
/// entries) without parsing the PDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    /// Entry blocks rendered into the document
    pub blocks_rendered: usize,

    /// Entries skipped because their barcode text failed to encode
    pub blocks_skipped: usize,

    /// Total pages in the document
    pub pages: usize,
}

/// Handles to the two outputs of one successful generate call
#[derive(Debug, Clone)]
pub struct GeneratedArtifacts {
    /// Paginated PDF report
    pub document: PathBuf,

    /// Compressed photo archive
    pub archive: PathBuf,

    /// Rendering statistics for the document
    pub report: ReportStats,

    /// Number of photos written into the archive
    pub photos_archived: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_stock_count_present() {
        let entry = Entry::new("ABC123", Some("5".to_string()));
        assert_eq!(entry.display_stock_count(), "5");
    }

    #[test]
    fn test_display_stock_count_blank_falls_back() {
        let entry = Entry::new("DEF456", Some("   ".to_string()));
        assert_eq!(entry.display_stock_count(), "N/A");

        let entry = Entry::new("DEF456", None);
        assert_eq!(entry.display_stock_count(), "N/A");
    }

    #[test]
    fn test_stock_count_is_trimmed() {
        let entry = Entry::new("ABC", Some(" 12 ".to_string()));
        assert_eq!(entry.display_stock_count(), "12");
    }

    #[test]
    fn test_submission_builder() {
        let submission = EntrySubmission::new("XYZ-1")
            .with_stock_count("7")
            .with_photo(Bytes::from_static(b"png"), "shelf.png");

        assert_eq!(submission.barcode_text, "XYZ-1");
        assert_eq!(submission.stock_count.as_deref(), Some("7"));
        assert_eq!(
            submission.photo.as_ref().map(|p| p.original_name.as_str()),
            Some("shelf.png")
        );
    }
}
