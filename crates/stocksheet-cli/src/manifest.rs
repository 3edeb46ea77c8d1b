//! Batch manifest parsing
//!
//! One entry per line: `barcode,stock-count[,photo-path]`. The stock count
//! may be empty (renders as N/A). Blank lines and `#` comments are skipped.

use anyhow::{bail, Context};
use bytes::Bytes;
use std::path::Path;
use stocksheet_core::EntrySubmission;

/// Parse a manifest file into submissions, loading photo bytes eagerly
pub fn load_manifest(path: &Path) -> anyhow::Result<Vec<EntrySubmission>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read manifest {}", path.display()))?;

    let mut submissions = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.splitn(3, ',');
        let barcode = fields.next().unwrap_or_default().trim();
        if barcode.is_empty() {
            bail!("line {}: missing barcode text", line_no + 1);
        }
        let stock_count = fields.next().map(str::trim).unwrap_or_default();
        let photo_path = fields.next().map(str::trim).filter(|p| !p.is_empty());

        let mut submission = EntrySubmission::new(barcode);
        if !stock_count.is_empty() {
            submission = submission.with_stock_count(stock_count);
        }
        if let Some(photo_path) = photo_path {
            let bytes = std::fs::read(photo_path)
                .with_context(|| format!("line {}: cannot read photo {photo_path}", line_no + 1))?;
            let original_name = Path::new(photo_path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("photo")
                .to_string();
            submission = submission.with_photo(Bytes::from(bytes), original_name);
        }
        submissions.push(submission);
    }

    Ok(submissions)
}
