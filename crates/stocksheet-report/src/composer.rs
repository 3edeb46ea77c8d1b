//! Paginated PDF composition
//!
//! One pass over an entry snapshot: title block once, then a fixed-step
//! block per entry. Encoder failures skip the entry and the pass continues;
//! stream-level failures abort with a fatal error.

use crate::layout;
use crate::temp::TempImage;
use printpdf::{
    image_crate, BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference,
};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use stocksheet_core::{Entry, Error, ReportStats, Result};

const LAYER_NAME: &str = "content";
const IMAGE_DPI: f32 = 300.0;

/// State machine for one report
pub struct ReportComposer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    /// Vertical cursor, measured down from the page top
    cursor_mm: f32,
    pages: usize,
    stats: ReportStats,
}

impl ReportComposer {
    /// Start a new report with its title block on the first page
    pub fn new(title: &str) -> Result<Self> {
        let (doc, page, layer_idx) = PdfDocument::new(
            title,
            Mm(layout::PAGE_WIDTH_MM),
            Mm(layout::PAGE_HEIGHT_MM),
            LAYER_NAME,
        );
        let layer = doc.get_page(page).get_layer(layer_idx);

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| Error::Document(e.to_string()))?;
        let title_font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| Error::Document(e.to_string()))?;

        layer.use_text(
            title,
            layout::TITLE_FONT_SIZE,
            Mm(layout::MARGIN_MM),
            Mm(layout::PAGE_HEIGHT_MM - layout::MARGIN_MM - 8.0),
            &title_font,
        );

        Ok(Self {
            doc,
            layer,
            font,
            cursor_mm: layout::MARGIN_MM + layout::TITLE_BLOCK_MM,
            pages: 1,
            stats: ReportStats::default(),
        })
    }

    /// Record an entry skipped because its barcode failed to encode
    pub fn note_skipped(&mut self) {
        self.stats.blocks_skipped += 1;
    }

    /// Begin a new page when the next block would overflow the usable height
    fn ensure_room(&mut self) {
        let bottom_limit = layout::PAGE_HEIGHT_MM - layout::MARGIN_MM;
        if self.cursor_mm + layout::BLOCK_HEIGHT_MM <= bottom_limit {
            return;
        }

        let (page, layer_idx) = self.doc.add_page(
            Mm(layout::PAGE_WIDTH_MM),
            Mm(layout::PAGE_HEIGHT_MM),
            LAYER_NAME,
        );
        self.layer = self.doc.get_page(page).get_layer(layer_idx);
        self.pages += 1;
        self.cursor_mm = layout::MARGIN_MM;
    }

    /// Render one entry block: text lines, barcode image on the left, photo
    /// (when present) on the right at the same vertical offset.
    ///
    /// The block lands atomically on one page, and the cursor advances by
    /// the fixed row step regardless of rendered image heights.
    pub fn add_entry_block(&mut self, entry: &Entry, barcode_png: &Path) -> Result<()> {
        self.ensure_room();

        let block_top = layout::PAGE_HEIGHT_MM - self.cursor_mm;
        let (barcode_line, stock_line) = entry_lines(entry);
        self.layer.use_text(
            barcode_line,
            layout::BODY_FONT_SIZE,
            Mm(layout::MARGIN_MM),
            Mm(block_top - layout::TEXT_LINE_MM),
            &self.font,
        );
        self.layer.use_text(
            stock_line,
            layout::BODY_FONT_SIZE,
            Mm(layout::MARGIN_MM),
            Mm(block_top - 2.0 * layout::TEXT_LINE_MM),
            &self.font,
        );

        let images_top = block_top - layout::TEXT_BLOCK_MM;

        // The barcode PNG is our own freshly written temp file; failing to
        // read it back is a stream-level fault, not an entry-level one.
        let barcode = image_crate::open(barcode_png)
            .map_err(|e| Error::Document(format!("cannot read barcode image: {e}")))?;
        self.place_image(barcode, layout::MARGIN_MM, images_top, layout::BARCODE_BOX_MM);

        if let Some(photo) = &entry.photo {
            match image_crate::open(&photo.path) {
                Ok(img) => {
                    self.place_image(img, layout::PHOTO_COLUMN_MM, images_top, layout::PHOTO_BOX_MM);
                }
                Err(e) => {
                    // Unreadable upload degrades the photo only; the entry
                    // block still renders.
                    tracing::warn!(
                        barcode = %entry.barcode_text,
                        photo = %photo.path.display(),
                        "skipping unreadable photo: {}",
                        e
                    );
                }
            }
        }

        self.cursor_mm += layout::ROW_STEP_MM;
        self.stats.blocks_rendered += 1;
        Ok(())
    }

    /// Place an image with its top-left corner at (`left`, `top`), scaled
    /// uniformly into `box_mm`
    fn place_image(&self, img: image_crate::DynamicImage, left: f32, top: f32, box_mm: (f32, f32)) {
        let image = Image::from_dynamic_image(&img);
        let px_w = image.image.width.0;
        let px_h = image.image.height.0;
        let scale = layout::fit_scale(px_w, px_h, box_mm, IMAGE_DPI);
        let scaled_h = px_h as f32 * 25.4 / IMAGE_DPI * scale;

        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(left)),
                translate_y: Some(Mm(top - scaled_h)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
    }

    /// Seal the document and write it to `out_path` (write to a `.tmp`
    /// sibling, then rename)
    pub fn finish(mut self, out_path: &Path) -> Result<ReportStats> {
        self.stats.pages = self.pages;
        let stats = self.stats;

        let mut temp_path = out_path.as_os_str().to_owned();
        temp_path.push(".tmp");
        let temp_path = std::path::PathBuf::from(temp_path);

        let file = fs::File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        if let Err(e) = self.doc.save(&mut writer) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::Document(e.to_string()));
        }
        drop(writer);
        fs::rename(&temp_path, out_path)?;

        tracing::debug!(
            document = %out_path.display(),
            blocks = stats.blocks_rendered,
            skipped = stats.blocks_skipped,
            pages = stats.pages,
            "report sealed"
        );
        Ok(stats)
    }
}

/// The two text lines written for an entry block, in top-down order
fn entry_lines(entry: &Entry) -> (String, String) {
    (
        format!("Barcode: {}", entry.barcode_text),
        format!("Stock Count: {}", entry.display_stock_count()),
    )
}

/// Compose a full report for an entry snapshot
///
/// Encoder calls run sequentially in snapshot order, so block order in the
/// document always matches insertion order. Transient barcode PNGs are
/// written under `scratch_dir` and removed as soon as each block is placed,
/// on failure paths included.
pub fn compose(
    title: &str,
    entries: &[Entry],
    scratch_dir: &Path,
    out_path: &Path,
) -> Result<ReportStats> {
    fs::create_dir_all(scratch_dir)?;
    let mut composer = ReportComposer::new(title)?;

    for entry in entries {
        let png = match stocksheet_barcode::encode(&entry.barcode_text) {
            Ok(png) => png,
            Err(e) if !e.is_fatal_to_generate() => {
                tracing::warn!(
                    barcode = %entry.barcode_text,
                    "skipping entry with unencodable barcode: {}",
                    e
                );
                composer.note_skipped();
                continue;
            }
            Err(e) => return Err(e),
        };

        let temp = TempImage::write(scratch_dir, &png)?;
        composer.add_entry_block(entry, temp.path())?;
        // `temp` drops here: the transient PNG is gone right after embedding.
    }

    composer.finish(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(text: &str, count: Option<&str>) -> Entry {
        Entry::new(text, count.map(String::from))
    }

    fn scratch_is_empty(dir: &Path) -> bool {
        fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn test_compose_renders_all_entries() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.pdf");
        let scratch = dir.path().join("scratch");

        let entries = vec![entry("ABC123", Some("5")), entry("DEF456", Some(""))];
        let stats = compose("Inventory Report", &entries, &scratch, &out).unwrap();

        assert_eq!(stats.blocks_rendered, 2);
        assert_eq!(stats.blocks_skipped, 0);
        assert_eq!(stats.pages, 1);

        let bytes = fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(scratch_is_empty(&scratch));
    }

    #[test]
    fn test_entry_lines_render_count_and_na_fallback() {
        let (barcode, stock) = entry_lines(&entry("ABC123", Some("5")));
        assert_eq!(barcode, "Barcode: ABC123");
        assert_eq!(stock, "Stock Count: 5");

        let (barcode, stock) = entry_lines(&entry("DEF456", Some("")));
        assert_eq!(barcode, "Barcode: DEF456");
        assert_eq!(stock, "Stock Count: N/A");
    }

    #[test]
    fn test_unencodable_entry_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.pdf");
        let scratch = dir.path().join("scratch");

        let entries = vec![
            entry("GOOD-1", None),
            entry("日本語", None),
            entry("GOOD-2", None),
        ];
        let stats = compose("Inventory Report", &entries, &scratch, &out).unwrap();

        assert_eq!(stats.blocks_rendered, 2);
        assert_eq!(stats.blocks_skipped, 1);
        assert!(out.exists());
        assert!(scratch_is_empty(&scratch));
    }

    #[test]
    fn test_blocks_paginate_without_splitting() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.pdf");
        let scratch = dir.path().join("scratch");

        let entries: Vec<Entry> = (0..8).map(|i| entry(&format!("ITEM-{i:03}"), None)).collect();
        let stats = compose("Inventory Report", &entries, &scratch, &out).unwrap();

        assert_eq!(stats.blocks_rendered, 8);
        // 3 blocks fit per page with the fixed row step.
        assert_eq!(stats.pages, 3);
    }

    #[test]
    fn test_empty_snapshot_yields_title_only_document() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.pdf");
        let scratch = dir.path().join("scratch");

        let stats = compose("Inventory Report", &[], &scratch, &out).unwrap();

        assert_eq!(stats.blocks_rendered, 0);
        assert_eq!(stats.pages, 1);
        assert!(out.exists());
    }

    #[test]
    fn test_photo_is_placed_alongside() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.pdf");
        let scratch = dir.path().join("scratch");

        let photo_path = dir.path().join("photo.png");
        fs::write(&photo_path, stocksheet_barcode::encode("PHOTO").unwrap()).unwrap();

        let entries = vec![entry("WITH-PHOTO", Some("3")).with_photo(stocksheet_core::PhotoRef {
            path: photo_path,
            original_name: "shelf.png".to_string(),
        })];
        let stats = compose("Inventory Report", &entries, &scratch, &out).unwrap();
        assert_eq!(stats.blocks_rendered, 1);
    }

    #[test]
    fn test_corrupt_photo_degrades_photo_only() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.pdf");
        let scratch = dir.path().join("scratch");

        let photo_path = dir.path().join("photo.png");
        fs::write(&photo_path, b"not an image").unwrap();

        let entries = vec![entry("BROKEN-PHOTO", None).with_photo(stocksheet_core::PhotoRef {
            path: photo_path,
            original_name: "broken.png".to_string(),
        })];
        let stats = compose("Inventory Report", &entries, &scratch, &out).unwrap();
        assert_eq!(stats.blocks_rendered, 1);
        assert_eq!(stats.blocks_skipped, 0);
    }

    #[test]
    fn test_write_failure_leaves_no_transient_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("no-such-dir").join("report.pdf");
        let scratch = dir.path().join("scratch");

        let entries = vec![entry("ABC123", None)];
        let result = compose("Inventory Report", &entries, &scratch, &out);

        assert!(result.is_err());
        assert!(scratch_is_empty(&scratch));
    }
}
