//! Fixed layout geometry, all in millimeters on US-Letter pages
//!
//! The cursor always advances by [`ROW_STEP_MM`] per entry regardless of how
//! tall the rendered images actually are. Simpler and more robust than
//! measuring content, at the cost of whitespace under small images.

/// Page width (US Letter)
pub const PAGE_WIDTH_MM: f32 = 215.9;

/// Page height (US Letter)
pub const PAGE_HEIGHT_MM: f32 = 279.4;

/// Margin on all sides
pub const MARGIN_MM: f32 = 15.0;

/// Vertical space reserved for the title block on the first page
pub const TITLE_BLOCK_MM: f32 = 18.0;

/// Title font size in points
pub const TITLE_FONT_SIZE: f32 = 25.0;

/// Body font size in points
pub const BODY_FONT_SIZE: f32 = 12.0;

/// Line height for the per-entry text lines
pub const TEXT_LINE_MM: f32 = 6.0;

/// Vertical space reserved for the two text lines of a block
pub const TEXT_BLOCK_MM: f32 = 2.0 * TEXT_LINE_MM;

/// Barcode bounding box (~200x100 pt), uniform scale-to-fit
pub const BARCODE_BOX_MM: (f32, f32) = (70.5, 35.3);

/// Photo bounding box (~200x150 pt), uniform scale-to-fit
pub const PHOTO_BOX_MM: (f32, f32) = (70.5, 52.9);

/// Gap between consecutive entry blocks
pub const ROW_GAP_MM: f32 = 10.0;

/// Content height of one block: text lines plus the taller bounding box
pub const BLOCK_HEIGHT_MM: f32 = TEXT_BLOCK_MM + PHOTO_BOX_MM.1;

/// Fixed cursor advance per entry
pub const ROW_STEP_MM: f32 = BLOCK_HEIGHT_MM + ROW_GAP_MM;

/// Left edge of the photo column
pub const PHOTO_COLUMN_MM: f32 = MARGIN_MM + BARCODE_BOX_MM.0 + 15.0;

/// Uniform scale factor that fits an image (at `dpi`) exactly inside the
/// box along its tighter axis; small images scale up, large ones down
pub fn fit_scale(px_w: usize, px_h: usize, box_mm: (f32, f32), dpi: f32) -> f32 {
    if px_w == 0 || px_h == 0 {
        return 1.0;
    }
    let natural_w = px_w as f32 * 25.4 / dpi;
    let natural_h = px_h as f32 * 25.4 / dpi;
    (box_mm.0 / natural_w).min(box_mm.1 / natural_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_preserves_aspect() {
        // 300 dpi, 300x150 px -> 25.4 x 12.7 mm natural size
        let scale = fit_scale(300, 150, (50.8, 50.8), 300.0);
        assert!((scale - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_fit_scale_bounded_by_tighter_axis() {
        // Tall image: height constrains
        let scale = fit_scale(100, 1000, BARCODE_BOX_MM, 300.0);
        let fitted_h = 1000.0 * 25.4 / 300.0 * scale;
        assert!(fitted_h <= BARCODE_BOX_MM.1 + 1e-3);
    }

    #[test]
    fn test_fit_scale_degenerate_image() {
        assert_eq!(fit_scale(0, 10, BARCODE_BOX_MM, 300.0), 1.0);
    }

    #[test]
    fn test_three_blocks_fit_a_page() {
        let usable = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;
        let first_page = usable - TITLE_BLOCK_MM;
        assert!(first_page >= 2.0 * ROW_STEP_MM + BLOCK_HEIGHT_MM);
        assert!(first_page < 3.0 * ROW_STEP_MM + BLOCK_HEIGHT_MM);
    }
}
