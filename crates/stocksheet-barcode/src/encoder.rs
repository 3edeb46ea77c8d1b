//! Code 128 encoding and rasterization

use crate::font;
use barcoders::sym::code128::Code128;
use image::{DynamicImage, GrayImage, Luma};
use std::io::Cursor;
use stocksheet_core::{Error, Result};

/// Fixed horizontal scale: pixels per barcode module
pub const MODULE_WIDTH_PX: u32 = 3;

/// Fixed bar height in pixels
pub const BAR_HEIGHT_PX: u32 = 90;

/// Quiet zone on each side, in modules
const QUIET_ZONE_MODULES: u32 = 10;

/// Caption glyph scale
const CAPTION_SCALE: u32 = 2;

/// Gap between bars and caption, plus bottom padding, in pixels
const CAPTION_PADDING_PX: u32 = 4;

/// Encode `text` as a Code 128 barcode and return PNG bytes
///
/// The raster includes quiet zones and the human-readable caption under the
/// bars. Fails with [`Error::Encoding`] when the text is empty or contains
/// characters outside the symbology.
pub fn encode(text: &str) -> Result<Vec<u8>> {
    if text.trim().is_empty() {
        return Err(Error::Encoding("barcode text is empty".to_string()));
    }

    // "\u{0181}" selects Code 128 character set B (full alphanumeric).
    let code = Code128::new(format!("\u{0181}{text}"))
        .map_err(|e| Error::Encoding(format!("cannot encode {text:?} as Code 128: {e}")))?;
    let modules = code.encode();

    let png = render(&modules, text)?;
    tracing::debug!(text, bytes = png.len(), "encoded barcode");
    Ok(png)
}

/// Rasterize the module pattern and caption into a PNG
fn render(modules: &[u8], caption: &str) -> Result<Vec<u8>> {
    let width = (modules.len() as u32 + 2 * QUIET_ZONE_MODULES) * MODULE_WIDTH_PX;
    let caption_band = font::GLYPH_HEIGHT * CAPTION_SCALE + 2 * CAPTION_PADDING_PX;
    let height = BAR_HEIGHT_PX + caption_band;

    let mut img = GrayImage::from_pixel(width, height, Luma([255u8]));

    for (idx, module) in modules.iter().enumerate() {
        if *module == 0 {
            continue;
        }
        let x0 = (QUIET_ZONE_MODULES + idx as u32) * MODULE_WIDTH_PX;
        for x in x0..x0 + MODULE_WIDTH_PX {
            for y in 0..BAR_HEIGHT_PX {
                img.put_pixel(x, y, Luma([0u8]));
            }
        }
    }

    // Caption is centered; text wider than the bars clips at the edges.
    font::draw_text_centered(
        &mut img,
        caption,
        BAR_HEIGHT_PX + CAPTION_PADDING_PX,
        CAPTION_SCALE,
    );

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| Error::Internal(format!("PNG serialization failed: {e}")))?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

    #[test]
    fn test_encode_produces_png() {
        let png = encode("ABC123").unwrap();
        assert!(png.len() > PNG_MAGIC.len());
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[test]
    fn test_encode_is_deterministic() {
        assert_eq!(encode("SKU-0042").unwrap(), encode("SKU-0042").unwrap());
    }

    #[test]
    fn test_different_inputs_differ() {
        assert_ne!(encode("AAA").unwrap(), encode("BBB").unwrap());
    }

    #[test]
    fn test_empty_text_is_an_encoding_error() {
        assert!(matches!(encode(""), Err(Error::Encoding(_))));
        assert!(matches!(encode("   "), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_unsupported_characters_are_an_encoding_error() {
        assert!(matches!(encode("héllo"), Err(Error::Encoding(_))));
        assert!(matches!(encode("日本語"), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_dimensions_grow_with_text_length() {
        let short = image::load_from_memory(&encode("AB").unwrap()).unwrap();
        let long = image::load_from_memory(&encode("ABCDEFGHIJ").unwrap()).unwrap();
        assert!(long.width() > short.width());
        assert_eq!(long.height(), short.height());
    }
}
