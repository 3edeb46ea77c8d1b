//! Archive entry naming
//!
//! Raw barcode text is user-supplied: it may repeat across entries and may
//! contain path-unsafe characters. Names are built from a sanitized slug, a
//! 1-based snapshot index (the uniqueness guarantee) and a short digest of
//! the full text, plus the photo's original extension when it is safe.

use sha2::{Digest, Sha256};

const MAX_SLUG_LEN: usize = 40;
const MAX_EXT_LEN: usize = 8;

/// Derive the archive name for the photo of entry `index` (0-based within
/// the snapshot)
pub fn archive_entry_name(index: usize, barcode_text: &str, original_name: &str) -> String {
    let slug = sanitize_slug(barcode_text);
    let digest = hex::encode(&Sha256::digest(barcode_text.as_bytes())[..4]);
    let ext = sanitize_extension(original_name);
    format!("{:03}-{}-{}.{}", index + 1, slug, digest, ext)
}

fn sanitize_slug(text: &str) -> String {
    let slug: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_SLUG_LEN)
        .collect();

    if slug.chars().all(|c| c == '_') {
        "item".to_string()
    } else {
        slug
    }
}

fn sanitize_extension(original_name: &str) -> String {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("");

    if !ext.is_empty()
        && ext.len() <= MAX_EXT_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        ext.to_ascii_lowercase()
    } else {
        "bin".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_path_safe() {
        let name = archive_entry_name(0, "../../etc/passwd", "x.png");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_duplicate_barcodes_get_distinct_names() {
        let a = archive_entry_name(0, "SAME", "a.jpg");
        let b = archive_entry_name(1, "SAME", "b.jpg");
        assert_ne!(a, b);
    }

    #[test]
    fn test_index_is_one_based_and_padded() {
        let name = archive_entry_name(0, "ABC", "x.png");
        assert!(name.starts_with("001-ABC-"), "{name}");
    }

    #[test]
    fn test_unsafe_extension_falls_back() {
        let name = archive_entry_name(0, "ABC", "photo.p/ng");
        assert!(name.ends_with(".bin"));
        let name = archive_entry_name(0, "ABC", "noextension");
        assert!(name.ends_with(".bin"));
    }

    #[test]
    fn test_all_unsafe_text_uses_fallback_slug() {
        let name = archive_entry_name(2, "///", "x.png");
        assert!(name.starts_with("003-item-"), "{name}");
    }

    #[test]
    fn test_long_text_is_truncated() {
        let long = "X".repeat(200);
        let name = archive_entry_name(0, &long, "x.png");
        assert!(name.len() < 70, "{name}");
    }
}
