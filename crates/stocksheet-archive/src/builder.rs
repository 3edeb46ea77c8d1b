//! Streaming ZIP writer

use crate::names::archive_entry_name;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use stocksheet_core::{Entry, Error, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Maximum DEFLATE compression
const COMPRESSION_LEVEL: i64 = 9;

/// Streaming archive writer
///
/// Writes to a `.tmp` sibling of the final path; `finish` seals the
/// container and renames it into place. Dropping an unfinished builder
/// removes the partial file.
pub struct ArchiveBuilder {
    writer: Option<ZipWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
    files: usize,
    finished: bool,
}

impl ArchiveBuilder {
    /// Create a new archive destined for `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let final_path = path.as_ref().to_path_buf();
        let mut temp_path = final_path.as_os_str().to_owned();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        let file = File::create(&temp_path)?;
        Ok(Self {
            writer: Some(ZipWriter::new(file)),
            temp_path,
            final_path,
            files: 0,
            finished: false,
        })
    }

    fn writer(&mut self) -> Result<&mut ZipWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| Error::Internal("archive writer already finished".to_string()))
    }

    /// Stream one photo file into the archive under `name`
    pub fn add_file(&mut self, source: &Path, name: &str) -> Result<()> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(COMPRESSION_LEVEL));

        let mut reader = File::open(source)?;
        let writer = self.writer()?;
        writer
            .start_file(name, options)
            .map_err(|e| Error::Archive(e.to_string()))?;
        io::copy(&mut reader, writer)?;
        self.files += 1;
        Ok(())
    }

    /// Seal the container and rename it into place
    ///
    /// Returns the number of files written.
    pub fn finish(mut self) -> Result<usize> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| Error::Internal("archive writer already finished".to_string()))?;
        let file = writer.finish().map_err(|e| Error::Archive(e.to_string()))?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.temp_path, &self.final_path)?;
        self.finished = true;

        tracing::debug!(
            archive = %self.final_path.display(),
            files = self.files,
            "archive sealed"
        );
        Ok(self.files)
    }
}

impl Drop for ArchiveBuilder {
    fn drop(&mut self) {
        if !self.finished {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

/// Build the photo archive for an entry snapshot
///
/// Every entry carrying a photo contributes exactly one file, in snapshot
/// order; entries without photos contribute nothing. Returns the number of
/// photos archived.
pub fn build(entries: &[Entry], out_path: &Path) -> Result<usize> {
    let mut builder = ArchiveBuilder::create(out_path)?;

    for (index, entry) in entries.iter().enumerate() {
        if let Some(photo) = &entry.photo {
            let name = archive_entry_name(index, &entry.barcode_text, &photo.original_name);
            builder.add_file(&photo.path, &name)?;
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use stocksheet_core::PhotoRef;
    use tempfile::TempDir;

    fn photo_entry(dir: &Path, barcode: &str, file_name: &str, bytes: &[u8]) -> Entry {
        let path = dir.join(file_name);
        fs::write(&path, bytes).unwrap();
        Entry::new(barcode, None).with_photo(PhotoRef {
            path,
            original_name: file_name.to_string(),
        })
    }

    fn open_archive(path: &Path) -> zip::ZipArchive<File> {
        zip::ZipArchive::new(File::open(path).unwrap()).unwrap()
    }

    #[test]
    fn test_archive_contains_exactly_the_photos() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("photos.zip");

        let entries = vec![
            photo_entry(dir.path(), "A-1", "a.png", b"photo a"),
            Entry::new("NO-PHOTO", None),
            photo_entry(dir.path(), "C-3", "c.jpg", b"photo c"),
        ];

        let count = build(&entries, &out).unwrap();
        assert_eq!(count, 2);

        let mut archive = open_archive(&out);
        assert_eq!(archive.len(), 2);

        let mut contents = Vec::new();
        archive
            .by_index(0)
            .unwrap()
            .read_to_end(&mut contents)
            .unwrap();
        assert_eq!(contents, b"photo a");
    }

    #[test]
    fn test_entries_use_deflate() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("photos.zip");

        let entries = vec![photo_entry(dir.path(), "A", "a.png", &[b'x'; 4096])];
        build(&entries, &out).unwrap();

        let mut archive = open_archive(&out);
        let file = archive.by_index(0).unwrap();
        assert_eq!(file.compression(), CompressionMethod::Deflated);
        assert!(file.compressed_size() < file.size());
    }

    #[test]
    fn test_no_photos_yields_valid_empty_archive() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("photos.zip");

        let entries = vec![Entry::new("A", None), Entry::new("B", None)];
        let count = build(&entries, &out).unwrap();

        assert_eq!(count, 0);
        assert_eq!(open_archive(&out).len(), 0);
    }

    #[test]
    fn test_duplicate_barcodes_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("photos.zip");

        let entries = vec![
            photo_entry(dir.path(), "SAME", "first.png", b"1"),
            photo_entry(dir.path(), "SAME", "second.png", b"2"),
        ];
        build(&entries, &out).unwrap();

        let archive = open_archive(&out);
        let names: Vec<_> = archive.file_names().collect();
        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);
    }

    #[test]
    fn test_missing_photo_file_fails_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("photos.zip");

        let entries = vec![Entry::new("GHOST", None).with_photo(PhotoRef {
            path: dir.path().join("missing.png"),
            original_name: "missing.png".to_string(),
        })];

        assert!(build(&entries, &out).is_err());
        assert!(!out.exists());
        assert!(!dir.path().join("photos.zip.tmp").exists());
    }
}
