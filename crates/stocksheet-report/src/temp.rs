//! Drop-guarded transient image files
//!
//! Encoded barcode PNGs only live long enough to be embedded into the
//! document. The guard deletes the file when it goes out of scope, so the
//! file is gone on every exit path, embed failure included.

use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use stocksheet_core::Result;

pub(crate) struct TempImage {
    path: PathBuf,
}

impl TempImage {
    /// Write `bytes` to a uniquely named file under `dir`
    pub fn write(dir: &Path, bytes: &[u8]) -> Result<Self> {
        let mut suffix = [0u8; 8];
        rand::rngs::OsRng.fill_bytes(&mut suffix);
        let path = dir.join(format!("barcode-{}.png", hex::encode(suffix)));
        fs::write(&path, bytes)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    "failed to delete transient barcode image: {}",
                    e
                );
            }
        }
    }
}
