//! Lifecycle manager for the add-entry / generate operations

use crate::config::PipelineConfig;
use rand::RngCore;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use stocksheet_core::{
    validate_session_id, Entry, EntrySubmission, Error, GeneratedArtifacts, PhotoRef, PhotoUpload,
    Result,
};
use stocksheet_session::{spawn_eviction_task, EvictionTask, MemorySessionStore, SessionStore};

/// The two client-facing operations, transport-independent
///
/// One service instance owns the session store and the shared staging and
/// output directories. Generate calls for the same session are serialized by
/// the store's per-session guard; different sessions run fully concurrently.
pub struct InventoryService {
    store: Arc<MemorySessionStore>,
    config: PipelineConfig,
}

impl InventoryService {
    /// Create a service with a fresh in-memory store, bootstrapping the
    /// staging and output directories
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(MemorySessionStore::new()))
    }

    /// Create a service over an existing store
    pub fn with_store(config: PipelineConfig, store: Arc<MemorySessionStore>) -> Result<Self> {
        config.validate().map_err(Error::Validation)?;
        fs::create_dir_all(&config.staging_dir)?;
        fs::create_dir_all(&config.output_dir)?;
        Ok(Self { store, config })
    }

    /// The underlying session store
    pub fn store(&self) -> Arc<MemorySessionStore> {
        self.store.clone()
    }

    /// Spawn the background idle-session eviction task
    pub fn spawn_eviction(&self) -> EvictionTask {
        spawn_eviction_task(self.store.clone(), self.config.session.clone())
    }

    /// Append one entry to the caller's session
    ///
    /// Validation failures reject the submission before any session mutation
    /// or staging write. No artifact side effects.
    pub async fn add_entry(&self, session_id: &str, submission: EntrySubmission) -> Result<()> {
        validate_session_id(session_id)?;

        let barcode_text = submission.barcode_text.trim().to_string();
        if barcode_text.is_empty() {
            return Err(Error::Validation(
                "barcode text must not be empty".to_string(),
            ));
        }

        let mut entry = Entry::new(barcode_text, submission.stock_count);
        if let Some(upload) = &submission.photo {
            entry = entry.with_photo(self.stage_photo(upload).await?);
        }

        self.store.append(session_id, entry).await
    }

    /// Number of entries currently accumulated for a session
    pub async fn entry_count(&self, session_id: &str) -> usize {
        self.store.entry_count(session_id).await
    }

    /// Consume the current session snapshot into the two artifacts
    ///
    /// On success the session is cleared and both artifact paths are
    /// returned. On any stream-level failure the session is left untouched
    /// so the client can retry without data loss; partial outputs are
    /// removed best-effort.
    pub async fn generate(&self, session_id: &str) -> Result<GeneratedArtifacts> {
        validate_session_id(session_id)?;

        // Held for the whole call: excludes appends and other generates for
        // this session, leaves every other session untouched.
        let mut entries = self.store.begin_generate(session_id).await?;
        let snapshot: Vec<Entry> = entries.clone();

        let stem = generation_stem();
        let document_path = self.config.output_dir.join(format!("{stem}.pdf"));
        let archive_path = self.config.output_dir.join(format!("{stem}.zip"));

        tracing::info!(
            session_id,
            entries = snapshot.len(),
            stem,
            "starting generate"
        );

        let title = self.config.report_title.clone();
        let scratch_dir = self.config.staging_dir.clone();
        let doc_snapshot = snapshot.clone();
        let doc_out = document_path.clone();
        let document_task = tokio::task::spawn_blocking(move || {
            stocksheet_report::compose(&title, &doc_snapshot, &scratch_dir, &doc_out)
        });

        let zip_snapshot = snapshot.clone();
        let zip_out = archive_path.clone();
        let archive_task =
            tokio::task::spawn_blocking(move || stocksheet_archive::build(&zip_snapshot, &zip_out));

        // Join both writers; neither is cancelled when the other fails, so
        // transient cleanup inside each always runs.
        let (document_result, archive_result) = tokio::join!(document_task, archive_task);
        let document_result = document_result
            .map_err(|e| Error::Internal(format!("document task panicked: {e}")))?;
        let archive_result =
            archive_result.map_err(|e| Error::Internal(format!("archive task panicked: {e}")))?;

        let (report, photos_archived) = match (document_result, archive_result) {
            (Ok(report), Ok(photos_archived)) => (report, photos_archived),
            (doc, zip) => {
                // Aggregate failure: drop partial outputs, leave the session
                // untouched for a retry.
                let _ = fs::remove_file(&document_path);
                let _ = fs::remove_file(&archive_path);
                let error = doc.err().or(zip.err()).unwrap_or_else(|| {
                    Error::Internal("generate failed without an error".to_string())
                });
                tracing::error!(session_id, "generate failed: {}", error);
                return Err(error);
            }
        };

        // Both artifacts are durable: staged photos are no longer needed.
        self.delete_staged_photos(&snapshot);
        entries.clear();

        tracing::info!(
            session_id,
            document = %document_path.display(),
            archive = %archive_path.display(),
            blocks = report.blocks_rendered,
            skipped = report.blocks_skipped,
            photos_archived,
            "generate complete"
        );

        Ok(GeneratedArtifacts {
            document: document_path,
            archive: archive_path,
            report,
            photos_archived,
        })
    }

    /// Write uploaded photo bytes into the staging area under a unique name
    async fn stage_photo(&self, upload: &PhotoUpload) -> Result<PhotoRef> {
        let path = self
            .config
            .staging_dir
            .join(staged_photo_name(&upload.original_name));
        tokio::fs::write(&path, &upload.bytes).await?;
        Ok(PhotoRef {
            path,
            original_name: upload.original_name.clone(),
        })
    }

    /// Delete staged photos consumed by a successful generate
    fn delete_staged_photos(&self, snapshot: &[Entry]) {
        for entry in snapshot {
            if let Some(photo) = &entry.photo {
                if let Err(e) = fs::remove_file(&photo.path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(
                            path = %photo.path.display(),
                            "failed to delete consumed photo: {}",
                            e
                        );
                    }
                }
            }
        }
    }
}

/// Random suffix via OsRng, hex-encoded
fn random_suffix() -> String {
    let mut bytes = [0u8; 4];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Collision-free stem shared by both artifacts of one generate call
fn generation_stem() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%S");
    format!("report-{timestamp}-{}", random_suffix())
}

/// Unique staging name for an uploaded photo
fn staged_photo_name(original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());
    let millis = chrono::Utc::now().timestamp_millis();
    format!("photo-{millis}-{}.{extension}", random_suffix())
}
