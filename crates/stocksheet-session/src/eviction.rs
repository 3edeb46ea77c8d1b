//! Idle-session eviction
//!
//! Sessions that accumulate entries but never generate would otherwise pin
//! memory and staged photo files forever. A background task sweeps the store
//! periodically and drops sessions idle past the configured TTL, deleting
//! their staged photos (nothing can consume them anymore). Sessions with a
//! generate in flight are never evicted.

use crate::config::SessionConfig;
use crate::store::MemorySessionStore;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Statistics for one eviction sweep
#[derive(Debug, Clone, Copy, Default)]
pub struct EvictionStats {
    /// Sessions removed from the store
    pub sessions_evicted: u64,
    /// Staged photo files deleted
    pub photos_deleted: u64,
}

/// Run one eviction sweep over the store
pub fn run_sweep(store: &MemorySessionStore, idle_ttl: Duration) -> EvictionStats {
    let mut stats = EvictionStats::default();

    for (session_id, entries) in store.take_idle_sessions(idle_ttl) {
        stats.sessions_evicted += 1;

        for entry in &entries {
            if let Some(photo) = &entry.photo {
                match fs::remove_file(&photo.path) {
                    Ok(()) => stats.photos_deleted += 1,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        tracing::warn!(
                            session_id,
                            path = %photo.path.display(),
                            "failed to delete staged photo during eviction: {}",
                            e
                        );
                    }
                }
            }
        }

        tracing::info!(
            session_id,
            entries = entries.len(),
            "evicted idle session"
        );
    }

    stats
}

/// Handle for the background eviction task
pub struct EvictionTask {
    shutdown_tx: tokio::sync::mpsc::Sender<()>,
}

impl EvictionTask {
    /// Signal the eviction task to shutdown gracefully
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Spawn a background task that sweeps the store periodically
///
/// Returns an [`EvictionTask`] handle that can be used to shut the task down
/// gracefully.
pub fn spawn_eviction_task(store: Arc<MemorySessionStore>, config: SessionConfig) -> EvictionTask {
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);

    tokio::spawn(async move {
        let interval = Duration::from_secs(config.sweep_interval_minutes * 60);
        let idle_ttl = Duration::from_secs(config.idle_ttl_minutes * 60);

        tracing::info!(
            "Starting session eviction task (ttl: {}m, interval: {}m)",
            config.idle_ttl_minutes,
            config.sweep_interval_minutes
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Eviction task shutting down");
                    break;
                }
                _ = sleep(interval) => {
                    let stats = run_sweep(&store, idle_ttl);
                    if stats.sessions_evicted > 0 {
                        tracing::info!(
                            "Eviction sweep: {} sessions removed, {} staged photos deleted",
                            stats.sessions_evicted,
                            stats.photos_deleted
                        );
                    }
                }
            }
        }
    });

    EvictionTask { shutdown_tx }
}
