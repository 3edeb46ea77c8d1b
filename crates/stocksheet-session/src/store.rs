//! Keyed in-memory session store
//!
//! Each client owns one session-keyed ordered entry list. Append order is
//! the output order of a later generate call.
//!
//! # Concurrency
//!
//! The slot map is a `DashMap` (lock-free concurrent access across sessions).
//! Inside a slot, the entry list lives behind an `Arc<tokio::sync::Mutex>`:
//! `append` holds the lock for the duration of one push, while
//! `begin_generate` hands the *owned* guard to the caller, so a generate call
//! excludes appends and other generates for the same session for as long as
//! it keeps the guard. Different sessions never contend.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use stocksheet_core::{validate_session_id, Entry, Result, SessionId};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Owned, exclusive view of one session's entry list
///
/// Holding this guard is the per-session mutual-exclusion region for a
/// generate call. Dropping it without calling [`clear`](Vec::clear) leaves
/// the session untouched (failure path); clearing it through the guard is
/// the success path.
pub type EntrySnapshot = OwnedMutexGuard<Vec<Entry>>;

/// Session store contract
///
/// The store only accumulates and hands out entries; deciding *whether* to
/// clear a session belongs to the lifecycle manager holding the guard.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Append one entry to the session, creating the session lazily.
    ///
    /// Appends for the same session are serialized against each other and
    /// against any in-flight generate; appends for different sessions need
    /// no coordination.
    async fn append(&self, session_id: &str, entry: Entry) -> Result<()>;

    /// Acquire exclusive access to the session's entry list for one
    /// generate call. Creates the session lazily so that generating against
    /// a never-touched or already-cleared session yields an empty list, not
    /// an error.
    async fn begin_generate(&self, session_id: &str) -> Result<EntrySnapshot>;

    /// Number of entries currently accumulated for the session
    async fn entry_count(&self, session_id: &str) -> usize;

    /// Drop a session outright, returning its entries (eviction support)
    async fn remove(&self, session_id: &str) -> Option<Vec<Entry>>;
}

struct SessionSlot {
    entries: Arc<Mutex<Vec<Entry>>>,
    last_active: StdMutex<Instant>,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            last_active: StdMutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_active.lock() {
            *last = Instant::now();
        }
    }

    fn idle_for(&self) -> Duration {
        self.last_active
            .lock()
            .map(|last| last.elapsed())
            .unwrap_or_default()
    }
}

/// In-memory session store
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, Arc<SessionSlot>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Get or lazily create the slot for a session
    fn slot(&self, session_id: &str) -> Arc<SessionSlot> {
        let slot = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(SessionSlot::new()))
            .clone();
        slot.touch();
        slot
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Collect sessions idle past `ttl` whose entry list is not currently
    /// locked. A held lock means a generate is in flight; those sessions are
    /// never evicted mid-call.
    pub(crate) fn take_idle_sessions(&self, ttl: Duration) -> Vec<(SessionId, Vec<Entry>)> {
        let mut idle: Vec<SessionId> = Vec::new();
        for item in self.sessions.iter() {
            if item.value().idle_for() >= ttl && item.value().entries.try_lock().is_ok() {
                idle.push(item.key().clone());
            }
        }

        idle.into_iter()
            .filter_map(|session_id| self.try_evict(session_id, ttl))
            .collect()
    }

    /// Remove one session if it is still idle past `ttl` and its entry list
    /// is not locked.
    ///
    /// Both conditions are re-checked after the slot leaves the map: an
    /// append that fetched the slot before removal has already refreshed
    /// `last_active`, and an in-flight generate holds the lock. In either
    /// case the slot goes back untouched, so the racing call lands in a
    /// session the map still knows about.
    fn try_evict(&self, session_id: SessionId, ttl: Duration) -> Option<(SessionId, Vec<Entry>)> {
        let (_, slot) = self.sessions.remove(&session_id)?;

        let taken = if slot.idle_for() >= ttl {
            match slot.entries.try_lock() {
                Ok(mut entries) => Some(std::mem::take(&mut *entries)),
                Err(_) => None,
            }
        } else {
            None
        };

        match taken {
            Some(entries) => Some((session_id, entries)),
            None => {
                self.sessions.insert(session_id, slot);
                None
            }
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn append(&self, session_id: &str, entry: Entry) -> Result<()> {
        validate_session_id(session_id)?;
        let slot = self.slot(session_id);
        let mut entries = slot.entries.lock().await;
        entries.push(entry);
        tracing::debug!(
            session_id,
            entry_count = entries.len(),
            "appended entry to session"
        );
        Ok(())
    }

    async fn begin_generate(&self, session_id: &str) -> Result<EntrySnapshot> {
        validate_session_id(session_id)?;
        let slot = self.slot(session_id);
        Ok(slot.entries.clone().lock_owned().await)
    }

    async fn entry_count(&self, session_id: &str) -> usize {
        // Clone the slot out so no map shard lock is held across the await.
        let slot = match self.sessions.get(session_id) {
            Some(slot) => slot.value().clone(),
            None => return 0,
        };
        let entries = slot.entries.lock().await;
        entries.len()
    }

    async fn remove(&self, session_id: &str) -> Option<Vec<Entry>> {
        let (_, slot) = self.sessions.remove(session_id)?;
        let mut entries = slot.entries.lock().await;
        Some(std::mem::take(&mut *entries))
    }
}
