//! Stocksheet Session Store
//!
//! This crate provides per-client entry accumulation:
//! - The [`SessionStore`] contract and its in-memory implementation
//! - Per-session mutual exclusion for generate calls
//! - Idle-session eviction

pub mod config;
pub mod eviction;
pub mod store;

pub use config::SessionConfig;
pub use eviction::{spawn_eviction_task, EvictionStats, EvictionTask};
pub use store::{EntrySnapshot, MemorySessionStore, SessionStore};
