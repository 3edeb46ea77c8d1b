//! Stocksheet Pipeline
//!
//! The lifecycle manager behind the two client-facing operations:
//! - `add_entry`: validate, stage the photo, append to the caller's session
//! - `generate`: snapshot the session, drive the report composer and the
//!   archive builder concurrently, join both, clean up, and clear the
//!   session only on full success

pub mod config;
pub mod service;

pub use config::PipelineConfig;
pub use service::InventoryService;
