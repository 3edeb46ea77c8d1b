//! Session store configuration

use serde::{Deserialize, Serialize};

/// Session store configuration
///
/// Sessions are created lazily on first touch and live in memory until a
/// successful generate clears them or the eviction sweep removes them after
/// `idle_ttl_minutes` without activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Evict sessions idle for longer than this many minutes
    #[serde(default = "default_idle_ttl_minutes")]
    pub idle_ttl_minutes: u64,

    /// Run the eviction sweep every N minutes
    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_minutes: default_idle_ttl_minutes(),
            sweep_interval_minutes: default_sweep_interval_minutes(),
        }
    }
}

fn default_idle_ttl_minutes() -> u64 {
    60
}

fn default_sweep_interval_minutes() -> u64 {
    10
}

impl SessionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.idle_ttl_minutes == 0 {
            return Err("idle_ttl_minutes must be greater than zero".to_string());
        }
        if self.sweep_interval_minutes == 0 {
            return Err("sweep_interval_minutes must be greater than zero".to_string());
        }
        Ok(())
    }
}
