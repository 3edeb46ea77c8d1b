//! Pipeline configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stocksheet_session::SessionConfig;

/// Pipeline configuration
///
/// Both directories are process-wide shared resources: uploaded photos wait
/// in `staging_dir` until a generate consumes them, and finished artifacts
/// land in `output_dir` under collision-free names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Staging area for uploaded photos and transient barcode images
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Output area for generated documents and archives
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Title rendered at the top of every report
    #[serde(default = "default_report_title")]
    pub report_title: String,

    /// Session store tuning
    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            output_dir: default_output_dir(),
            report_title: default_report_title(),
            session: SessionConfig::default(),
        }
    }
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("staging")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_report_title() -> String {
    "Inventory Report".to_string()
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.staging_dir.as_os_str().is_empty() {
            return Err("staging_dir must not be empty".to_string());
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err("output_dir must not be empty".to_string());
        }
        if self.report_title.trim().is_empty() {
            return Err("report_title must not be empty".to_string());
        }
        self.session.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.report_title, "Inventory Report");
    }

    #[test]
    fn test_rejects_empty_dirs() {
        let config = PipelineConfig {
            staging_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
