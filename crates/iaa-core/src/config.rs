//! Process-level configuration for the auto-assigner.
//!
//! Per-build settings (default user, ignored users) come from the build's
//! [`AssignerFeature`](crate::domain::AssignerFeature); this struct only holds
//! what the surrounding service needs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Auto-assigner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignerConfig {
    /// Directory for persisted statistics.
    pub data_dir: PathBuf,

    /// Recipient of the per-build assignment report, if any.
    pub report_email: Option<String>,

    /// Base URL of the build server, used for links in reports.
    pub server_url: String,

    /// Emit JSON log lines.
    pub log_json: bool,
}

impl Default for AssignerConfig {
    fn default() -> Self {
        AssignerConfig {
            data_dir: std::env::var("IAA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".iaa")),
            report_email: std::env::var("IAA_REPORT_EMAIL")
                .ok()
                .filter(|email| !email.trim().is_empty()),
            server_url: std::env::var("IAA_SERVER_URL")
                .unwrap_or_else(|_| "http://localhost:8111".to_string()),
            log_json: std::env::var("IAA_LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

impl AssignerConfig {
    /// Create a config from environment variables.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Override the data directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Override the report recipient.
    pub fn with_report_email(mut self, email: &str) -> Self {
        self.report_email = Some(email.to_string());
        self
    }

    /// Override the server URL.
    pub fn with_server_url(mut self, url: &str) -> Self {
        self.server_url = url.trim_end_matches('/').to_string();
        self
    }
}
