use parceltrack_common::DEFAULT_UPDATE_INTERVAL_MINUTES;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Service options as stored in the add-on options file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host_ip: String,
    /// Refresh cadence in minutes.
    pub update_interval: u64,
    pub notify_on_change: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host_ip: "127.0.0.1".to_string(),
            update_interval: DEFAULT_UPDATE_INTERVAL_MINUTES,
            notify_on_change: false,
        }
    }
}

impl ServiceConfig {
    /// Load options, falling back to defaults when the file is missing
    /// or unreadable. Never fails startup.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) => {
                warn!(
                    "could not read options file {}: {error}, using defaults",
                    path.display()
                );
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(error) => {
                warn!(
                    "invalid options file {}: {error}, using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }
}
