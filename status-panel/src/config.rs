use crate::error::PanelError;
use parceltrack_common::DEFAULT_POLL_INTERVAL_MS;
use serde::Deserialize;
use std::time::Duration;

/// Configuration as supplied by the hosting dashboard, before validation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawPanelConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub poll_interval_minutes: Option<f64>,
}

/// Validated panel configuration. Immutable once accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    endpoint: String,
    poll_interval: Duration,
}

impl PanelConfig {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl TryFrom<RawPanelConfig> for PanelConfig {
    type Error = PanelError;

    fn try_from(raw: RawPanelConfig) -> Result<Self, Self::Error> {
        let endpoint = raw
            .endpoint
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or_else(|| {
                PanelError::Configuration(
                    "an 'endpoint' must be defined in the configuration".to_string(),
                )
            })?;

        let poll_interval = match raw.poll_interval_minutes {
            None => Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            Some(minutes) if minutes.is_finite() && minutes > 0.0 => {
                Duration::from_secs_f64(minutes * 60.0)
            }
            Some(minutes) => {
                return Err(PanelError::Configuration(format!(
                    "poll interval must be a positive number of minutes, got {minutes}"
                )));
            }
        };

        Ok(Self {
            endpoint,
            poll_interval,
        })
    }
}
