use metrics::counter;
use parceltrack_common::metrics::{failures, names};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info};

pub const SUPERVISOR_API: &str = "http://supervisor/core/api";
pub const TOKEN_ENV: &str = "SUPERVISOR_TOKEN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends persistent notifications through the supervisor API.
///
/// Sending is strictly best-effort: a missing token or a failed request
/// is logged and counted, never escalated.
pub struct Notifier {
    client: reqwest::Client,
    api_base: String,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_api_base(SUPERVISOR_API)
    }

    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    pub async fn status_changed(
        &self,
        tracking_number: &str,
        tracking_name: Option<&str>,
        old_status: &str,
        new_status: &str,
    ) {
        let Ok(token) = std::env::var(TOKEN_ENV) else {
            error!("no {TOKEN_ENV} found, notification will not be sent");
            return;
        };
        debug!(
            "using {TOKEN_ENV} ending with: {}",
            &token[token.len().saturating_sub(4)..]
        );

        let url = format!("{}/services/persistent_notification/create", self.api_base);
        let payload = json!({
            "title": "Parcel Tracker",
            "message": status_change_message(tracking_number, tracking_name, old_status, new_status),
        });

        let result = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => {
                counter!(names::NOTIFICATIONS_SENT).increment(1);
                info!("notification sent for {tracking_number}");
            }
            Err(error) => {
                counter!(
                    names::FAILURES,
                    &[failures::get_label(failures::FailureKind::NotificationFailed)]
                )
                .increment(1);
                error!("error sending notification for {tracking_number}: {error}");
            }
        }
    }
}

/// Prefers the package name over the raw tracking number.
fn status_change_message(
    tracking_number: &str,
    tracking_name: Option<&str>,
    old_status: &str,
    new_status: &str,
) -> String {
    let display_name = match tracking_name {
        Some(name) if !name.is_empty() => name,
        _ => tracking_number,
    };
    format!("Change for {display_name}: {old_status} → {new_status}")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn message_prefers_the_package_name() {
        let message = status_change_message("A1", Some("New shoes"), "In transport", "Delivered");
        assert_eq!(message, "Change for New shoes: In transport → Delivered");
    }

    #[test]
    fn message_falls_back_to_the_tracking_number() {
        let message = status_change_message("A1", None, "In transport", "Delivered");
        assert_eq!(message, "Change for A1: In transport → Delivered");

        let message = status_change_message("A1", Some(""), "In transport", "Delivered");
        assert_eq!(message, "Change for A1: In transport → Delivered");
    }
}
