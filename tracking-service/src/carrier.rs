use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const DHL_SEARCH_URL: &str = "https://www.dhl.de/int-verfolgen/data/search";
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const STATUS_UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CarrierError {
    #[error("carrier request failed: {0}")]
    Request(String),
    #[error("carrier returned HTTP {0}")]
    HttpStatus(u16),
    #[error("carrier response was not valid JSON: {0}")]
    Decode(String),
}

/// Status fields mined from one carrier response.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierUpdate {
    pub status: String,
    pub last_update: String,
    pub progress: Option<f64>,
    pub max_progress: Option<f64>,
}

/// The current local time in the carrier's timestamp format.
pub fn local_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Client for the public DHL shipment search endpoint.
///
/// The endpoint expects a browser-looking request, hence the header set.
pub struct DhlClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for DhlClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DhlClient {
    pub fn new() -> Self {
        Self::with_base_url(DHL_SEARCH_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn fetch(&self, tracking_number: &str) -> Result<CarrierUpdate, CarrierError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("piececode", tracking_number), ("language", "de")])
            .header(
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36",
            )
            .header("Accept", "application/json, text/javascript, */*; q=0.01")
            .header("Accept-Language", "de-DE,de;q=0.9,en-US;q=0.8,en;q=0.7")
            .header("Referer", "https://www.dhl.de/int-verfolgen/")
            .header("Connection", "keep-alive")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|error| CarrierError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CarrierError::HttpStatus(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|error| CarrierError::Decode(error.to_string()))?;
        Ok(mine_shipment_status(&payload, local_timestamp()))
    }
}

/// Extract the current status from the carrier's nested response shape:
/// `sendungen[0].sendungsdetails.sendungsverlauf`. Missing pieces degrade
/// to an unknown status stamped with the fallback time.
fn mine_shipment_status(payload: &Value, fallback_time: String) -> CarrierUpdate {
    let progression = payload
        .get("sendungen")
        .and_then(Value::as_array)
        .and_then(|shipments| shipments.first())
        .and_then(|shipment| shipment.get("sendungsdetails"))
        .and_then(|details| details.get("sendungsverlauf"));

    match progression {
        Some(progression) => CarrierUpdate {
            status: progression
                .get("aktuellerStatus")
                .and_then(Value::as_str)
                .unwrap_or(STATUS_UNKNOWN)
                .to_string(),
            last_update: progression
                .get("datumAktuellerStatus")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(fallback_time),
            progress: progression.get("fortschritt").and_then(Value::as_f64),
            max_progress: progression
                .get("maximalFortschritt")
                .and_then(Value::as_f64),
        },
        None => CarrierUpdate {
            status: STATUS_UNKNOWN.to_string(),
            last_update: fallback_time,
            progress: None,
            max_progress: None,
        },
    }
}
