use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;

/// A panel's single data source.
///
/// The production implementation is [`HttpSource`]; tests substitute
/// their own implementations behind this seam.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Issue one GET against the endpoint and decode the body as JSON.
    async fn fetch(&self) -> Result<Value, FetchError>;
}

/// Plain HTTP GET against the configured endpoint, no headers or body.
///
/// No timeout is applied; a hung request delays its own cycle only.
pub struct HttpSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl StatusSource for HttpSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|error| FetchError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|error| FetchError::Transport(error.to_string()))?;
        serde_json::from_str(&body).map_err(|error| FetchError::Decode(error.to_string()))
    }
}
