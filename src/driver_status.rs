use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Error, Debug)]
pub enum StatusError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("WebDriver server returned {status} for {url}")]
    ServerError { status: u16, url: String },

    #[error("Unexpected status payload: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("WebDriver server is not ready: {0}")]
    NotReady(String),
}

/// Readiness reported by a WebDriver server's `/status` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStatus {
    pub ready: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
struct StatusEnvelope {
    value: DriverStatus,
}

/// Probes a WebDriver server before any browser session is opened
pub struct DriverStatusClient {
    client: Client,
    server_url: String,
}

impl DriverStatusClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            server_url: server_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the raw status, ready or not
    #[instrument(skip(self), fields(server = %self.server_url))]
    pub async fn status(&self) -> Result<DriverStatus, StatusError> {
        let url = format!("{}/status", self.server_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            return Err(StatusError::ServerError {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let envelope: StatusEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.value)
    }

    /// Succeeds only when the server accepts new sessions
    pub async fn check_ready(&self) -> Result<DriverStatus, StatusError> {
        let status = self.status().await?;
        if !status.ready {
            return Err(StatusError::NotReady(status.message));
        }
        info!("WebDriver server ready: {}", status.message);
        Ok(status)
    }
}
