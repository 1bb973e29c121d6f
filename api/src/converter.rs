//! Client for the external conversion service.
//!
//! One outbound POST per request: `{url, format}` in, `{success,
//! downloadUrl, title?}` out. The service is unauthenticated and its
//! schema is outside our control, so every failure mode maps to an
//! [`UpstreamError`] for the route layer to degrade.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use tubelink_shared::errors::UpstreamError;
use tubelink_shared::models::DEFAULT_TITLE;

/// Container format requested from the converter. Fixed: quality hints
/// are not forwarded.
const TARGET_FORMAT: &str = "mp4";

/// Browser-style agent string; the converter rejects the default one.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Request body for the conversion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertRequest<'a> {
    pub url: &'a str,
    pub format: &'a str,
}

/// Response body from the conversion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "downloadUrl")]
    pub download_url: Option<String>,
    pub title: Option<String>,
}

/// A usable link extracted from a converter response.
#[derive(Debug, Clone)]
pub struct ConvertedLink {
    pub download_url: String,
    pub title: String,
}

/// HTTP client wrapper for the conversion service.
pub struct Converter {
    http: reqwest::Client,
    api_url: String,
    timeout_secs: u64,
}

impl Converter {
    pub fn new(api_url: String, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            api_url,
            timeout_secs,
        }
    }

    /// Ask the conversion service for a downloadable link.
    pub async fn convert(&self, url: &str) -> Result<ConvertedLink, UpstreamError> {
        let body = ConvertRequest {
            url,
            format: TARGET_FORMAT,
        };

        let resp = self
            .http
            .post(&self.api_url)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let data: ConvertResponse = resp
            .json()
            .await
            .map_err(|e| UpstreamError::MalformedBody(e.to_string()))?;

        debug!(
            "Converter response: success={} title={:?}",
            data.success, data.title
        );

        match (data.success, data.download_url) {
            (true, Some(download_url)) => Ok(ConvertedLink {
                download_url,
                title: data.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            }),
            _ => Err(UpstreamError::MissingDownloadUrl),
        }
    }

    fn map_transport(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout_secs)
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}
