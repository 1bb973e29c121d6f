//! Request and response types shared across the Tubelink crates.

use serde::{Deserialize, Serialize};

/// Title used when the conversion service does not return one.
pub const DEFAULT_TITLE: &str = "YouTube Video";

/// Note attached to degraded results.
pub const FALLBACK_NOTE: &str = "You will be redirected to download page";

/// Static redirect template served when the conversion service fails.
pub const FALLBACK_TEMPLATE: &str = "https://en.savefrom.net/18/#url=";

/// Nominal resolution hint selected by the user.
///
/// Accepted and echoed back on results, never enforced against the
/// actual media behind the returned link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Quality {
    #[serde(rename = "360")]
    Q360,
    #[serde(rename = "480")]
    Q480,
    #[default]
    #[serde(rename = "720")]
    Q720,
    #[serde(rename = "1080")]
    Q1080,
    #[serde(rename = "best")]
    Best,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Q360 => "360",
            Quality::Q480 => "480",
            Quality::Q720 => "720",
            Quality::Q1080 => "1080",
            Quality::Best => "best",
        }
    }

    /// Parse a user-supplied hint. Trailing "p" suffixes are tolerated;
    /// unknown hints fall back to the default so the wire never carries
    /// values outside the enum.
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().trim_end_matches('p') {
            "360" => Quality::Q360,
            "480" => Quality::Q480,
            "720" => Quality::Q720,
            "1080" => Quality::Q1080,
            "best" => Quality::Best,
            other => {
                tracing::warn!("Unknown quality hint {:?}, using default", other);
                Quality::default()
            }
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated download request.
///
/// Constructed only after the URL has passed the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    #[serde(default)]
    pub quality: Quality,
}

/// Outcome of a resolve attempt, shown to the caller once and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResult {
    pub success: bool,
    pub title: String,
    pub download_url: String,
    pub quality: Quality,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Set when the link is the static redirect rather than a converted
    /// one, so callers can tell the two apart.
    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl DownloadResult {
    /// Result carrying a link returned by the conversion service.
    pub fn converted(
        title: impl Into<String>,
        download_url: impl Into<String>,
        quality: Quality,
    ) -> Self {
        Self {
            success: true,
            title: title.into(),
            download_url: download_url.into(),
            quality,
            format: "mp4".to_string(),
            note: None,
            degraded: false,
        }
    }

    /// Degraded result pointing at the static redirect for the video.
    pub fn fallback(original_url: &str, quality: Quality) -> Self {
        Self {
            success: true,
            title: DEFAULT_TITLE.to_string(),
            download_url: fallback_link(original_url),
            quality,
            format: "mp4".to_string(),
            note: Some(FALLBACK_NOTE.to_string()),
            degraded: true,
        }
    }
}

/// Build the static redirect link for a video URL.
pub fn fallback_link(url: &str) -> String {
    format!("{}{}", FALLBACK_TEMPLATE, urlencoding::encode(url))
}

/// JSON error payload returned for input and internal failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Progress snapshot emitted by a simulated download session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub percent: u8,
    pub speed: String,
    pub status: String,
    pub eta_seconds: u32,
}
