//! Error taxonomy for the Tubelink system.

use thiserror::Error;

/// Top-level error type for Tubelink operations.
#[derive(Debug, Error)]
pub enum TubelinkError {
    #[error("{0}")]
    Input(#[from] InputError),

    #[error("upstream converter error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Request rejections caused by the caller. Never retried.
///
/// Display strings are the exact wire messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("No URL provided")]
    MissingUrl,

    #[error("Invalid YouTube URL")]
    InvalidUrl,
}

/// Failures of the external conversion service.
///
/// These never reach the caller as errors: the request layer converts
/// every one of them into a degraded fallback result.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("converter responded with status {0}")]
    Status(u16),

    #[error("converter returned invalid JSON: {0}")]
    MalformedBody(String),

    #[error("no download URL in response")]
    MissingDownloadUrl,

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),
}

/// Result type alias for Tubelink operations.
pub type TubelinkResult<T> = Result<T, TubelinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_render_wire_messages() {
        assert_eq!(InputError::MissingUrl.to_string(), "No URL provided");
        assert_eq!(InputError::InvalidUrl.to_string(), "Invalid YouTube URL");
    }

    #[test]
    fn umbrella_passes_input_message_through() {
        let err = TubelinkError::from(InputError::MissingUrl);
        assert_eq!(err.to_string(), "No URL provided");
    }

    #[test]
    fn umbrella_prefixes_upstream_errors() {
        let err = TubelinkError::from(UpstreamError::Status(503));
        assert_eq!(
            err.to_string(),
            "upstream converter error: converter responded with status 503"
        );
    }

    #[test]
    fn upstream_timeout_message() {
        assert_eq!(
            UpstreamError::Timeout(15).to_string(),
            "request timed out after 15s"
        );
    }
}
