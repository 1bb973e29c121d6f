//! Transient user notifications.
//!
//! The web front-end appended notification elements to the page and
//! removed them on a timer; here they are plain values on the session
//! event stream, rendered by whatever front-end is attached.

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Error,
}

impl NotifyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyLevel::Info => "info",
            NotifyLevel::Success => "success",
            NotifyLevel::Error => "error",
        }
    }
}

/// A single transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotifyLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotifyLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotifyLevel::Error,
            message: message.into(),
        }
    }
}

/// The single generic message shown for any simulated download failure.
pub const DOWNLOAD_FAILED: &str = "Download failed. Please try another video.";

/// Shown when a second download is requested while one is active.
pub const ALREADY_IN_PROGRESS: &str = "A download is already in progress";
