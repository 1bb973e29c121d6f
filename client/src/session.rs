//! Session state for a simulated download.
//!
//! The explicit phase machine replaces the pair of module-global flags
//! the web front-end relied on (`isDownloading` / `currentQuality`):
//! each session owns its context, quality, and cancellation token.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use tubelink_shared::models::{DownloadResult, ProgressUpdate, Quality};

use crate::notify::Notification;

/// Phase of a simulated download session.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Validating,
    InProgress {
        percent: u8,
        speed: String,
        eta_seconds: u32,
    },
    Succeeded {
        result: DownloadResult,
    },
    Failed {
        reason: String,
    },
    Canceled,
}

impl Phase {
    /// Whether the session still occupies the single-flight slot.
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Validating | Phase::InProgress { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Phase::Succeeded { .. } | Phase::Failed { .. } | Phase::Canceled
        )
    }
}

/// Context owned by one download session.
///
/// Cancellation is cooperative: cancelling the token is observed by the
/// session's next tick, not immediately.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub id: Uuid,
    pub quality: Quality,
    pub cancel: CancellationToken,
    pub started_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(quality: Quality) -> Self {
        Self {
            id: Uuid::new_v4(),
            quality,
            cancel: CancellationToken::new(),
            started_at: Utc::now(),
        }
    }
}

/// Events emitted by a running session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Phase transition.
    Phase(Phase),
    /// Per-tick progress snapshot.
    Progress(ProgressUpdate),
    /// Transient notification for the user.
    Notice(Notification),
}
