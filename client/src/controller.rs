//! Simulated download engine.
//!
//! Drives the session phase machine on a fixed tick: the progress
//! counter advances by a random step each tick with cosmetic speed and
//! ETA values, no real transfer behind any of it. A semaphore with one
//! permit enforces the single-download-at-a-time rule the web front-end
//! kept in a global flag.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::{interval, sleep};
use tracing::{info, warn};
use uuid::Uuid;

use tubelink_shared::models::{DownloadResult, ProgressUpdate, Quality, DEFAULT_TITLE};
use tubelink_shared::validator;

use crate::notify::{Notification, ALREADY_IN_PROGRESS, DOWNLOAD_FAILED};
use crate::session::{Phase, SessionContext, SessionEvent};

/// Tuning knobs for the simulation.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Interval between progress ticks.
    pub tick_interval: Duration,
    /// Delay before the fallback attempt after a primary failure.
    pub fallback_delay: Duration,
    /// Force the primary attempt to fail, exercising the fallback path.
    pub fail_primary: bool,
    /// Force the fallback attempt to fail as well.
    pub fail_fallback: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(500),
            fallback_delay: Duration::from_secs(2),
            fail_primary: false,
            fail_fallback: false,
        }
    }
}

/// Owns the single-flight slot and spawns simulated sessions.
pub struct DownloadController {
    config: ControllerConfig,
    /// One permit: at most one session at a time.
    slot: Arc<Semaphore>,
}

impl DownloadController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Start a simulated download.
    ///
    /// Returns the session context immediately; progress and phase
    /// changes arrive on `events`. Returns `None` without starting a
    /// timer when validation fails or another session is active — the
    /// reason is reported as a notice on the event channel.
    pub fn start(
        &self,
        url: &str,
        quality: Quality,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Option<SessionContext> {
        let url = url.trim().to_string();

        let _ = events.send(SessionEvent::Phase(Phase::Validating));
        if url.is_empty() {
            let _ = events.send(SessionEvent::Notice(Notification::error(
                "Please enter a YouTube URL",
            )));
            return None;
        }
        if !validator::is_valid_youtube_url(&url) {
            let _ = events.send(SessionEvent::Notice(Notification::error(
                "Please enter a valid YouTube URL",
            )));
            return None;
        }

        let permit = match self.slot.clone().try_acquire_owned() {
            Ok(p) => p,
            Err(_) => {
                let _ = events.send(SessionEvent::Notice(Notification::error(
                    ALREADY_IN_PROGRESS,
                )));
                return None;
            }
        };

        let ctx = SessionContext::new(quality);
        let session = ctx.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            // Permit is held for the life of the session task.
            let _permit = permit;
            run_session(session, url, config, events).await;
        });

        Some(ctx)
    }
}

async fn run_session(
    ctx: SessionContext,
    url: String,
    config: ControllerConfig,
    events: mpsc::UnboundedSender<SessionEvent>,
) {
    info!("Session {} started for {}", ctx.id, url);

    match primary_attempt(&ctx, &config, &events).await {
        Ok(Some(result)) => {
            let elapsed = (Utc::now() - ctx.started_at).num_milliseconds();
            info!("Session {} finished in {}ms", ctx.id, elapsed);
            let _ = events.send(SessionEvent::Phase(Phase::Succeeded { result }));
        }
        Ok(None) => {
            info!("Session {} canceled", ctx.id);
            let _ = events.send(SessionEvent::Phase(Phase::Canceled));
        }
        Err(reason) => {
            warn!(
                "Session {} primary attempt failed: {} (trying fallback)",
                ctx.id, reason
            );
            let _ = events.send(SessionEvent::Progress(status_update(
                0,
                &format!("Error: {}", reason),
            )));

            tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => {
                    info!("Session {} canceled before fallback", ctx.id);
                    let _ = events.send(SessionEvent::Phase(Phase::Canceled));
                    return;
                }
                _ = sleep(config.fallback_delay) => {}
            }

            let _ = events.send(SessionEvent::Progress(status_update(
                10,
                "Trying alternative method...",
            )));

            match fallback_attempt(&ctx, &url, &config) {
                Ok(result) => {
                    let _ = events.send(SessionEvent::Progress(status_update(
                        100,
                        "Download complete!",
                    )));
                    let _ = events.send(SessionEvent::Phase(Phase::Succeeded { result }));
                }
                Err(reason) => {
                    let _ = events.send(SessionEvent::Progress(status_update(
                        0,
                        &format!("Failed: {}", reason),
                    )));
                    let _ = events.send(SessionEvent::Notice(Notification::error(DOWNLOAD_FAILED)));
                    let _ = events.send(SessionEvent::Phase(Phase::Failed { reason }));
                }
            }
        }
    }
}

/// Run the staged primary simulation. `Ok(None)` means canceled.
async fn primary_attempt(
    ctx: &SessionContext,
    config: &ControllerConfig,
    events: &mpsc::UnboundedSender<SessionEvent>,
) -> Result<Option<DownloadResult>, String> {
    let _ = events.send(SessionEvent::Progress(status_update(0, "Starting download...")));
    let _ = events.send(SessionEvent::Progress(status_update(
        5,
        "Getting video information...",
    )));

    if config.fail_primary {
        return Err("Failed to get video information".to_string());
    }

    let _ = events.send(SessionEvent::Progress(status_update(10, "Preparing download...")));
    let _ = events.send(SessionEvent::Phase(Phase::InProgress {
        percent: 10,
        speed: "--".to_string(),
        eta_seconds: 0,
    }));

    let mut percent: f64 = 10.0;
    let mut ticker = interval(config.tick_interval);
    // The first interval tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => return Ok(None),
            _ = ticker.tick() => {}
        }

        percent += rand::thread_rng().gen_range(5.0..15.0);
        if percent >= 100.0 {
            break;
        }

        let _ = events.send(SessionEvent::Progress(ProgressUpdate {
            // Displayed value caps at 99 until the counter completes.
            percent: (percent as u8).min(99),
            speed: random_speed(),
            status: "Downloading...".to_string(),
            eta_seconds: random_eta(),
        }));
    }

    let _ = events.send(SessionEvent::Progress(status_update(100, "Download complete!")));

    Ok(Some(DownloadResult::converted(
        DEFAULT_TITLE,
        mock_download_link(),
        ctx.quality,
    )))
}

/// Second, simpler attempt: no staged progress, just the redirect link.
fn fallback_attempt(
    ctx: &SessionContext,
    url: &str,
    config: &ControllerConfig,
) -> Result<DownloadResult, String> {
    if config.fail_fallback {
        return Err("All download methods failed".to_string());
    }
    Ok(DownloadResult::fallback(url, ctx.quality))
}

fn status_update(percent: u8, status: &str) -> ProgressUpdate {
    ProgressUpdate {
        percent,
        speed: "--".to_string(),
        status: status.to_string(),
        eta_seconds: 0,
    }
}

/// Cosmetic speed string for the progress display.
fn random_speed() -> String {
    let mbps: f64 = rand::thread_rng().gen_range(0.8..3.5);
    format!("{:.1} MB/s", mbps)
}

/// Cosmetic remaining-time value for the progress display.
fn random_eta() -> u32 {
    rand::thread_rng().gen_range(5..45)
}

/// Fabricated link shown when the simulation completes.
fn mock_download_link() -> String {
    format!("https://example.com/download/{}.mp4", Uuid::new_v4())
}
