//! Tubelink Client
//!
//! Command-line stand-in for the web page: validates a YouTube URL,
//! runs the simulated download session, renders progress and
//! notifications, and persists the preferred quality between runs.

mod controller;
mod notify;
mod session;
mod settings;

use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use tubelink_shared::models::Quality;
use tubelink_shared::validator::{self, LinkKind};

use controller::{ControllerConfig, DownloadController};
use session::{Phase, SessionEvent};
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubelink_client=info".into()),
        )
        .init();

    let url = std::env::args().nth(1).unwrap_or_default();
    if url.is_empty() {
        eprintln!("Usage: tubelink-client <youtube-url> [quality]");
        std::process::exit(2);
    }

    // Config
    let settings_path = std::env::var("SETTINGS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./tubelink-settings.json"));
    let tick_ms: u64 = std::env::var("TICK_INTERVAL_MS")
        .unwrap_or_else(|_| "500".to_string())
        .parse()
        .unwrap_or(500);

    let mut settings = Settings::load(&settings_path);

    // An explicit quality argument overrides and replaces the saved
    // preference.
    if let Some(hint) = std::env::args().nth(2) {
        settings.quality = Quality::from_hint(&hint);
        settings.save(&settings_path)?;
    }

    // Shorts play best at the source resolution.
    let mut quality = settings.quality;
    if validator::classify(&url) == Some(LinkKind::Shorts) {
        quality = Quality::Best;
    }

    info!("Starting simulated download: url={} quality={}", url, quality);

    let ctrl = DownloadController::new(ControllerConfig {
        tick_interval: Duration::from_millis(tick_ms),
        ..ControllerConfig::default()
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = ctrl.start(&url, quality, tx);

    let mut exit_code = if session.is_some() { 0 } else { 1 };

    // Ctrl-C cancels cooperatively; the session winds down on its next
    // tick.
    if let Some(ctx) = &session {
        let cancel = ctx.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    while let Some(event) = rx.recv().await {
        match event {
            SessionEvent::Progress(p) => {
                if p.eta_seconds > 0 {
                    println!("[{:>3}%] {} ({}, eta {}s)", p.percent, p.status, p.speed, p.eta_seconds);
                } else {
                    println!("[{:>3}%] {}", p.percent, p.status);
                }
            }
            SessionEvent::Notice(n) => {
                println!("({}) {}", n.level.as_str(), n.message);
            }
            SessionEvent::Phase(phase) => match phase {
                Phase::Succeeded { result } => {
                    println!("{}: {}", result.title, result.download_url);
                    if let Some(note) = &result.note {
                        println!("Note: {}", note);
                    }
                }
                Phase::Failed { .. } => exit_code = 1,
                Phase::Canceled => {
                    println!("Download canceled");
                    exit_code = 130;
                }
                _ => {}
            },
        }
    }

    std::process::exit(exit_code);
}
