//! Tubelink API Server
//!
//! Single-endpoint REST API that resolves a YouTube URL to a
//! downloadable link via an external conversion service, serving a
//! static fallback redirect whenever that service is unavailable.

mod converter;
mod routes;

use axum::http::{header, HeaderName, Method};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use converter::Converter;

/// Shared application state for all API handlers.
pub struct AppState {
    pub converter: Converter,
}

/// Build the application router with CORS and panic mapping applied.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers([
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            HeaderName::from_static("accept-version"),
            header::CONTENT_LENGTH,
            HeaderName::from_static("content-md5"),
            header::CONTENT_TYPE,
            header::DATE,
            HeaderName::from_static("x-api-version"),
        ]);

    Router::new()
        .route(
            "/api/download",
            get(routes::download_get)
                .post(routes::download_post)
                .options(routes::preflight)
                .fallback(routes::method_not_allowed),
        )
        .layer(CatchPanicLayer::custom(routes::handle_panic))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubelink_api=info,tower_http=info".into()),
        )
        .init();

    // Config
    let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let api_port: u16 = std::env::var("API_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let convert_api_url = std::env::var("CONVERT_API_URL")
        .unwrap_or_else(|_| "https://y2mate.guru/api/convert".to_string());
    let convert_timeout: u64 = std::env::var("CONVERT_TIMEOUT_SECS")
        .unwrap_or_else(|_| "15".to_string())
        .parse()
        .unwrap_or(15);

    // App state
    let state = Arc::new(AppState {
        converter: Converter::new(convert_api_url, convert_timeout),
    });

    // Bind
    let addr = format!("{}:{}", api_host, api_port);
    info!("Tubelink API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
