//! Route handlers for the Tubelink API.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use tubelink_shared::errors::{InputError, TubelinkError};
use tubelink_shared::models::{DownloadRequest, DownloadResult, ErrorBody, Quality};
use tubelink_shared::validator;

use crate::AppState;

// ====== REQUEST TYPES ======

/// Raw download parameters, from the query string (GET) or JSON body (POST).
#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    pub url: Option<String>,
    pub quality: Option<String>,
}

// ====== DOWNLOAD ROUTES ======

/// GET /api/download — url and quality from the query string.
pub async fn download_get(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DownloadParams>,
) -> Result<Json<DownloadResult>, (StatusCode, Json<ErrorBody>)> {
    resolve_download(&state, params).await
}

/// POST /api/download — url and quality from the JSON body.
///
/// A missing or unparseable body is treated the same as a missing url.
pub async fn download_post(
    State(state): State<Arc<AppState>>,
    body: Option<Json<DownloadParams>>,
) -> Result<Json<DownloadResult>, (StatusCode, Json<ErrorBody>)> {
    let params = body.map(|Json(p)| p).unwrap_or_default();
    resolve_download(&state, params).await
}

/// OPTIONS /api/download — 200 with no body; the CORS layer adds headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any verb other than GET/POST/OPTIONS.
pub async fn method_not_allowed() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
}

// ====== RESOLVE PATH ======

/// Shared resolve path for GET and POST.
///
/// Once the URL has validated, this never fails: converter errors are
/// degraded to the static fallback result.
async fn resolve_download(
    state: &AppState,
    params: DownloadParams,
) -> Result<Json<DownloadResult>, (StatusCode, Json<ErrorBody>)> {
    let request = parse_request(params).map_err(error_response)?;

    match state.converter.convert(&request.url).await {
        Ok(link) => {
            info!("Resolved download: url={} title={}", request.url, link.title);
            Ok(Json(DownloadResult::converted(
                link.title,
                link.download_url,
                request.quality,
            )))
        }
        Err(e) => {
            warn!(
                "Converter failed for {}: {} (serving fallback)",
                request.url, e
            );
            Ok(Json(DownloadResult::fallback(&request.url, request.quality)))
        }
    }
}

/// Validate raw parameters into a [`DownloadRequest`].
fn parse_request(params: DownloadParams) -> Result<DownloadRequest, TubelinkError> {
    let url = params
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(InputError::MissingUrl)?;

    if !validator::is_valid_youtube_url(&url) {
        return Err(InputError::InvalidUrl.into());
    }

    let quality = params
        .quality
        .as_deref()
        .map(Quality::from_hint)
        .unwrap_or_default();

    Ok(DownloadRequest { url, quality })
}

/// Map an error to its HTTP response. Input errors carry their own wire
/// message; everything else collapses to the generic 500 body.
fn error_response(err: TubelinkError) -> (StatusCode, Json<ErrorBody>) {
    match &err {
        TubelinkError::Input(_) => (StatusCode::BAD_REQUEST, Json(ErrorBody::new(err.to_string()))),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("Internal server error")),
        ),
    }
}

/// Map an unexpected handler panic to the generic 500 body.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!("Unhandled panic in request handler: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("Internal server error")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::Converter;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    use tubelink_shared::models::fallback_link;

    /// App wired to a converter nothing listens on, so every upstream
    /// call fails fast and exercises the fallback path.
    fn test_app() -> Router {
        let state = Arc::new(AppState {
            converter: Converter::new("http://127.0.0.1:9/api/convert".to_string(), 1),
        });
        crate::app(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_without_url_is_rejected() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/download")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "No URL provided");
    }

    #[tokio::test]
    async fn get_with_invalid_url_is_rejected() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/download?url=https://vimeo.com/12345")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid YouTube URL");
    }

    #[tokio::test]
    async fn post_without_body_is_treated_as_missing_url() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/download")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No URL provided");
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/api/download")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn preflight_returns_ok_with_cors_headers() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/download")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn bare_options_still_returns_ok() {
        // Not a real preflight (no Origin header), so it reaches the handler.
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/download")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_fallback_success() {
        let url = "https://youtu.be/dQw4w9WgXcQ";
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/download")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(format!(
                        r#"{{"url":"{}","quality":"1080"}}"#,
                        url
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["downloadUrl"], fallback_link(url));
        assert_eq!(json["quality"], "1080");
        assert_eq!(json["format"], "mp4");
        assert_eq!(json["note"], "You will be redirected to download page");
        assert_eq!(json["degraded"], true);
    }

    #[tokio::test]
    async fn unknown_quality_hint_falls_back_to_default() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/download?url=https://youtu.be/dQw4w9WgXcQ&quality=4k")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["quality"], "720");
    }

    async fn boom() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn panics_map_to_internal_server_error() {
        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Internal server error");
    }
}
