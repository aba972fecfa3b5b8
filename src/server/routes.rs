//! Axum route handlers for the timestamp server.
//!
//! # Routes
//!
//! - `GET  /timestamp` — Returns the stored value, e.g. `-62135596800`
//! - `POST /timestamp` — Parses the body as decimal unix seconds, returns `OK`

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap},
    middleware,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use super::error::TimestampRequestError;
use super::middleware::require_plain_text;
use crate::store::TimestampStore;
use crate::timestamp::TimestampValue;

/// Largest request body read before giving up. A decimal `i64` needs 20 bytes.
pub const MAX_BODY_BYTES: usize = 4 * 1024;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The one value this server exposes.
    pub store: TimestampStore,
}

impl AppState {
    pub fn new(store: TimestampStore) -> Self {
        Self { store }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/timestamp",
            get(get_timestamp_handler).post(set_timestamp_handler),
        )
        .layer(middleware::from_fn(require_plain_text))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /timestamp — current value as decimal seconds.
async fn get_timestamp_handler(
    State(state): State<AppState>,
) -> Result<String, TimestampRequestError> {
    let timestamp = state.store.get_timestamp().await?;
    Ok(timestamp.to_string())
}

/// POST /timestamp — store the decimal seconds in the body.
///
/// A body is *absent* when the request declares neither `Content-Length`
/// nor `Transfer-Encoding` and no bytes arrive. A declared empty body is
/// parsed like any other and fails conversion.
async fn set_timestamp_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<&'static str, TimestampRequestError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| TimestampRequestError::UnreadableBody)?;

    if bytes.is_empty() && !declares_body(&headers) {
        return Err(TimestampRequestError::MissingBody);
    }

    let timestamp: TimestampValue = String::from_utf8_lossy(&bytes).parse()?;
    state.store.set_timestamp(timestamp).await?;

    Ok("OK")
}

fn declares_body(headers: &HeaderMap) -> bool {
    headers.contains_key(header::CONTENT_LENGTH) || headers.contains_key(header::TRANSFER_ENCODING)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/timestamp")
            .header("Content-Type", "text/plain")
            .header("Content-Length", body.len())
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(content_type: &str) -> Request<Body> {
        Request::builder()
            .uri("/timestamp")
            .header("Content-Type", content_type)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_get_default_timestamp() {
        let app = app_router(AppState::new(TimestampStore::new()));

        let response = app.oneshot(get_request("text/plain")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "-62135596800");
    }

    #[tokio::test]
    async fn test_get_after_post() {
        let app = app_router(AppState::new(TimestampStore::new()));

        let response = app.clone().oneshot(post("1740863149")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");

        let response = app.oneshot(get_request("text/plain")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "1740863149");
    }

    #[tokio::test]
    async fn test_post_cases() {
        let state = AppState::new(TimestampStore::new());
        let app = app_router(state.clone());
        let bigger_than_i64 = format!("{}1", i64::MAX);

        let cases = [
            ("1740957796", StatusCode::OK, "OK"),
            ("1", StatusCode::OK, "OK"),
            (" -5\n", StatusCode::OK, "OK"),
            (
                bigger_than_i64.as_str(),
                StatusCode::BAD_REQUEST,
                "failed to convert body to unix time",
            ),
            ("", StatusCode::BAD_REQUEST, "failed to convert body to unix time"),
            (
                "1740--7796",
                StatusCode::BAD_REQUEST,
                "failed to convert body to unix time",
            ),
        ];

        for (input, status, expected) in cases {
            let response = app.clone().oneshot(post(input)).await.unwrap();
            assert_eq!(response.status(), status, "input {input:?}");
            assert_eq!(body_text(response).await, expected, "input {input:?}");
        }

        // Rejected bodies leave the last accepted value in place.
        let stored = state.store.get_timestamp().await.unwrap();
        assert_eq!(stored.unix_seconds(), -5);
    }

    #[tokio::test]
    async fn test_post_without_body() {
        let app = app_router(AppState::new(TimestampStore::new()));

        let request = Request::builder()
            .method("POST")
            .uri("/timestamp")
            .header("Content-Type", "text/plain")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "body cannot be nil or empty");
    }

    #[tokio::test]
    async fn test_post_chunked_empty_body_is_parsed() {
        let app = app_router(AppState::new(TimestampStore::new()));

        let request = Request::builder()
            .method("POST")
            .uri("/timestamp")
            .header("Content-Type", "text/plain")
            .header("Transfer-Encoding", "chunked")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "failed to convert body to unix time"
        );
    }

    #[tokio::test]
    async fn test_post_oversized_body() {
        let app = app_router(AppState::new(TimestampStore::new()));
        let huge = "1".repeat(MAX_BODY_BYTES + 1);

        let response = app.oneshot(post(&huge)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "failed to read the body");
    }

    #[tokio::test]
    async fn test_rejects_non_plain_text() {
        let app = app_router(AppState::new(TimestampStore::new()));

        let request = Request::builder()
            .method("POST")
            .uri("/timestamp")
            .header("Content-Type", "application/json")
            .body(Body::from("1740863149"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            body_text(response).await,
            "Only 'text/plain' content type is allowed"
        );

        let response = app
            .clone()
            .oneshot(get_request("application/json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let missing = Request::builder()
            .uri("/timestamp")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(missing).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_accepts_charset_parameter() {
        let app = app_router(AppState::new(TimestampStore::new()));

        let response = app
            .oneshot(get_request("text/plain; charset=utf-8"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_media_type_is_case_insensitive() {
        let app = app_router(AppState::new(TimestampStore::new()));

        let response = app.clone().oneshot(get_request("TEXT/Plain")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request("text/plainish")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_stopped_store_is_unavailable() {
        let store = TimestampStore::new();
        store.stop().await.unwrap();
        let app = app_router(AppState::new(store));

        let response = app.clone().oneshot(get_request("text/plain")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app.oneshot(post("1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
