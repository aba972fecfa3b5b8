//! Content-type gate applied to every route.

use axum::extract::Request;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use super::error::TimestampRequestError;

const PLAIN_TEXT: &str = "text/plain";

/// Refuse any request whose media type is not `text/plain`.
///
/// Parameters such as `charset` are ignored. A missing header is refused
/// too, GET included.
pub async fn require_plain_text(
    request: Request,
    next: Next,
) -> Result<Response, TimestampRequestError> {
    let media = media_type(request.headers());
    if media.is_some_and(|media| media.eq_ignore_ascii_case(PLAIN_TEXT)) {
        return Ok(next.run(request).await);
    }

    tracing::debug!(content_type = ?media, "unsupported media type");
    Err(TimestampRequestError::UnsupportedMediaType)
}

fn media_type(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    value.split(';').next().map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::HeaderValue;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_media_type_strips_parameters() {
        assert_eq!(
            media_type(&headers_with("text/plain; charset=utf-8")),
            Some("text/plain")
        );
        assert_eq!(
            media_type(&headers_with("application/json")),
            Some("application/json")
        );
        assert_eq!(media_type(&HeaderMap::new()), None);
    }
}
