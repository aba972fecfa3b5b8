//! Transport-level request errors and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::cell::CellError;
use crate::timestamp::ParseTimestampError;

/// Why a timestamp request was refused.
///
/// The `Display` text of each variant is the exact response body.
#[derive(Debug, Error)]
pub enum TimestampRequestError {
    #[error("Only 'text/plain' content type is allowed")]
    UnsupportedMediaType,

    /// The request carried no body at all.
    #[error("body cannot be nil or empty")]
    MissingBody,

    #[error("failed to read the body")]
    UnreadableBody,

    #[error("failed to convert body to unix time")]
    InvalidTimestamp(#[from] ParseTimestampError),

    #[error("timestamp store unavailable: {0}")]
    Store(#[from] CellError),
}

impl TimestampRequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::MissingBody | Self::UnreadableBody | Self::InvalidTimestamp(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for TimestampRequestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Store(cause) = &self {
            tracing::error!(%status, error = %cause, "timestamp store unreachable");
        } else {
            let cause = std::error::Error::source(&self).map(ToString::to_string);
            tracing::warn!(%status, error = %self, ?cause, "rejecting timestamp request");
        }
        (status, self.to_string()).into_response()
    }
}
