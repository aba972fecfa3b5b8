//! HTTP client for a running timestamp server.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use thiserror::Error;

use crate::timestamp::{ParseTimestampError, TimestampValue};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-200 status.
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("server returned an invalid timestamp: {0}")]
    InvalidTimestamp(#[from] ParseTimestampError),
}

/// Talks to `GET`/`POST /timestamp`, always as `text/plain`.
#[derive(Debug, Clone)]
pub struct TimestampClient {
    endpoint: String,
    http: reqwest::Client,
}

impl TimestampClient {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/timestamp", base_url.trim_end_matches('/')),
            http: reqwest::Client::new(),
        }
    }

    pub async fn get_timestamp(&self) -> Result<TimestampValue, ClientError> {
        let response = self
            .http
            .get(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .send()
            .await?;
        let body = ok_body(response).await?;
        Ok(body.parse()?)
    }

    pub async fn set_timestamp(&self, timestamp: TimestampValue) -> Result<(), ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(timestamp.to_string())
            .send()
            .await?;
        ok_body(response).await?;
        Ok(())
    }
}

async fn ok_body(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status != StatusCode::OK {
        return Err(ClientError::Status { status, body });
    }
    Ok(body)
}
