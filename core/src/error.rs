//! Error types for the request client.
//!
//! # Design
//! A non-2xx response gets its own `Status` variant carrying the method, the
//! resolved URL, the status code and the parsed error body, so callers can
//! branch on it. Transport failures are kept apart in `Transport` with the
//! transport's own error as the source, untouched, so callers can downcast
//! to whatever the transport produced.

use serde_json::Value;

use crate::http::HttpMethod;
use crate::transport::TransportError;

/// Errors returned by `RequestClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The server answered with a status outside 200..=299.
    ///
    /// `body` holds the parsed JSON body. A body that is not JSON is kept as
    /// a JSON string and an empty body is `null`.
    #[error("{method} {url} failed with HTTP {status}")]
    Status {
        method: HttpMethod,
        url: String,
        status: u16,
        body: Value,
    },

    /// The transport could not complete the round trip.
    #[error("transport failed: {0}")]
    Transport(#[source] TransportError),

    /// The base URL and path did not resolve to an absolute URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A successful response body was not the JSON the caller asked for.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl RequestError {
    pub(crate) fn status_error(method: HttpMethod, url: String, status: u16, raw: &str) -> Self {
        let body = if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        };
        RequestError::Status {
            method,
            url,
            status,
            body,
        }
    }

    pub fn is_status(&self) -> bool {
        matches!(self, RequestError::Status { .. })
    }

    /// The HTTP status, for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The parsed error body, for `Status` errors.
    pub fn body(&self) -> Option<&Value> {
        match self {
            RequestError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}
