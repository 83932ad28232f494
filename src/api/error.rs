//! Error types for API operations.

use reqwest::{Method, StatusCode};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the client and its services.
#[derive(Debug, Error)]
pub enum Error {
    /// The API answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ErrorResponse),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error(transparent)]
    InvalidArgument(#[from] ArgError),

    /// Network or HTTP client error.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON encoding or decoding error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API returned something the client could not make sense of.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A custom header name or value could not be used.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl Error {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(e) => Some(e.status),
            Error::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// An error reported by the API.
///
/// Most endpoints answer failures with `{"id": .., "message": .., "request_id": ..}`.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub method: Method,
    pub url: Url,
    pub status: StatusCode,
    /// Error message
    pub message: String,
    /// Request id, from the body or the `x-request-id` header
    pub request_id: String,
    /// Number of attempts made when retries are enabled, zero otherwise
    pub attempts: u32,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.method, self.url, self.status.as_u16())?;
        if !self.request_id.is_empty() {
            write!(f, " (request {:?})", self.request_id)?;
        }
        write!(f, " {}", self.message)?;
        if self.attempts > 0 {
            write!(f, "; giving up after {} attempt(s)", self.attempts)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorResponse {}

/// An invalid argument passed to a service method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{arg} is invalid because {reason}")]
pub struct ArgError {
    pub arg: String,
    pub reason: String,
}

impl ArgError {
    pub fn new(arg: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            arg: arg.into(),
            reason: reason.into(),
        }
    }
}

/// Reject an empty identifier before it ends up as an empty path segment.
pub(crate) fn require_non_empty(arg: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ArgError::new(arg, "cannot be empty").into());
    }
    Ok(())
}

/// Reject an id of zero or less.
pub(crate) fn require_positive(arg: &str, value: u64) -> Result<()> {
    if value < 1 {
        return Err(ArgError::new(arg, "cannot be less than 1").into());
    }
    Ok(())
}
