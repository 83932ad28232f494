//! Response wrapper shared by every service call

use super::links::Links;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub const HEADER_RATE_LIMIT: &str = "ratelimit-limit";
pub const HEADER_RATE_REMAINING: &str = "ratelimit-remaining";
pub const HEADER_RATE_RESET: &str = "ratelimit-reset";
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Generic information about a list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub total: u64,
}

/// Rate limit state reported by the API on every response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rate {
    /// Requests allowed per hour
    pub limit: i64,
    /// Requests left in the current window
    pub remaining: i64,
    /// When the window resets
    pub reset: Option<DateTime<Utc>>,
}

impl Rate {
    /// Parse the `RateLimit-*` headers. Missing or malformed headers leave the field at zero.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let int = |name: &str| -> Option<i64> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<i64>().ok())
        };

        Self {
            limit: int(HEADER_RATE_LIMIT).unwrap_or(0),
            remaining: int(HEADER_RATE_REMAINING).unwrap_or(0),
            reset: int(HEADER_RATE_RESET).and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        }
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reset {
            Some(reset) => write!(f, "{}/{} (resets {})", self.remaining, self.limit, reset),
            None => write!(f, "{}/{}", self.remaining, self.limit),
        }
    }
}

/// What a call returned besides its decoded body.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Pagination and action links, when the envelope had any
    pub links: Option<Links>,
    /// List metadata, when the envelope had any
    pub meta: Option<Meta>,
    pub rate: Rate,
}

impl Response {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap) -> Self {
        let rate = Rate::from_headers(&headers);
        Self {
            status,
            headers,
            links: None,
            meta: None,
            rate,
        }
    }

    /// Total number of items across all pages, if the API reported it.
    pub fn total(&self) -> Option<u64> {
        self.meta.map(|m| m.total)
    }

    /// See [`Links::is_last_page`]. A response without links is a single page.
    pub fn is_last_page(&self) -> bool {
        super::links::is_last_page(self.links.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_rate_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_RATE_LIMIT, HeaderValue::from_static("60"));
        headers.insert(HEADER_RATE_REMAINING, HeaderValue::from_static("59"));
        headers.insert(HEADER_RATE_RESET, HeaderValue::from_static("1372700873"));

        let rate = Rate::from_headers(&headers);
        assert_eq!(rate.limit, 60);
        assert_eq!(rate.remaining, 59);
        assert_eq!(rate.reset.unwrap().timestamp(), 1372700873);
    }

    #[test]
    fn test_rate_missing_headers() {
        let rate = Rate::from_headers(&HeaderMap::new());
        assert_eq!(rate, Rate::default());
    }

    #[test]
    fn test_response_without_links_is_last_page() {
        let resp = Response::new(StatusCode::OK, HeaderMap::new());
        assert!(resp.is_last_page());
        assert_eq!(resp.total(), None);
    }
}
