//! HTTP utilities: response checking, retry policy, and client-side rate limiting

use super::error::{Error, ErrorResponse, Result};
use super::response::HEADER_REQUEST_ID;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    request_id: String,
}

/// Turn a non-2xx response into an [`ErrorResponse`].
///
/// The message comes from the JSON body, or is the raw body when it is not
/// JSON. A `request_id` in the body wins over the `x-request-id` header.
pub fn check_response(
    method: &Method,
    url: &Url,
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    attempts: u32,
) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    let mut parsed = ErrorBody::default();
    if !body.is_empty() {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(b) => parsed = b,
            Err(_) => parsed.message = String::from_utf8_lossy(body).into_owned(),
        }
    }

    if parsed.request_id.is_empty() {
        if let Some(id) = headers.get(HEADER_REQUEST_ID).and_then(|v| v.to_str().ok()) {
            parsed.request_id = id.to_string();
        }
    }

    Err(Error::Api(ErrorResponse {
        method: method.clone(),
        url: url.clone(),
        status,
        message: parsed.message,
        request_id: parsed.request_id,
        attempts,
    }))
}

/// Retry policy for transient failures.
///
/// Retries are off unless `max_retries` is above zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait before the first retry, doubled on every following one
    pub wait_min: Duration,
    /// Upper bound for a single wait
    pub wait_max: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            wait_min: Duration::from_secs(1),
            wait_max: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// Whether a response with this status is worth another attempt.
    pub fn should_retry(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS
            || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
    }

    /// Wait before retry number `attempt` (1-based). A `Retry-After` header in
    /// seconds takes precedence over the exponential schedule.
    pub fn backoff(&self, attempt: u32, headers: Option<&HeaderMap>) -> Duration {
        if let Some(secs) = headers
            .and_then(|h| h.get(RETRY_AFTER))
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            return Duration::from_secs(secs).min(self.wait_max);
        }

        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.wait_min
            .checked_mul(factor)
            .unwrap_or(self.wait_max)
            .min(self.wait_max)
    }
}

/// Static client-side rate limiter with a burst of one request.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next: Mutex<Instant>,
}

impl RateLimiter {
    /// Limiter allowing `rps` requests per second. Returns `None` for a
    /// non-positive or non-finite rate, or one too small to schedule.
    pub fn per_second(rps: f64) -> Option<Self> {
        if !rps.is_finite() || rps <= 0.0 {
            return None;
        }
        let interval = Duration::try_from_secs_f64(1.0 / rps).ok()?;
        let now = Instant::now();
        now.checked_add(interval)?;
        Some(Self {
            interval,
            next: Mutex::new(now),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next free slot.
    pub async fn acquire(&self) {
        let wait = {
            let mut next = self.next.lock().await;
            let now = Instant::now();
            let slot = (*next).max(now);
            *next = slot.checked_add(self.interval).unwrap_or(slot);
            slot - now
        };

        if !wait.is_zero() {
            tracing::trace!("Rate limiter waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
}

/// Format an API error for display
/// Common statuses get a short, actionable message
pub fn format_api_error(error: &Error) -> String {
    match error.status().map(|s| s.as_u16()) {
        Some(401) => {
            return "Authentication failed. Check DIGITALOCEAN_ACCESS_TOKEN or run 'doctl auth init'."
                .to_string()
        }
        Some(403) => return "Permission denied. Check the scopes of your token.".to_string(),
        Some(404) => return "Resource not found.".to_string(),
        Some(429) => return "Rate limit exceeded. Please try again later.".to_string(),
        Some(409) => {
            return "Resource conflict. The resource may already exist or be in use.".to_string()
        }
        Some(500) | Some(503) => {
            return "DigitalOcean API temporarily unavailable. Please try again.".to_string()
        }
        _ => {}
    }

    if let Error::Api(resp) = error {
        if !resp.message.is_empty() {
            return sanitize_for_log(&resp.message);
        }
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
