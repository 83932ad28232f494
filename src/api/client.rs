//! API Client
//!
//! Builds requests against the API base URL, dispatches them through a shared
//! `reqwest::Client`, and decodes the JSON envelopes that come back.

use super::auth::{clean_token, default_token};
use super::error::{ArgError, Error, Result};
use super::http::{check_response, sanitize_for_log, RateLimiter, RetryConfig};
use super::links::Links;
use super::response::{Meta, Rate, Response};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.digitalocean.com/";
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
const MEDIA_TYPE: &str = "application/json";

/// User agent sent when none is configured.
pub fn default_user_agent() -> String {
    format!("docean/{}", LIBRARY_VERSION)
}

/// Summary of a finished request, handed to the completion callback.
#[derive(Debug, Clone)]
pub struct CompletedRequest {
    pub method: Method,
    pub url: Url,
    pub status: StatusCode,
    pub attempts: u32,
}

/// Callback invoked after every request that got a response.
pub type RequestCompletionCallback = Arc<dyn Fn(&CompletedRequest) + Send + Sync>;

/// A fully built request, ready to be dispatched.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// JSON-encoded body
    pub body: Option<Vec<u8>>,
}

/// Links and meta as they appear at the top level of any envelope.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    links: Option<Links>,
    #[serde(default)]
    meta: Option<Meta>,
}

/// API client. Cloning is cheap and clones share rate state.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: Url,
    user_agent: String,
    token: Option<String>,
    headers: HeaderMap,
    rate: RwLock<Rate>,
    limiter: Option<RateLimiter>,
    retry: RetryConfig,
    on_request_completed: Option<RequestCompletionCallback>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("user_agent", &self.inner.user_agent)
            .field("has_token", &self.inner.token.is_some())
            .field("retry", &self.inner.retry)
            .finish()
    }
}

/// Builder for [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    token: Option<String>,
    base_url: Option<String>,
    user_agent: Option<String>,
    headers: Vec<(String, String)>,
    requests_per_second: Option<f64>,
    retry: RetryConfig,
    on_request_completed: Option<RequestCompletionCallback>,
    http: Option<reqwest::Client>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Personal access token, cleaned of stray whitespace and quotes.
    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(clean_token(token));
        self
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Product token prepended to the default user agent.
    pub fn user_agent(mut self, ua: &str) -> Self {
        self.user_agent = Some(ua.to_string());
        self
    }

    /// Extra header sent with every request.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Limit outgoing requests to `rps` per second.
    pub fn static_rate_limit(mut self, rps: f64) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn on_request_completed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&CompletedRequest) + Send + Sync + 'static,
    {
        self.on_request_completed = Some(Arc::new(callback));
        self
    }

    /// Use a preconfigured `reqwest::Client`.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Request timeout for the default HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Client> {
        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let user_agent = match self.user_agent {
            Some(ua) => format!("{} {}", ua, default_user_agent()),
            None => default_user_agent(),
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let limiter = match self.requests_per_second {
            Some(rps) => Some(RateLimiter::per_second(rps).ok_or_else(|| {
                ArgError::new("requests_per_second", "must be a positive number")
            })?),
            None => None,
        };

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(Client {
            inner: Arc::new(Inner {
                http,
                base_url,
                user_agent,
                token: self.token.filter(|t| !t.is_empty()),
                headers,
                rate: RwLock::new(Rate::default()),
                limiter,
                retry: self.retry,
                on_request_completed: self.on_request_completed,
            }),
        })
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Client authenticated with `token` against the default base URL.
    pub fn from_token(token: &str) -> Result<Self> {
        Self::builder().token(token).build()
    }

    /// Client authenticated with a token found in the environment or doctl config.
    pub fn from_env() -> Result<Self> {
        let token = default_token().ok_or_else(|| {
            ArgError::new("token", "not found in DIGITALOCEAN_ACCESS_TOKEN or doctl config")
        })?;
        Self::from_token(&token)
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.inner.user_agent
    }

    /// Rate limit reported by the most recent response.
    pub async fn rate(&self) -> Rate {
        *self.inner.rate.read().await
    }

    /// Build a request for `path`, resolved against the base URL.
    ///
    /// `Content-Type` is only set when there is a body.
    pub fn new_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiRequest> {
        let url = self.inner.base_url.join(path)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.inner.user_agent)
                .map_err(|e| Error::InvalidHeader(format!("user agent: {}", e)))?,
        );

        let body = match body {
            Some(body) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
                Some(serde_json::to_vec(body)?)
            }
            None => None,
        };

        if let Some(token) = &self.inner.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::InvalidHeader("authorization token".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in &self.inner.headers {
            headers.insert(name.clone(), value.clone());
        }

        Ok(ApiRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Send a request, retrying transient failures, and check the response.
    ///
    /// Returns the raw body along with a [`Response`] carrying any `links` and
    /// `meta` found at the top level of the envelope.
    pub async fn execute(&self, request: ApiRequest) -> Result<(Vec<u8>, Response)> {
        let retry = self.inner.retry;
        let max_attempts = retry.max_retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;

            if let Some(limiter) = &self.inner.limiter {
                limiter.acquire().await;
            }

            tracing::debug!("{} {}", request.method, request.url);

            let mut builder = self
                .inner
                .http
                .request(request.method.clone(), request.url.clone())
                .headers(request.headers.clone());
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let http_response = match builder.send().await {
                Ok(r) => r,
                Err(e) if attempt < max_attempts => {
                    let wait = retry.backoff(attempt, None);
                    tracing::warn!(
                        "{} {} failed: {}, retrying in {:?} ({}/{})",
                        request.method,
                        request.url,
                        e,
                        wait,
                        attempt,
                        retry.max_retries
                    );
                    tokio::time::sleep(wait).await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = http_response.status();
            let headers = http_response.headers().clone();
            let body = http_response.bytes().await?.to_vec();

            let mut response = Response::new(status, headers);
            *self.inner.rate.write().await = response.rate;

            if RetryConfig::should_retry(status) && attempt < max_attempts {
                let wait = retry.backoff(attempt, Some(&response.headers));
                tracing::warn!(
                    "{} {} returned {}, retrying in {:?} ({}/{})",
                    request.method,
                    request.url,
                    status,
                    wait,
                    attempt,
                    retry.max_retries
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if let Some(callback) = &self.inner.on_request_completed {
                callback(&CompletedRequest {
                    method: request.method.clone(),
                    url: request.url.clone(),
                    status,
                    attempts: attempt,
                });
            }

            let attempts = if retry.enabled() { attempt } else { 0 };
            if let Err(e) = check_response(
                &request.method,
                &request.url,
                status,
                &response.headers,
                &body,
                attempts,
            ) {
                tracing::error!(
                    "API error: {} - {}",
                    status,
                    sanitize_for_log(&String::from_utf8_lossy(&body))
                );
                return Err(e);
            }

            if let Some(envelope) = parse_envelope(&body) {
                response.links = envelope.links;
                response.meta = envelope.meta;
            }

            return Ok((body, response));
        }
    }

    /// Send a request and decode its JSON body into `T`.
    ///
    /// An empty body (e.g. 204) decodes as JSON `null`.
    pub async fn do_request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<(T, Response)> {
        let (body, response) = self.execute(request).await?;
        let value = if body.is_empty() || response.status == StatusCode::NO_CONTENT {
            serde_json::from_slice(b"null")?
        } else {
            serde_json::from_slice(&body)?
        };
        Ok((value, response))
    }

    /// Send a request whose body, if any, is not needed.
    pub async fn do_empty(&self, request: ApiRequest) -> Result<Response> {
        let (_, response) = self.execute(request).await?;
        Ok(response)
    }

    /// Send a request and return the body undecoded.
    pub async fn do_raw(&self, request: ApiRequest) -> Result<(Vec<u8>, Response)> {
        self.execute(request).await
    }

    pub async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(T, Response)>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.new_request(method, path, body)?;
        self.do_request(request).await
    }

    pub async fn send_empty<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let request = self.new_request(method, path, body)?;
        self.do_empty(request).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<(T, Response)> {
        self.send(Method::GET, path, None::<&()>).await
    }

    pub async fn get_raw(&self, path: &str) -> Result<(Vec<u8>, Response)> {
        let request = self.new_request(Method::GET, path, None::<&()>)?;
        self.do_raw(request).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<(T, Response)>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<(T, Response)>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<(T, Response)>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.send_empty(Method::DELETE, path, None::<&()>).await
    }
}

fn parse_envelope(body: &[u8]) -> Option<Envelope> {
    let first = body.iter().find(|b| !b.is_ascii_whitespace())?;
    if *first != b'{' {
        return None;
    }
    serde_json::from_slice(body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> Client {
        Client::builder()
            .token("myToken")
            .base_url("https://api.example.com/")
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let c = Client::builder().build().unwrap();
        assert_eq!(c.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(c.user_agent(), default_user_agent());
    }

    #[test]
    fn test_new_request_with_body() {
        let req = client()
            .new_request(Method::POST, "/v2/droplets", Some(&json!({"name": "l"})))
            .unwrap();
        assert_eq!(req.url.as_str(), "https://api.example.com/v2/droplets");
        assert_eq!(req.body.as_deref(), Some(br#"{"name":"l"}"#.as_slice()));
        assert_eq!(req.headers[CONTENT_TYPE], MEDIA_TYPE);
        assert_eq!(req.headers[ACCEPT], MEDIA_TYPE);
        assert_eq!(req.headers[USER_AGENT], default_user_agent().as_str());
        assert_eq!(req.headers[AUTHORIZATION], "Bearer myToken");
    }

    #[test]
    fn test_new_request_get_has_no_content_type() {
        let req = client().new_request(Method::GET, "/v2/droplets", None::<&()>).unwrap();
        assert!(req.body.is_none());
        assert!(req.headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_new_request_bad_url() {
        let err = client()
            .new_request(Method::GET, "http://[::1", None::<&()>)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_new_request_full_url() {
        let req = client()
            .new_request(Method::GET, "https://other.example.com/v2/actions/1", None::<&()>)
            .unwrap();
        assert_eq!(req.url.as_str(), "https://other.example.com/v2/actions/1");
    }

    #[test]
    fn test_custom_user_agent() {
        let c = Client::builder().user_agent("testing/0.0.1").build().unwrap();
        assert_eq!(c.user_agent(), format!("testing/0.0.1 {}", default_user_agent()));
    }

    #[test]
    fn test_custom_headers() {
        let c = Client::builder()
            .header("X-Test-Header", "a")
            .header("X-Other-Header", "b")
            .build()
            .unwrap();
        let req = c.new_request(Method::GET, "/v2/account", None::<&()>).unwrap();
        assert_eq!(req.headers["x-test-header"], "a");
        assert_eq!(req.headers["x-other-header"], "b");
    }

    #[test]
    fn test_invalid_header() {
        let err = Client::builder().header("bad header", "a").build().unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn test_bad_base_url() {
        let err = Client::builder().base_url(":").build().unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_bad_rate_limit() {
        let err = Client::builder().static_rate_limit(0.0).build().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = Client::builder().static_rate_limit(1e-20).build().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_token_is_cleaned() {
        let req = Client::from_token(" 'myToken' ")
            .unwrap()
            .new_request(Method::GET, "/foo", None::<&()>)
            .unwrap();
        assert_eq!(req.headers[AUTHORIZATION], "Bearer myToken");
    }

    #[test]
    fn test_parse_envelope() {
        let env = parse_envelope(br#" {"droplets": [], "meta": {"total": 2}}"#).unwrap();
        assert_eq!(env.meta.unwrap().total, 2);
        assert!(env.links.is_none());
        assert!(parse_envelope(b"[1,2]").is_none());
        assert!(parse_envelope(b"").is_none());
        assert!(parse_envelope(b"apiVersion: v1").is_none());
    }
}
