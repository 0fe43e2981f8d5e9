//! HTTP client with retry and backoff
//!
//! Provides the HTTP client every vendor call goes through. It handles:
//! - Bearer token authentication
//! - Automatic retries with configurable backoff for a status retry set
//! - Retry-After headers on throttled responses
//! - Vendor error detail extraction for failed responses

use crate::error::{Error, Result};
use crate::types::{BackoffType, Secret};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Statuses retried by default
pub const DEFAULT_RETRY_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

/// Statuses retried when triggering a job
pub const TRIGGER_RETRY_STATUSES: &[u16] = &[408, 429, 500, 502, 503, 504];

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Statuses that trigger a retry
    pub retry_statuses: Vec<u16>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
    /// Token sent as `Authorization: Bearer <token>`
    pub bearer_token: Option<Secret>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(120),
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
            default_headers: HashMap::new(),
            user_agent: format!("brightsync/{}", env!("CARGO_PKG_VERSION")),
            bearer_token: None,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the first backoff delay, keeping the strategy and cap
    pub fn initial_backoff(mut self, initial: Duration) -> Self {
        self.config.initial_backoff = initial;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Replace the default retry set
    pub fn retry_statuses(mut self, statuses: &[u16]) -> Self {
        self.config.retry_statuses = statuses.to_vec();
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Authenticate every request with a bearer token
    pub fn bearer_token(mut self, token: Secret) -> Self {
        self.config.bearer_token = Some(token);
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
    /// Override the retry set for this request
    pub retry_statuses: Option<Vec<u16>>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Retry on a custom set of statuses
    #[must_use]
    pub fn retry_on(mut self, statuses: &[u16]) -> Self {
        self.retry_statuses = Some(statuses.to_vec());
        self
    }
}

/// A vendor endpoint: method, path relative to the base URL, request options
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// HTTP method
    pub method: Method,
    /// Path (or absolute URL)
    pub path: String,
    /// Query, body, retry overrides
    pub config: RequestConfig,
}

impl Endpoint {
    /// GET endpoint
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            config: RequestConfig::default(),
        }
    }

    /// POST endpoint with a JSON body
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            config: RequestConfig::default().json(body),
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.query(key, value);
        self
    }

    /// Retry on a custom set of statuses
    #[must_use]
    pub fn retry_on(mut self, statuses: &[u16]) -> Self {
        self.config = self.config.retry_on(statuses);
        self
    }
}

/// HTTP client with retry and backoff
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::POST, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a generic request
    ///
    /// 2xx responses are returned as-is. Statuses in the retry set are
    /// retried with backoff and become [`Error::Api`] once retries run out.
    /// Any other status fails immediately.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(url);
        let max_retries = config.max_retries.unwrap_or(self.config.max_retries);
        let timeout = config.timeout.unwrap_or(self.config.timeout);
        let retry_statuses = config
            .retry_statuses
            .as_deref()
            .unwrap_or(&self.config.retry_statuses);

        let mut attempt = 0;

        loop {
            // Build request
            let mut req = self.client.request(method.clone(), &full_url);

            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }
            for (key, value) in &config.headers {
                req = req.header(key.as_str(), value.as_str());
            }
            if let Some(ref token) = self.config.bearer_token {
                req = req.bearer_auth(token.expose());
            }
            if !config.query.is_empty() {
                req = req.query(&config.query);
            }
            if let Some(ref body) = config.body {
                req = req.json(body);
            }
            req = req.timeout(timeout);

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        debug!("Request succeeded: {} {} ({})", method, full_url, status);
                        return Ok(response);
                    }

                    if retry_statuses.contains(&status.as_u16()) && attempt < max_retries {
                        let delay = self.retry_delay(&response, attempt);
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(status_error(status, response).await);
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < max_retries => {
                    let delay = self.calculate_backoff(attempt);
                    warn!(
                        "Request error ({}), attempt {}/{}, retrying in {:?}",
                        e,
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_timeout() => {
                    return Err(Error::Timeout {
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                Err(e) => return Err(Error::Http(e)),
            }
        }
    }

    /// Send a request to an endpoint
    pub async fn send(&self, endpoint: &Endpoint) -> Result<Response> {
        self.request(endpoint.method.clone(), &endpoint.path, endpoint.config.clone())
            .await
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }

    /// Delay before the next retry, preferring a numeric Retry-After header
    fn retry_delay(&self, response: &Response, attempt: u32) -> Duration {
        extract_retry_after(response)
            .map(|delay| std::cmp::min(delay, self.config.max_backoff))
            .unwrap_or_else(|| self.calculate_backoff(attempt))
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

async fn status_error(status: StatusCode, response: Response) -> Error {
    let body = response.text().await.unwrap_or_default();
    Error::api(status.as_u16(), error_detail(&body))
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .map(Duration::from_secs)
}

/// Pull a readable message out of a vendor error body
///
/// `validation_errors` are joined with `"; "`; otherwise the first of
/// `error`, `message`, `detail`, `details` is used. Bodies without any of
/// those come back as their JSON text, and non-JSON bodies verbatim.
pub fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    if let Some(Value::Array(errors)) = value.get("validation_errors") {
        if !errors.is_empty() {
            return errors
                .iter()
                .map(text_of)
                .collect::<Vec<_>>()
                .join("; ");
        }
    }

    ["error", "message", "detail", "details"]
        .iter()
        .filter_map(|key| value.get(key))
        .find(|v| !v.is_null())
        .map(text_of)
        .unwrap_or_else(|| value.to_string())
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
