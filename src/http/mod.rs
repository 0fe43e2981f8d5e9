//! HTTP client module
//!
//! Provides the HTTP client with retry and backoff strategies used for every
//! vendor call.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry set and retry count
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Authentication**: Bearer token on every request
//! - **Error Detail**: Vendor error bodies reduced to a readable message

mod client;

pub use client::{
    error_detail, Endpoint, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig,
    DEFAULT_RETRY_STATUSES, TRIGGER_RETRY_STATUSES,
};
