//! Connector configuration
//!
//! Every configuration value arrives as a string. The raw object is parsed
//! once, up front, into a typed [`ConnectorConfig`] so the rest of the crate
//! never looks at raw keys again.

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::input::normalize;
use crate::output::TableSchema;
use crate::types::{JsonObject, JsonValue, Method, OptionStringExt, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Default vendor API root
pub const DEFAULT_BASE_URL: &str = "https://api.brightdata.com";

/// Environment variable overriding the default API root
pub const BASE_URL_ENV: &str = "BRIGHT_DATA_BASE_URL";

const COMMON_KEYS: &[&str] = &[
    "api_token",
    "base_url",
    "request_timeout_seconds",
    "max_retries",
    "retry_backoff_seconds",
    "poll_interval_seconds",
    "poll_max_attempts",
];

// ============================================================================
// Connector Kind
// ============================================================================

/// The four supported connectors
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    /// Web Unlocker: fetch pages through the unblocking proxy
    Unlocker,
    /// Web Scraper: scrape URLs synchronously or via a snapshot job
    Scrape,
    /// SERP API: run search engine queries
    Serp,
    /// Marketplace Dataset: filter a prebuilt dataset
    Dataset,
}

impl ConnectorKind {
    /// All connector kinds, in display order
    pub fn all() -> [ConnectorKind; 4] {
        [Self::Unlocker, Self::Scrape, Self::Serp, Self::Dataset]
    }

    /// Short name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Unlocker => "unlocker",
            Self::Scrape => "scrape",
            Self::Serp => "serp",
            Self::Dataset => "dataset",
        }
    }

    /// One-line description
    pub fn description(self) -> &'static str {
        match self {
            Self::Unlocker => "Fetch pages through Web Unlocker",
            Self::Scrape => "Scrape URLs with Web Scraper",
            Self::Serp => "Run search queries through the SERP API",
            Self::Dataset => "Filter records from a marketplace dataset",
        }
    }

    /// Destination table for this connector
    pub fn table_schema(self) -> TableSchema {
        match self {
            Self::Unlocker => TableSchema::new("unlocker_results", "requested_url", "result_index"),
            Self::Scrape => TableSchema::new("scrape_results", "url", "result_index"),
            Self::Serp => TableSchema::new("search_results", "query", "result_index"),
            Self::Dataset => TableSchema::new("dataset_results", "dataset_id", "record_index"),
        }
    }

    fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Unlocker => &[
                "unlocker_url",
                "zone",
                "country",
                "method",
                "format_param",
                "data_format",
            ],
            Self::Scrape => &[
                "scrape_url",
                "zone",
                "country",
                "method",
                "format",
                "data_format",
                "async_request",
                "dataset_id",
            ],
            Self::Serp => &[
                "search_query",
                "search_engine",
                "search_zone",
                "country",
                "format",
            ],
            Self::Dataset => &[
                "dataset_id",
                "filter_name",
                "filter_operator",
                "filter_value",
                "records_limit",
            ],
        }
    }
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConnectorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::config(format!("unknown connector '{s}'")))
    }
}

// ============================================================================
// Value Types
// ============================================================================

/// Search engine targeted by SERP queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchEngine {
    #[default]
    Google,
    Bing,
    Yandex,
}

impl SearchEngine {
    /// Build the engine's result page URL for a query
    ///
    /// `parsed` asks the vendor to return the page as structured JSON.
    pub fn search_url(self, query: &str, parsed: bool) -> Result<String> {
        let (base, param) = match self {
            Self::Google => ("https://www.google.com/search", "q"),
            Self::Bing => ("https://www.bing.com/search", "q"),
            Self::Yandex => ("https://yandex.com/search/", "text"),
        };
        let mut params = vec![(param, query)];
        if parsed {
            params.push(("brd_json", "1"));
        }
        Ok(url::Url::parse_with_params(base, &params)?.to_string())
    }
}

impl FromStr for SearchEngine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "bing" => Ok(Self::Bing),
            "yandex" => Ok(Self::Yandex),
            other => Err(format!(
                "unsupported search engine '{other}', expected google, bing or yandex"
            )),
        }
    }
}

/// Comparison used by a dataset filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Includes,
    NotIncludes,
    ArrayIncludes,
    NotArrayIncludes,
    IsNull,
    IsNotNull,
}

impl FilterOperator {
    const ALL: [FilterOperator; 14] = [
        Self::Eq,
        Self::NotEq,
        Self::Lt,
        Self::Lte,
        Self::Gt,
        Self::Gte,
        Self::In,
        Self::NotIn,
        Self::Includes,
        Self::NotIncludes,
        Self::ArrayIncludes,
        Self::NotArrayIncludes,
        Self::IsNull,
        Self::IsNotNull,
    ];

    /// Wire form of the operator
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Includes => "includes",
            Self::NotIncludes => "not_includes",
            Self::ArrayIncludes => "array_includes",
            Self::NotArrayIncludes => "not_array_includes",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
        }
    }

    /// Whether the operator compares against a value
    pub fn requires_value(self) -> bool {
        !matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unsupported filter operator '{s}'"))
    }
}

impl Serialize for FilterOperator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Filter sent with a dataset request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetFilter {
    pub name: String,
    pub operator: FilterOperator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

// ============================================================================
// Per-connector Settings
// ============================================================================

/// Settings shared by every connector
#[derive(Debug, Clone)]
pub struct CommonConfig {
    pub api_token: Secret,
    pub base_url: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub poll_interval: Option<Duration>,
    pub poll_max_attempts: Option<u32>,
}

/// Web Unlocker settings
#[derive(Debug, Clone, PartialEq)]
pub struct UnlockerConfig {
    pub urls: Vec<String>,
    pub zone: String,
    pub country: String,
    pub method: Method,
    pub format: String,
    pub data_format: Option<String>,
}

/// Web Scraper settings
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    pub urls: Vec<String>,
    pub zone: String,
    pub country: String,
    pub method: Method,
    pub format: String,
    pub data_format: Option<String>,
    pub async_request: bool,
    pub dataset_id: Option<String>,
}

/// SERP settings
#[derive(Debug, Clone, PartialEq)]
pub struct SerpConfig {
    pub queries: Vec<String>,
    pub engine: SearchEngine,
    pub zone: String,
    pub country: String,
    pub format: String,
}

/// Marketplace dataset settings
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetConfig {
    pub dataset_id: String,
    pub filter: DatasetFilter,
    pub records_limit: Option<u64>,
}

/// Connector-specific part of the configuration
#[derive(Debug, Clone, PartialEq)]
pub enum VariantConfig {
    Unlocker(UnlockerConfig),
    Scrape(ScrapeConfig),
    Serp(SerpConfig),
    Dataset(DatasetConfig),
}

// ============================================================================
// Connector Config
// ============================================================================

/// Fully validated configuration for one sync
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub kind: ConnectorKind,
    pub common: CommonConfig,
    pub variant: VariantConfig,
}

impl ConnectorConfig {
    /// Parse a configuration object whose values are all strings
    pub fn parse(kind: ConnectorKind, value: &JsonValue) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::config("configuration must be a JSON object"))?;
        let raw = RawConfig::new(kind, object)?;

        let common = CommonConfig {
            api_token: Secret::new(raw.required("api_token")?),
            base_url: raw
                .optional("base_url")
                .or_else(|| std::env::var(BASE_URL_ENV).ok().none_if_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(raw.positive("request_timeout_seconds", 120)?),
            max_retries: raw.count("max_retries", 3)?,
            retry_backoff: Duration::from_secs(raw.positive("retry_backoff_seconds", 1)?),
            poll_interval: raw
                .optional_positive("poll_interval_seconds")?
                .map(Duration::from_secs),
            poll_max_attempts: raw
                .optional_positive("poll_max_attempts")?
                .map(|n| {
                    u32::try_from(n).map_err(|_| {
                        Error::invalid_value(
                            "poll_max_attempts",
                            format!("must be at most {}, got {n}", u32::MAX),
                        )
                    })
                })
                .transpose()?,
        };

        let variant = match kind {
            ConnectorKind::Unlocker => VariantConfig::Unlocker(UnlockerConfig {
                urls: raw.items("unlocker_url")?,
                zone: raw.or("zone", "web_unlocker1"),
                country: raw.or("country", "us"),
                method: raw.parsed("method", Method::GET)?,
                format: raw.or("format_param", "json"),
                data_format: raw.optional("data_format"),
            }),
            ConnectorKind::Scrape => {
                let async_request = raw.boolean("async_request", true)?;
                let dataset_id = raw.optional("dataset_id");
                if async_request && dataset_id.is_none() {
                    return Err(Error::invalid_value(
                        "dataset_id",
                        "required when async_request is enabled",
                    ));
                }
                VariantConfig::Scrape(ScrapeConfig {
                    urls: raw.items("scrape_url")?,
                    zone: raw.or("zone", "web_unlocker1"),
                    country: raw.or("country", "us"),
                    method: raw.parsed("method", Method::GET)?,
                    format: raw.or("format", "json"),
                    data_format: raw.optional("data_format"),
                    async_request,
                    dataset_id,
                })
            }
            ConnectorKind::Serp => VariantConfig::Serp(SerpConfig {
                queries: raw.items("search_query")?,
                engine: raw.parsed("search_engine", SearchEngine::Google)?,
                zone: raw.or("search_zone", "serp_api1"),
                country: raw.or("country", "us"),
                format: raw.or("format", "json"),
            }),
            ConnectorKind::Dataset => {
                let operator: FilterOperator = raw.required_parsed("filter_operator")?;
                let value = raw.optional("filter_value");
                if operator.requires_value() && value.is_none() {
                    return Err(Error::missing_field("filter_value"));
                }
                VariantConfig::Dataset(DatasetConfig {
                    dataset_id: raw.required("dataset_id")?,
                    filter: DatasetFilter {
                        name: raw.required("filter_name")?,
                        operator,
                        value: if operator.requires_value() { value } else { None },
                    },
                    records_limit: raw.optional_positive("records_limit")?,
                })
            }
        };

        Ok(Self {
            kind,
            common,
            variant,
        })
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(kind: ConnectorKind, json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::parse(kind, &value)
    }

    /// Load configuration from a JSON or YAML file
    pub fn from_file(kind: ConnectorKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let value: JsonValue = if is_yaml {
            serde_yaml::from_str(&contents)?
        } else {
            serde_json::from_str(&contents)?
        };
        Self::parse(kind, &value)
    }

    /// HTTP client settings derived from the common options
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .base_url(&self.common.base_url)
            .timeout(self.common.request_timeout)
            .max_retries(self.common.max_retries)
            .initial_backoff(self.common.retry_backoff)
            .bearer_token(self.common.api_token.clone())
            .build()
    }
}

// ============================================================================
// Raw String Access
// ============================================================================

struct RawConfig<'a> {
    values: &'a JsonObject,
}

impl<'a> RawConfig<'a> {
    fn new(kind: ConnectorKind, values: &'a JsonObject) -> Result<Self> {
        for (key, value) in values {
            if !value.is_string() && !value.is_null() {
                return Err(Error::invalid_value(key, "configuration values must be strings"));
            }
            if !COMMON_KEYS.contains(&key.as_str()) && !kind.keys().contains(&key.as_str()) {
                warn!("Ignoring unknown configuration key '{}' for {}", key, kind);
            }
        }
        Ok(Self { values })
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(JsonValue::as_str)
            .map(|s| s.trim().to_string())
            .none_if_empty()
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key).ok_or_else(|| Error::missing_field(key))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn items(&self, key: &str) -> Result<Vec<String>> {
        normalize(&self.required(key)?)
            .map_err(|e| Error::invalid_value(key, e.to_string()))
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr<Err = String>,
    {
        match self.optional(key) {
            Some(raw) => raw.parse().map_err(|e: String| Error::invalid_value(key, e)),
            None => Ok(default),
        }
    }

    fn required_parsed<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr<Err = String>,
    {
        self.required(key)?
            .parse()
            .map_err(|e: String| Error::invalid_value(key, e))
    }

    fn boolean(&self, key: &str, default: bool) -> Result<bool> {
        match self.optional(key) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                Error::invalid_value(key, format!("expected true/false/1/0/yes/no, got '{raw}'"))
            }),
            None => Ok(default),
        }
    }

    fn optional_positive(&self, key: &str) -> Result<Option<u64>> {
        let Some(raw) = self.optional(key) else {
            return Ok(None);
        };
        match raw.parse::<u64>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(Error::invalid_value(
                key,
                format!("expected a positive integer, got '{raw}'"),
            )),
        }
    }

    fn positive(&self, key: &str, default: u64) -> Result<u64> {
        Ok(self.optional_positive(key)?.unwrap_or(default))
    }

    fn count(&self, key: &str, default: u32) -> Result<u32> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        raw.parse::<u32>().map_err(|_| {
            Error::invalid_value(key, format!("expected a non-negative integer, got '{raw}'"))
        })
    }
}

/// Parse a boolean configuration string
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(kind: ConnectorKind, value: JsonValue) -> Result<ConnectorConfig> {
        ConnectorConfig::parse(kind, &value)
    }

    #[test]
    fn test_connector_kind_parse() {
        assert_eq!("serp".parse::<ConnectorKind>().unwrap(), ConnectorKind::Serp);
        assert_eq!(" Dataset ".parse::<ConnectorKind>().unwrap(), ConnectorKind::Dataset);
        assert!("crawler".parse::<ConnectorKind>().is_err());
    }

    #[test]
    fn test_unlocker_defaults() {
        let config = parse(
            ConnectorKind::Unlocker,
            json!({
                "api_token": "tok",
                "base_url": "http://localhost:1",
                "unlocker_url": "https://a.com, https://b.com"
            }),
        )
        .unwrap();

        assert_eq!(config.common.request_timeout, Duration::from_secs(120));
        assert_eq!(config.common.max_retries, 3);
        assert_eq!(config.common.base_url, "http://localhost:1");

        let VariantConfig::Unlocker(unlocker) = config.variant else {
            panic!("expected unlocker config");
        };
        assert_eq!(unlocker.urls, vec!["https://a.com", "https://b.com"]);
        assert_eq!(unlocker.zone, "web_unlocker1");
        assert_eq!(unlocker.country, "us");
        assert_eq!(unlocker.method, Method::GET);
        assert_eq!(unlocker.format, "json");
        assert_eq!(unlocker.data_format, None);
    }

    #[test]
    fn test_missing_token() {
        let err = parse(ConnectorKind::Serp, json!({"search_query": "rust"})).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "api_token"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_non_string_values_rejected() {
        let err = parse(
            ConnectorKind::Serp,
            json!({"api_token": "tok", "search_query": "rust", "max_retries": 3}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "max_retries"));
    }

    #[test]
    fn test_configuration_must_be_object() {
        assert!(matches!(
            parse(ConnectorKind::Serp, json!(["a"])),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_scrape_async_requires_dataset_id() {
        let err = parse(
            ConnectorKind::Scrape,
            json!({"api_token": "tok", "scrape_url": "https://a.com"}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "dataset_id"));

        let config = parse(
            ConnectorKind::Scrape,
            json!({"api_token": "tok", "scrape_url": "https://a.com", "async_request": "no"}),
        )
        .unwrap();
        let VariantConfig::Scrape(scrape) = config.variant else {
            panic!("expected scrape config");
        };
        assert!(!scrape.async_request);
    }

    #[test]
    fn test_invalid_boolean() {
        let err = parse(
            ConnectorKind::Scrape,
            json!({"api_token": "tok", "scrape_url": "https://a.com", "async_request": "maybe"}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "async_request"));
    }

    #[test]
    fn test_poll_max_attempts_range() {
        let base = json!({"api_token": "tok", "dataset_id": "gd_1", "filter_name": "a", "filter_operator": "is_null"});

        let mut raw = base.clone();
        raw["poll_max_attempts"] = json!("4294967296");
        let err = parse(ConnectorKind::Dataset, raw).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "poll_max_attempts"));

        let mut raw = base;
        raw["poll_max_attempts"] = json!("4294967295");
        let config = parse(ConnectorKind::Dataset, raw).unwrap();
        assert_eq!(config.common.poll_max_attempts, Some(u32::MAX));
    }

    #[test]
    fn test_parse_bool() {
        for raw in ["true", "TRUE", "1", "yes", " Yes "] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["false", "0", "no", "No"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_bool("on"), None);
    }

    #[test]
    fn test_serp_engine() {
        let config = parse(
            ConnectorKind::Serp,
            json!({"api_token": "tok", "search_query": "[\"a\", \"b\"]", "search_engine": "Bing"}),
        )
        .unwrap();
        let VariantConfig::Serp(serp) = config.variant else {
            panic!("expected serp config");
        };
        assert_eq!(serp.engine, SearchEngine::Bing);
        assert_eq!(serp.zone, "serp_api1");
        assert_eq!(serp.queries, vec!["a", "b"]);

        let err = parse(
            ConnectorKind::Serp,
            json!({"api_token": "tok", "search_query": "a", "search_engine": "duckduckgo"}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_search_url() {
        assert_eq!(
            SearchEngine::Google.search_url("rust lang", true).unwrap(),
            "https://www.google.com/search?q=rust+lang&brd_json=1"
        );
        assert_eq!(
            SearchEngine::Yandex.search_url("pizza", false).unwrap(),
            "https://yandex.com/search/?text=pizza"
        );
    }

    #[test]
    fn test_dataset_filter() {
        let config = parse(
            ConnectorKind::Dataset,
            json!({
                "api_token": "tok",
                "dataset_id": "gd_l1",
                "filter_name": "rating",
                "filter_operator": ">=",
                "filter_value": "4",
                "records_limit": "10"
            }),
        )
        .unwrap();
        let VariantConfig::Dataset(dataset) = config.variant else {
            panic!("expected dataset config");
        };
        assert_eq!(dataset.records_limit, Some(10));
        assert_eq!(
            serde_json::to_value(&dataset.filter).unwrap(),
            json!({"name": "rating", "operator": ">=", "value": "4"})
        );
    }

    #[test]
    fn test_dataset_null_operator_omits_value() {
        let config = parse(
            ConnectorKind::Dataset,
            json!({
                "api_token": "tok",
                "dataset_id": "gd_l1",
                "filter_name": "price",
                "filter_operator": "is_null",
                "filter_value": "ignored"
            }),
        )
        .unwrap();
        let VariantConfig::Dataset(dataset) = config.variant else {
            panic!("expected dataset config");
        };
        assert_eq!(
            serde_json::to_value(&dataset.filter).unwrap(),
            json!({"name": "price", "operator": "is_null"})
        );
    }

    #[test]
    fn test_dataset_validation() {
        let base = json!({
            "api_token": "tok",
            "dataset_id": "gd_l1",
            "filter_name": "rating",
            "filter_operator": "="
        });
        assert!(matches!(
            parse(ConnectorKind::Dataset, base.clone()),
            Err(Error::MissingConfigField { ref field }) if field == "filter_value"
        ));

        let mut bad_operator = base.clone();
        bad_operator["filter_operator"] = json!("~=");
        bad_operator["filter_value"] = json!("x");
        assert!(parse(ConnectorKind::Dataset, bad_operator).is_err());

        let mut bad_limit = base;
        bad_limit["filter_value"] = json!("x");
        bad_limit["records_limit"] = json!("0");
        assert!(matches!(
            parse(ConnectorKind::Dataset, bad_limit),
            Err(Error::InvalidConfigValue { ref field, .. }) if field == "records_limit"
        ));
    }

    #[test]
    fn test_table_schemas() {
        let schema = ConnectorKind::Serp.table_schema();
        assert_eq!(schema.table, "search_results");
        assert_eq!(schema.key_column(), "query");
        assert_eq!(ConnectorKind::Dataset.table_schema().index_column(), "record_index");
    }
}
