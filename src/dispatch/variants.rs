//! The four connector variants

use super::types::{Association, DispatchMode, Variant};
use crate::config::{
    CommonConfig, ConnectorConfig, ConnectorKind, DatasetConfig, ScrapeConfig, SerpConfig,
    UnlockerConfig, VariantConfig,
};
use crate::decode::{AutoDecoder, DecodeMode, RecordDecoder};
use crate::error::Result;
use crate::http::Endpoint;
use crate::job::PollPolicy;
use crate::types::{JsonObject, JsonValue};
use serde_json::{json, Value};

/// Path of the synchronous request endpoint
const REQUEST_PATH: &str = "request";

/// Build the variant for a parsed configuration
pub fn build_variant(config: &ConnectorConfig) -> Box<dyn Variant> {
    match &config.variant {
        VariantConfig::Unlocker(c) => Box::new(UnlockerVariant::new(c.clone())),
        VariantConfig::Scrape(c) => Box::new(ScrapeVariant::new(c.clone(), &config.common)),
        VariantConfig::Serp(c) => Box::new(SerpVariant::new(c.clone())),
        VariantConfig::Dataset(c) => Box::new(DatasetVariant::new(c.clone(), &config.common)),
    }
}

/// Body of a synchronous `/request` call
fn request_body(
    zone: &str,
    url: &str,
    format: &str,
    method: Option<&str>,
    country: &str,
    data_format: Option<&str>,
) -> JsonValue {
    let mut body = json!({
        "zone": zone,
        "url": url,
        "format": format,
        "country": country,
    });
    if let Some(method) = method {
        body["method"] = json!(method);
    }
    if let Some(data_format) = data_format {
        body["data_format"] = json!(data_format);
    }
    body
}

fn state(pairs: [(&str, JsonValue); 2]) -> JsonObject {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

// ============================================================================
// Web Unlocker
// ============================================================================

/// Fetches each URL through the unlocking proxy
#[derive(Debug, Clone)]
pub struct UnlockerVariant {
    config: UnlockerConfig,
}

impl UnlockerVariant {
    pub fn new(config: UnlockerConfig) -> Self {
        Self { config }
    }
}

impl Variant for UnlockerVariant {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Unlocker
    }

    fn items(&self) -> &[String] {
        &self.config.urls
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::PerItem
    }

    fn decode_mode(&self) -> DecodeMode {
        DecodeMode::Lenient
    }

    fn item_endpoint(&self, item: &str) -> Result<Endpoint> {
        let c = &self.config;
        Ok(Endpoint::post(
            REQUEST_PATH,
            request_body(
                &c.zone,
                item,
                &c.format,
                Some(c.method.as_str()),
                &c.country,
                c.data_format.as_deref(),
            ),
        ))
    }

    fn state_update(&self, row_count: u64) -> JsonObject {
        state([
            ("last_unlocker_urls", json!(self.config.urls)),
            ("last_unlocker_count", json!(row_count)),
        ])
    }
}

// ============================================================================
// Web Scraper
// ============================================================================

/// Scrapes URLs, either one request per URL or as a snapshot job
#[derive(Debug, Clone)]
pub struct ScrapeVariant {
    config: ScrapeConfig,
    policy: PollPolicy,
}

impl ScrapeVariant {
    pub fn new(config: ScrapeConfig, common: &CommonConfig) -> Self {
        Self {
            config,
            policy: PollPolicy::SCRAPE
                .with_overrides(common.poll_interval, common.poll_max_attempts),
        }
    }
}

impl Variant for ScrapeVariant {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Scrape
    }

    fn items(&self) -> &[String] {
        &self.config.urls
    }

    fn mode(&self) -> DispatchMode {
        if self.config.async_request {
            DispatchMode::Batch
        } else {
            DispatchMode::PerItem
        }
    }

    fn decode_mode(&self) -> DecodeMode {
        DecodeMode::Lenient
    }

    fn item_endpoint(&self, item: &str) -> Result<Endpoint> {
        let c = &self.config;
        Ok(Endpoint::post(
            REQUEST_PATH,
            request_body(
                &c.zone,
                item,
                &c.format,
                Some(c.method.as_str()),
                &c.country,
                c.data_format.as_deref(),
            ),
        ))
    }

    fn trigger_endpoint(&self) -> Result<Endpoint> {
        let c = &self.config;
        let inputs: Vec<JsonValue> = c
            .urls
            .iter()
            .map(|url| json!({"url": url, "country": c.country}))
            .collect();

        Ok(Endpoint::post("datasets/v3/trigger", Value::Array(inputs))
            .query("dataset_id", c.dataset_id.clone().unwrap_or_default())
            .query("format", "json")
            .query("include_errors", "true"))
    }

    fn poll_policy(&self) -> PollPolicy {
        self.policy
    }

    fn state_update(&self, row_count: u64) -> JsonObject {
        state([
            ("last_scrape_urls", json!(self.config.urls)),
            ("last_scrape_count", json!(row_count)),
        ])
    }
}

// ============================================================================
// SERP
// ============================================================================

/// Runs each search query through the SERP zone
#[derive(Debug, Clone)]
pub struct SerpVariant {
    config: SerpConfig,
}

impl SerpVariant {
    pub fn new(config: SerpConfig) -> Self {
        Self { config }
    }

    fn parsed(&self) -> bool {
        self.config.format.eq_ignore_ascii_case("json")
    }
}

impl Variant for SerpVariant {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Serp
    }

    fn items(&self) -> &[String] {
        &self.config.queries
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::PerItem
    }

    fn decode_mode(&self) -> DecodeMode {
        DecodeMode::Lenient
    }

    fn item_endpoint(&self, item: &str) -> Result<Endpoint> {
        let c = &self.config;
        let url = c.engine.search_url(item, self.parsed())?;
        Ok(Endpoint::post(
            REQUEST_PATH,
            request_body(&c.zone, &url, &c.format, None, &c.country, None),
        ))
    }

    /// The JSON format wraps the parsed page in a string `body` field
    fn prepare(&self, record: JsonValue) -> JsonValue {
        let Some(Value::String(body)) = record.get("body") else {
            return record;
        };
        match AutoDecoder::strict().decode(body) {
            Ok(mut decoded) if decoded.len() == 1 => decoded.remove(0),
            Ok(decoded) if !decoded.is_empty() => Value::Array(decoded),
            _ => record,
        }
    }

    fn strips_key_variants(&self) -> bool {
        true
    }

    fn extra_fields(&self, position: usize) -> JsonObject {
        let mut fields = JsonObject::new();
        fields.insert("position".to_string(), json!(position + 1));
        fields
    }

    fn state_update(&self, row_count: u64) -> JsonObject {
        state([
            ("last_search_queries", json!(self.config.queries)),
            ("last_search_count", json!(row_count)),
        ])
    }
}

// ============================================================================
// Marketplace Dataset
// ============================================================================

/// Filters a marketplace dataset into a snapshot
#[derive(Debug, Clone)]
pub struct DatasetVariant {
    config: DatasetConfig,
    items: Vec<String>,
    policy: PollPolicy,
}

impl DatasetVariant {
    pub fn new(config: DatasetConfig, common: &CommonConfig) -> Self {
        Self {
            items: vec![config.dataset_id.clone()],
            config,
            policy: PollPolicy::DATASET
                .with_overrides(common.poll_interval, common.poll_max_attempts),
        }
    }
}

impl Variant for DatasetVariant {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Dataset
    }

    fn items(&self) -> &[String] {
        &self.items
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::Batch
    }

    fn trigger_endpoint(&self) -> Result<Endpoint> {
        let c = &self.config;
        let mut body = json!({
            "dataset_id": c.dataset_id,
            "filter": c.filter,
        });
        if let Some(limit) = c.records_limit {
            body["records_limit"] = json!(limit);
        }
        Ok(Endpoint::post("datasets/filter", body))
    }

    fn poll_policy(&self) -> PollPolicy {
        self.policy
    }

    fn association(&self) -> Association {
        Association::Constant(self.config.dataset_id.clone())
    }

    fn state_update(&self, row_count: u64) -> JsonObject {
        let mut update = state([
            ("last_dataset_id", json!(self.config.dataset_id)),
            ("last_record_count", json!(row_count)),
        ]);
        update.insert("last_filter".to_string(), json!(self.config.filter));
        update
    }
}
