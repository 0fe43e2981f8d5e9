//! Request dispatcher
//!
//! Sends per-item requests and submits batch jobs for a [`Variant`].

use super::types::Variant;
use crate::decode::{AutoDecoder, DecodeMode, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::{HttpClient, TRIGGER_RETRY_STATUSES};
use crate::job::{Job, Poller};
use serde_json::Value;
use tracing::{debug, info};

/// Issues vendor requests on behalf of a variant
#[derive(Debug)]
pub struct Dispatcher<'a> {
    client: &'a HttpClient,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher over a client
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Synchronous request for one item, decoded into records
    pub async fn send(&self, variant: &dyn Variant, item: &str) -> Result<Vec<Value>> {
        let endpoint = variant.item_endpoint(item)?;
        let response = self.client.send(&endpoint).await?;
        let body = response.text().await?;

        let decoder = match variant.decode_mode() {
            DecodeMode::Strict => AutoDecoder::strict(),
            DecodeMode::Lenient => AutoDecoder::lenient(),
        };
        let records = decoder.decode(&body)?;
        debug!("{} returned {} record(s) for {}", variant.kind(), records.len(), item);

        Ok(records.into_iter().map(|r| variant.prepare(r)).collect())
    }

    /// Start a batch job covering every item
    pub async fn submit(&self, variant: &dyn Variant) -> Result<Job> {
        let endpoint = variant
            .trigger_endpoint()?
            .retry_on(TRIGGER_RETRY_STATUSES);
        let response = self.client.send(&endpoint).await?;
        let body = response.text().await?;

        let ack: Value = serde_json::from_str(&body)
            .map_err(|_| Error::dispatch(format!("trigger response is not JSON: {body}")))?;

        let field = variant.job_id_field();
        let id = match ack.get(field) {
            Some(Value::String(id)) if !id.trim().is_empty() => id.trim().to_string(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(Error::dispatch(format!(
                    "trigger response has no {field}: {ack}"
                )))
            }
        };

        info!(
            "Submitted {} job {} for {} item(s)",
            variant.kind(),
            id,
            variant.items().len()
        );
        Ok(Job::new(id, variant.items().to_vec()))
    }

    /// Poll a submitted job until its records are ready
    pub async fn collect(&self, variant: &dyn Variant, job: &mut Job) -> Result<Vec<Value>> {
        let endpoint = variant.poll_endpoint(&job.id);
        let records = Poller::new(self.client, variant.poll_policy())
            .poll(job, &endpoint)
            .await?;
        Ok(records.into_iter().map(|r| variant.prepare(r)).collect())
    }
}
