//! Snapshot polling loop
//!
//! Repeatedly requests a job's status endpoint until the vendor reports the
//! job ready, failed or unknown, or the attempt budget runs out.

use super::types::{Job, JobStatus, PollPolicy};
use crate::decode::{AutoDecoder, RecordDecoder};
use crate::error::{Error, PollFailure, Result};
use crate::http::{Endpoint, HttpClient};
use crate::types::JsonObject;
use serde_json::Value;
use tracing::{debug, info};

/// Keys holding the records of a ready snapshot
const DATA_KEYS: &[&str] = &["data", "records", "results"];

/// Snapshot bookkeeping keys dropped when the snapshot object is the data
const METADATA_KEYS: &[&str] = &[
    "status",
    "id",
    "snapshot_id",
    "created",
    "dataset_id",
    "customer_id",
    "cost",
    "initiation_type",
    "warning",
    "warning_code",
];

/// Keys that may explain why a snapshot failed
const FAILURE_KEYS: &[&str] = &["error", "warning", "message", "detail", "details"];

/// What a single status response says about the job
#[derive(Debug, Clone, PartialEq)]
enum Observation {
    Ready(Vec<Value>),
    Failed(String),
    InProgress(String),
}

/// Polls a job's status endpoint
#[derive(Debug)]
pub struct Poller<'a> {
    client: &'a HttpClient,
    policy: PollPolicy,
}

impl<'a> Poller<'a> {
    /// Create a poller
    pub fn new(client: &'a HttpClient, policy: PollPolicy) -> Self {
        Self { client, policy }
    }

    /// The policy in use
    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Poll until the job is ready and return its records
    ///
    /// `job.status` and `job.attempts` are updated as the loop progresses.
    pub async fn poll(&self, job: &mut Job, endpoint: &Endpoint) -> Result<Vec<Value>> {
        loop {
            job.attempts += 1;

            let response = match self.client.send(endpoint).await {
                Ok(response) => response,
                Err(Error::Api { status: 404, .. }) => {
                    job.status = JobStatus::NotFound;
                    return Err(Error::poll(&job.id, PollFailure::NotFound));
                }
                Err(Error::Api { status, body }) => {
                    job.status = JobStatus::Failed(body.clone());
                    return Err(Error::poll(
                        &job.id,
                        PollFailure::RequestFailed {
                            status,
                            detail: body,
                        },
                    ));
                }
                Err(e) => return Err(transport_failure(job, &e)),
            };

            let status = response.status().as_u16();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => return Err(transport_failure(job, &e)),
            };
            let observation = observe(status, &body)?;

            match observation {
                Observation::Ready(records) => {
                    job.status = JobStatus::Ready;
                    info!(
                        "Job {} ready after {} attempt(s) with {} record(s)",
                        job.id,
                        job.attempts,
                        records.len()
                    );
                    return Ok(records);
                }
                Observation::Failed(detail) => {
                    job.status = JobStatus::Failed(detail.clone());
                    return Err(Error::poll(&job.id, PollFailure::Failed(detail)));
                }
                Observation::InProgress(label) => {
                    job.status = if label == "pending" {
                        JobStatus::Pending
                    } else {
                        JobStatus::Running
                    };

                    if job.attempts >= self.policy.max_attempts {
                        return Err(Error::poll(
                            &job.id,
                            PollFailure::TimedOut {
                                attempts: job.attempts,
                            },
                        ));
                    }

                    info!(
                        "Job {} status: {} (attempt {}/{}), checking again in {:?}",
                        job.id, label, job.attempts, self.policy.max_attempts, self.policy.interval
                    );
                    tokio::time::sleep(self.policy.interval).await;
                }
            }
        }
    }
}

/// Mark the job failed after the status endpoint became unreachable
fn transport_failure(job: &mut Job, error: &dyn std::fmt::Display) -> Error {
    let detail = error.to_string();
    job.status = JobStatus::Failed(detail.clone());
    Error::poll(&job.id, PollFailure::Transport(detail))
}

/// Interpret one successful status response
fn observe(status: u16, body: &str) -> Result<Observation> {
    if status == 202 {
        return Ok(Observation::InProgress("accepted".to_string()));
    }
    if body.trim().is_empty() {
        return Ok(Observation::InProgress("building".to_string()));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(observe_object(map)?),
        Ok(other) => Ok(Observation::Ready(AutoDecoder::strict().decode_value(other)?)),
        Err(_) => {
            debug!("Status body is not a single JSON value, decoding as JSON Lines");
            Ok(Observation::Ready(AutoDecoder::strict().decode(body)?))
        }
    }
}

fn observe_object(map: JsonObject) -> Result<Observation> {
    let status = map
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_ascii_lowercase);

    match status.as_deref() {
        None => Ok(Observation::Ready(vec![Value::Object(map)])),
        Some("ready") => Ok(Observation::Ready(ready_records(map)?)),
        Some("failed") => Ok(Observation::Failed(failure_detail(&map))),
        Some(other) => Ok(Observation::InProgress(other.to_string())),
    }
}

fn ready_records(mut map: JsonObject) -> Result<Vec<Value>> {
    for key in DATA_KEYS {
        if let Some(data) = map.remove(*key).filter(|v| !v.is_null()) {
            return AutoDecoder::strict().decode_value(data);
        }
    }

    for key in METADATA_KEYS {
        map.remove(*key);
    }
    if map.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![Value::Object(map)])
    }
}

fn failure_detail(map: &JsonObject) -> String {
    let detail = FAILURE_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(|v| match v {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });

    if let Some(detail) = detail {
        return detail;
    }
    if let Some(code) = map.get("warning_code").filter(|v| !v.is_null()) {
        let code = code.as_str().map_or_else(|| code.to_string(), String::from);
        return format!("snapshot failed with warning code: {code}");
    }
    Value::Object(map.clone()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_observe_shapes() {
        assert_eq!(
            observe(202, "").unwrap(),
            Observation::InProgress("accepted".to_string())
        );
        assert_eq!(
            observe(200, r#"{"status": "Running"}"#).unwrap(),
            Observation::InProgress("running".to_string())
        );
        assert_eq!(
            observe(200, r#"[{"a": 1}]"#).unwrap(),
            Observation::Ready(vec![json!({"a": 1})])
        );
        assert_eq!(
            observe(200, "{\"a\": 1}\n{\"a\": 2}").unwrap(),
            Observation::Ready(vec![json!({"a": 1}), json!({"a": 2})])
        );
        assert_eq!(
            observe(200, r#"{"title": "only"}"#).unwrap(),
            Observation::Ready(vec![json!({"title": "only"})])
        );
        assert!(observe(200, "<html>").is_err());
    }

    #[test]
    fn test_ready_records_from_data_keys() {
        let map = json!({"status": "ready", "records": [{"x": 1}]});
        let Value::Object(map) = map else { unreachable!() };
        assert_eq!(ready_records(map).unwrap(), vec![json!({"x": 1})]);

        let encoded = json!({"status": "ready", "data": "[{\"x\": 2}]"});
        let Value::Object(encoded) = encoded else { unreachable!() };
        assert_eq!(ready_records(encoded).unwrap(), vec![json!({"x": 2})]);
    }

    #[test]
    fn test_ready_records_strip_metadata() {
        let map = json!({"status": "ready", "snapshot_id": "s_1", "cost": 0.1, "name": "n"});
        let Value::Object(map) = map else { unreachable!() };
        assert_eq!(ready_records(map).unwrap(), vec![json!({"name": "n"})]);

        let bare = json!({"status": "ready", "snapshot_id": "s_1"});
        let Value::Object(bare) = bare else { unreachable!() };
        assert!(ready_records(bare).unwrap().is_empty());
    }

    #[test]
    fn test_failure_detail() {
        let detail = |v: Value| match v {
            Value::Object(map) => failure_detail(&map),
            _ => unreachable!(),
        };

        assert_eq!(
            detail(json!({"status": "failed", "error": "bad filter"})),
            "bad filter"
        );
        assert_eq!(
            detail(json!({"status": "failed", "warning": "", "message": "quota"})),
            "quota"
        );
        assert_eq!(
            detail(json!({"status": "failed", "warning_code": "no_records"})),
            "snapshot failed with warning code: no_records"
        );
        assert_eq!(detail(json!({"status": "failed"})), r#"{"status":"failed"}"#);
    }
}
