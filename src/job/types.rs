//! Asynchronous job types

use std::time::Duration;

/// Status of a vendor-side job
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobStatus {
    /// Submitted, not yet reported on
    #[default]
    Pending,
    /// The vendor reports the job as in progress
    Running,
    /// Results are available
    Ready,
    /// The vendor reports the job as failed
    Failed(String),
    /// The vendor does not know the job id
    NotFound,
}

impl JobStatus {
    /// Check if the job has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_) | Self::NotFound)
    }

    /// Check if results are available
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// A submitted batch job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Job (snapshot) id returned by the vendor
    pub id: String,
    /// Current status
    pub status: JobStatus,
    /// Input items the job was submitted for, in submission order
    pub items: Vec<String>,
    /// Status requests made so far
    pub attempts: u32,
}

impl Job {
    /// Create a freshly submitted job
    pub fn new(id: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            items,
            attempts: 0,
        }
    }
}

/// How often and how long to poll a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait between non-terminal attempts
    pub interval: Duration,
    /// Attempts before giving up
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Dataset snapshots: every 5s for up to 300s
    pub const DATASET: PollPolicy = PollPolicy::new(Duration::from_secs(5), 60);

    /// Scraper snapshots: every 30s for up to an hour
    pub const SCRAPE: PollPolicy = PollPolicy::new(Duration::from_secs(30), 120);

    /// Create a policy
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Override parts of the policy
    #[must_use]
    pub fn with_overrides(self, interval: Option<Duration>, max_attempts: Option<u32>) -> Self {
        Self {
            interval: interval.unwrap_or(self.interval),
            max_attempts: max_attempts.unwrap_or(self.max_attempts),
        }
    }

    /// Longest time the policy will wait
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}
