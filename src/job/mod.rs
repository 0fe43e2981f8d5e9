//! Asynchronous job module
//!
//! Batch requests return a job (snapshot) id. The poller checks the job's
//! status endpoint at a fixed interval until the results are ready.
//!
//! # Overview
//!
//! - `Job` / `JobStatus` - a submitted job and where it stands
//! - `PollPolicy` - interval and attempt budget
//! - `Poller` - the polling loop

mod poller;
mod types;

pub use poller::Poller;
pub use types::{Job, JobStatus, PollPolicy};
