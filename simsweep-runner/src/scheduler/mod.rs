//! Scheduler layer for the runner
//!
//! This layer hands job records to a fixed number of workers and waits
//! until every job has run.

pub mod pool;

pub use pool::{PoolSummary, WorkerPool};
