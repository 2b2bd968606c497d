//! Service layer
//!
//! Services hold the per-job logic of the runner. Job execution is
//! trait-based so the worker pool can be driven by a stand-in in tests.

mod execution;

pub use execution::ExecutionService;
pub use execution::ProcessExecutionService;
