//! Domain types
//!
//! Plain data shared between the sweep builder and the runner.

pub mod job;

pub use job::JobRecord;
