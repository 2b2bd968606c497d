//! Error types for launching simulation jobs

use std::path::PathBuf;
use thiserror::Error;

/// Failures that prevent a job from running at all
///
/// A simulation that runs and exits non-zero is not an error here; its
/// complaint ends up in the job's `.err` file.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// A log file could not be created
    #[error("Failed to open output file {}: {}", .path.display(), .source)]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The interpreter could not be started
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the simulation process failed
    #[error("Failed to wait for job {job}: {source}")]
    Wait {
        job: String,
        #[source]
        source: std::io::Error,
    },
}
