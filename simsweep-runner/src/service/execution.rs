//! Execution service
//!
//! Runs one simulation job:
//! - Opening the job's `.out` and `.err` files (truncating old content)
//! - Launching the interpreter with the job's command line
//! - Waiting for the process to exit
//!
//! The exit status of the simulation is not a failure of the service.

use async_trait::async_trait;
use simsweep_core::domain::JobRecord;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::LaunchError;

/// Service trait for executing simulation jobs
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Runs a job to completion
    ///
    /// Returns once the external process has exited, whatever its status.
    async fn run_job(&self, job: &JobRecord) -> Result<(), LaunchError>;
}

/// Launches each job as a child process of the given interpreter
pub struct ProcessExecutionService {
    interpreter: String,
}

impl ProcessExecutionService {
    /// Creates a service launching jobs through `interpreter`
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    async fn open_log(path: &Path) -> Result<Stdio, LaunchError> {
        let file = tokio::fs::File::create(path)
            .await
            .map_err(|source| LaunchError::OutputFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Stdio::from(file.into_std().await))
    }
}

#[async_trait]
impl ExecutionService for ProcessExecutionService {
    async fn run_job(&self, job: &JobRecord) -> Result<(), LaunchError> {
        info!("Starting job {}", job.progress());

        let stdout = Self::open_log(&job.stdout_path()).await?;
        let stderr = Self::open_log(&job.stderr_path()).await?;

        debug!("Executing {} {:?}", self.interpreter, job.command_line());

        let mut child = Command::new(&self.interpreter)
            .args(job.command_line())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.interpreter.clone(),
                source,
            })?;

        let status = child.wait().await.map_err(|source| LaunchError::Wait {
            job: job.progress(),
            source,
        })?;

        debug!("Job {} exited with {}", job.progress(), status);
        info!("Finished job {}", job.progress());

        Ok(())
    }
}
