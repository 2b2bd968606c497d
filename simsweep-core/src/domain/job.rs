//! Job domain types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single simulation invocation
///
/// Built once by the sweep builder and consumed by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Output path stem; the log files are `<output>.out` and `<output>.err`
    pub output: PathBuf,
    /// Simulation arguments following `--output <output>`
    pub args: Vec<String>,
    /// Simulation script handed to the interpreter
    pub script: PathBuf,
    /// 1-based position in the job list
    pub job: usize,
    /// Total number of jobs in the list
    pub jobs: usize,
}

impl JobRecord {
    /// Path receiving the job's standard output
    pub fn stdout_path(&self) -> PathBuf {
        with_suffix(&self.output, "out")
    }

    /// Path receiving the job's standard error
    pub fn stderr_path(&self) -> PathBuf {
        with_suffix(&self.output, "err")
    }

    /// Arguments passed to the interpreter: script, `--output`, then the rest
    pub fn command_line(&self) -> Vec<String> {
        let mut line = Vec::with_capacity(self.args.len() + 3);
        line.push(self.script.to_string_lossy().into_owned());
        line.push("--output".to_string());
        line.push(self.output.to_string_lossy().into_owned());
        line.extend(self.args.iter().cloned());
        line
    }

    /// "job/jobs" label used in progress messages
    pub fn progress(&self) -> String {
        format!("{}/{}", self.job, self.jobs)
    }
}

// Stems already contain a dot (`geant4_ttbar_mu20.3`), so the suffix is
// appended rather than swapped in with `Path::with_extension`.
fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
