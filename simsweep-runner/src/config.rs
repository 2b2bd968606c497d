//! Runner configuration
//!
//! Collects everything the sweep needs from the command line: where ACTS
//! lives, where the outputs go, how wide the worker pool is and how the
//! simulation script gets launched.

use std::path::{Path, PathBuf};

/// Default number of concurrent simulation jobs
pub const DEFAULT_WORKERS: usize = 32;

/// Default interpreter for the simulation script
pub const DEFAULT_PYTHON: &str = "python3";

/// File name of the ODD geometric digitization config
pub const DIGI_CONFIG_FILE: &str = "odd-digi-geometric-config.json";

/// Simulation script, relative to the ACTS source directory
const SIM_SCRIPT: &str = "Examples/Scripts/Python/sim_digi_odd.py";

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// ACTS source directory holding the simulation script
    pub acts_dir: PathBuf,

    /// Directory receiving the per-job `.out`/`.err` files
    pub output_dir: PathBuf,

    /// Digitization config handed to every job
    pub digi_config: PathBuf,

    /// Interpreter used to run the simulation script
    pub python: String,

    /// Worker pool width
    pub workers: usize,

    /// Seed for the per-job `--rnd-seed` draws; entropy when unset
    pub seed: Option<u64>,

    /// Only print the job list
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(acts_dir: PathBuf, output_dir: PathBuf, digi_config: PathBuf) -> Self {
        Self {
            acts_dir,
            output_dir,
            digi_config,
            python: DEFAULT_PYTHON.to_string(),
            workers: DEFAULT_WORKERS,
            seed: None,
            dry_run: false,
        }
    }

    /// Full path of the ODD simulation script
    pub fn script_path(&self) -> PathBuf {
        self.acts_dir.join(SIM_SCRIPT)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.acts_dir.as_os_str().is_empty() {
            anyhow::bail!("acts_dir cannot be empty");
        }

        if self.output_dir.as_os_str().is_empty() {
            anyhow::bail!("output_dir cannot be empty");
        }

        if self.digi_config.as_os_str().is_empty() {
            anyhow::bail!("digi_config cannot be empty");
        }

        if self.python.trim().is_empty() {
            anyhow::bail!("python interpreter cannot be empty");
        }

        if self.workers == 0 {
            anyhow::bail!("workers must be greater than 0");
        }

        Ok(())
    }
}

/// Location of the digitization config when none is given explicitly
///
/// The config lives in the runner's source directory, alongside this crate's
/// `Cargo.toml`.
pub fn default_digi_config() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DIGI_CONFIG_FILE)
}
