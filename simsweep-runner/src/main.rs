//! Simsweep Runner
//!
//! Launches the ODD simulation sweep used for traccc performance studies.
//!
//! Architecture:
//! - Configuration: command line flags with environment fallbacks
//! - Services: launching a single simulation job with its logs redirected
//! - Scheduler: fixed-width worker pool draining the job list
//!
//! Every job writes `<output>.out` and `<output>.err` into the output
//! directory. A job exiting non-zero does not fail the batch.

mod batch;
mod config;
mod error;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use simsweep_core::sweep::SweepPlan;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, DEFAULT_PYTHON, DEFAULT_WORKERS};
use crate::service::{ExecutionService, ProcessExecutionService};

#[derive(Parser)]
#[command(name = "simsweep")]
#[command(about = "ODD simulation sweep runner", long_about = None)]
struct Cli {
    /// ACTS source directory
    #[arg(short, long, env = "SIMSWEEP_ACTS_DIR")]
    acts_dir: PathBuf,

    /// Output directory, created if missing
    #[arg(short, long, env = "SIMSWEEP_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Number of simulations to run at once
    #[arg(short = 'j', long, env = "SIMSWEEP_WORKERS", default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Interpreter for the simulation script
    #[arg(long, env = "SIMSWEEP_PYTHON", default_value = DEFAULT_PYTHON)]
    python: String,

    /// Digitization config [default: odd-digi-geometric-config.json in the runner crate directory]
    #[arg(long, env = "SIMSWEEP_DIGI_CONFIG")]
    digi_config: Option<PathBuf>,

    /// Seed for the per-job random seeds
    #[arg(long, env = "SIMSWEEP_SEED")]
    seed: Option<u64>,

    /// Print the job list as JSON instead of running it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so that --dry-run output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simsweep_runner=info,simsweep_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let digi_config = match cli.digi_config {
        Some(path) => path,
        None => config::default_digi_config(),
    };

    let mut config = Config::new(cli.acts_dir, cli.output_dir, digi_config);
    config.python = cli.python;
    config.workers = cli.workers;
    config.seed = cli.seed;
    config.dry_run = cli.dry_run;
    config.validate().context("Invalid configuration")?;

    if !config.digi_config.is_file() {
        warn!(
            "Digitization config {} not found; jobs will fail to load it",
            config.digi_config.display()
        );
    }

    info!(
        "Loaded configuration: script={}, output_dir={}, workers={}",
        config.script_path().display(),
        config.output_dir.display(),
        config.workers
    );

    let plan = SweepPlan::odd_default();

    if config.dry_run {
        let jobs = batch::plan_jobs(&config, &plan);
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    let service: Arc<dyn ExecutionService> =
        Arc::new(ProcessExecutionService::new(config.python.clone()));

    let summary = batch::run_batch(&config, &plan, service).await?;
    info!("Sweep finished: {} job(s) run", summary.completed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags_and_defaults() {
        let cli = Cli::try_parse_from(["simsweep", "-a", "/opt/acts", "-o", "/data/odd"]).unwrap();
        assert_eq!(cli.acts_dir, PathBuf::from("/opt/acts"));
        assert_eq!(cli.output_dir, PathBuf::from("/data/odd"));
        assert_eq!(cli.workers, DEFAULT_WORKERS);
        assert_eq!(cli.python, DEFAULT_PYTHON);
        assert!(cli.digi_config.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_value_flags_have_env_fallbacks() {
        let command = Cli::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|env| env.to_string_lossy().into_owned())
        };

        assert_eq!(env_of("seed").as_deref(), Some("SIMSWEEP_SEED"));
        assert_eq!(env_of("workers").as_deref(), Some("SIMSWEEP_WORKERS"));
        assert_eq!(env_of("acts_dir").as_deref(), Some("SIMSWEEP_ACTS_DIR"));
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "simsweep",
            "--acts-dir",
            "/opt/acts",
            "--output-dir",
            "/data/odd",
            "--workers",
            "4",
            "--seed",
            "7",
            "--digi-config",
            "/etc/odd-digi.json",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.workers, 4);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.digi_config, Some(PathBuf::from("/etc/odd-digi.json")));
        assert!(cli.dry_run);
    }
}
