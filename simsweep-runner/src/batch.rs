//! Batch driver
//!
//! Ties the pieces together for one invocation: build the job list from the
//! sweep plan, make sure the output directory exists, then hand everything
//! to the worker pool.

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use simsweep_core::domain::JobRecord;
use simsweep_core::sweep::{SweepPlan, SweepTarget};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::scheduler::{PoolSummary, WorkerPool};
use crate::service::ExecutionService;

/// Expands the plan into job records for this configuration
pub fn plan_jobs(config: &Config, plan: &SweepPlan) -> Vec<JobRecord> {
    let target = SweepTarget {
        output_dir: config.output_dir.clone(),
        script: config.script_path(),
        digi_config: config.digi_config.clone(),
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    plan.build_jobs(&target, &mut rng)
}

/// Creates the output directory (and parents) if it does not exist yet
pub async fn prepare_output_dir(dir: &Path) -> Result<()> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        info!("Creating output directory {}", dir.display());
    }

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

/// Runs the whole batch
pub async fn run_batch(
    config: &Config,
    plan: &SweepPlan,
    service: Arc<dyn ExecutionService>,
) -> Result<PoolSummary> {
    prepare_output_dir(&config.output_dir).await?;

    let jobs = plan_jobs(config, plan);
    info!("Prepared {} simulation job(s)", jobs.len());

    WorkerPool::new(config.workers, service).run(jobs).await
}
