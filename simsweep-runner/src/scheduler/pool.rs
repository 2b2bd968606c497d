//! Worker pool
//!
//! A fixed number of worker tasks pull job records from a bounded channel.
//! Each worker runs its jobs one after another, so no more than `width`
//! simulations are alive at any instant.

use anyhow::Result;
use simsweep_core::domain::JobRecord;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::service::ExecutionService;

/// Outcome of a pool run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSummary {
    /// Jobs whose process was launched and waited on
    pub completed: usize,
}

/// Fixed-width pool running jobs through an execution service
pub struct WorkerPool {
    width: usize,
    service: Arc<dyn ExecutionService>,
}

impl WorkerPool {
    /// Creates a pool of `width` workers; a width of 0 is treated as 1
    pub fn new(width: usize, service: Arc<dyn ExecutionService>) -> Self {
        Self {
            width: width.max(1),
            service,
        }
    }

    /// Runs every job and waits for all of them
    ///
    /// A launch failure does not stop the other jobs. The first failure is
    /// returned once the whole list has been processed.
    pub async fn run(&self, jobs: Vec<JobRecord>) -> Result<PoolSummary> {
        if jobs.is_empty() {
            info!("No jobs to run");
            return Ok(PoolSummary { completed: 0 });
        }

        let workers = self.width.min(jobs.len());
        info!("Running {} job(s) on {} worker(s)", jobs.len(), workers);

        let (tx, rx) = mpsc::channel::<JobRecord>(self.width);
        let rx = Arc::new(Mutex::new(rx));

        let feeder = tokio::spawn(async move {
            for job in jobs {
                if tx.send(job).await.is_err() {
                    debug!("All workers stopped, dropping remaining jobs");
                    break;
                }
            }
        });

        let mut set = JoinSet::new();
        for worker_id in 0..workers {
            set.spawn(Self::worker_loop(
                worker_id,
                Arc::clone(&rx),
                Arc::clone(&self.service),
            ));
        }

        let mut completed = 0;
        let mut first_error = None;

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(report) => {
                    completed += report.completed;
                    if let Some(e) = report.first_error {
                        first_error.get_or_insert(e);
                    }
                }
                Err(e) => {
                    warn!("Worker task panicked: {}", e);
                    first_error
                        .get_or_insert_with(|| anyhow::anyhow!("Worker task panicked: {}", e));
                }
            }
        }

        // Dropping the last receiver handle unblocks a feeder left waiting
        // after a worker panic
        drop(rx);
        if let Err(e) = feeder.await {
            warn!("Job feeder panicked: {}", e);
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("All {} job(s) finished", completed);
                Ok(PoolSummary { completed })
            }
        }
    }

    /// Pulls and runs jobs until the channel drains
    async fn worker_loop(
        worker_id: usize,
        rx: Arc<Mutex<mpsc::Receiver<JobRecord>>>,
        service: Arc<dyn ExecutionService>,
    ) -> WorkerReport {
        let mut report = WorkerReport::default();

        loop {
            let next = rx.lock().await.recv().await;
            let Some(job) = next else {
                break;
            };

            match service.run_job(&job).await {
                Ok(()) => report.completed += 1,
                Err(e) => {
                    error!("Job {} could not be run: {}", job.progress(), e);
                    report.first_error.get_or_insert(e.into());
                }
            }
        }

        debug!(
            "Worker {} finished after {} job(s)",
            worker_id, report.completed
        );
        report
    }
}

/// What a single worker did before the channel drained
#[derive(Default)]
struct WorkerReport {
    completed: usize,
    first_error: Option<anyhow::Error>,
}
