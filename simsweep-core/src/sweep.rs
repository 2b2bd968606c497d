//! Parameter sweeps
//!
//! A sweep is a cross product of fixed parameter lists. Each combination
//! becomes one job record pointing at the ODD simulation script, with its
//! own output stem and a freshly drawn random seed.

use rand::Rng;
use std::path::PathBuf;

use crate::domain::JobRecord;

/// Upper bound (inclusive) of the `--rnd-seed` value handed to each job
pub const MAX_RND_SEED: u32 = 10_000;

/// One parameter grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sweep {
    /// Geant4 particle gun shooting muons
    SingleMuon {
        multiplicities: Vec<u32>,
        /// Fixed pT per job in GeV (lower and upper gun range are equal)
        pt_values: Vec<u32>,
        repetitions: u32,
        events: u32,
    },
    /// Geant4 ttbar events with pile-up
    TtbarPileup {
        pileups: Vec<u32>,
        repetitions: u32,
        events: u32,
    },
}

impl Sweep {
    /// Single-muon grid used for the traccc throughput measurements
    pub fn single_muon_default() -> Self {
        Sweep::SingleMuon {
            multiplicities: vec![1, 10, 100],
            pt_values: vec![1, 10, 100],
            repetitions: 10,
            events: 100,
        }
    }

    /// ttbar pile-up grid used for the traccc throughput measurements
    pub fn ttbar_default() -> Self {
        Sweep::TtbarPileup {
            pileups: vec![20, 40, 60, 80, 100, 140, 200, 300],
            repetitions: 50,
            events: 10,
        }
    }

    /// Number of jobs this sweep expands to
    pub fn job_count(&self) -> usize {
        match self {
            Sweep::SingleMuon {
                multiplicities,
                pt_values,
                repetitions,
                ..
            } => multiplicities.len() * pt_values.len() * *repetitions as usize,
            Sweep::TtbarPileup {
                pileups,
                repetitions,
                ..
            } => pileups.len() * *repetitions as usize,
        }
    }

    /// Expands the grid into (name, args) pairs, repetition index innermost
    fn expand(&self) -> Vec<(String, Vec<String>)> {
        let mut entries = Vec::with_capacity(self.job_count());

        match self {
            Sweep::SingleMuon {
                multiplicities,
                pt_values,
                repetitions,
                events,
            } => {
                for nmuon in multiplicities {
                    for pt in pt_values {
                        for i in 0..*repetitions {
                            entries.push((
                                format!("geant4_{}muon_{}GeV.{}", nmuon, pt, i),
                                vec![
                                    "--geant4".to_string(),
                                    "--gun-multiplicity".to_string(),
                                    nmuon.to_string(),
                                    "--gun-pt-range".to_string(),
                                    pt.to_string(),
                                    pt.to_string(),
                                    "--events".to_string(),
                                    events.to_string(),
                                    "--skip".to_string(),
                                    (u64::from(i) * u64::from(*events)).to_string(),
                                ],
                            ));
                        }
                    }
                }
            }
            Sweep::TtbarPileup {
                pileups,
                repetitions,
                events,
            } => {
                for mu in pileups {
                    for i in 0..*repetitions {
                        entries.push((
                            format!("geant4_ttbar_mu{}.{}", mu, i),
                            vec![
                                "--geant4".to_string(),
                                "--ttbar".to_string(),
                                "--ttbar-pu".to_string(),
                                mu.to_string(),
                                "--events".to_string(),
                                events.to_string(),
                                "--skip".to_string(),
                                (u64::from(i) * u64::from(*events)).to_string(),
                            ],
                        ));
                    }
                }
            }
        }

        entries
    }
}

/// Where the generated jobs write to and what they run
#[derive(Debug, Clone)]
pub struct SweepTarget {
    /// Directory receiving every job's output stem
    pub output_dir: PathBuf,
    /// Simulation script, e.g. `<acts>/Examples/Scripts/Python/sim_digi_odd.py`
    pub script: PathBuf,
    /// Digitization config passed as `--digi-config` to every job
    pub digi_config: PathBuf,
}

/// Ordered list of sweeps making up one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepPlan {
    pub sweeps: Vec<Sweep>,
}

impl SweepPlan {
    /// Creates a plan from the given sweeps
    pub fn new(sweeps: Vec<Sweep>) -> Self {
        Self { sweeps }
    }

    /// Plan with no sweeps; builds no jobs
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single-muon sweep followed by the ttbar pile-up sweep
    pub fn odd_default() -> Self {
        Self::new(vec![Sweep::single_muon_default(), Sweep::ttbar_default()])
    }

    /// Total number of jobs across all sweeps
    pub fn job_count(&self) -> usize {
        self.sweeps.iter().map(Sweep::job_count).sum()
    }

    /// Builds the job list
    ///
    /// Seeds are drawn from `rng` in job order, so a seeded generator gives
    /// a reproducible list.
    pub fn build_jobs<R: Rng>(&self, target: &SweepTarget, rng: &mut R) -> Vec<JobRecord> {
        let total = self.job_count();
        let digi_config = target.digi_config.to_string_lossy().into_owned();

        self.sweeps
            .iter()
            .flat_map(Sweep::expand)
            .enumerate()
            .map(|(idx, (name, mut args))| {
                args.push("--digi-config".to_string());
                args.push(digi_config.clone());
                args.push("--rnd-seed".to_string());
                args.push(rng.random_range(0..=MAX_RND_SEED).to_string());

                JobRecord {
                    output: target.output_dir.join(name),
                    args,
                    script: target.script.clone(),
                    job: idx + 1,
                    jobs: total,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn target() -> SweepTarget {
        SweepTarget {
            output_dir: PathBuf::from("/data/odd"),
            script: PathBuf::from("/acts/Examples/Scripts/Python/sim_digi_odd.py"),
            digi_config: PathBuf::from("/opt/simsweep/odd-digi-geometric-config.json"),
        }
    }

    fn arg_after<'a>(args: &'a [String], flag: &str) -> &'a str {
        let pos = args.iter().position(|a| a == flag).unwrap();
        &args[pos + 1]
    }

    #[test]
    fn test_default_plan_job_count() {
        let plan = SweepPlan::odd_default();
        assert_eq!(plan.job_count(), 490);

        let jobs = plan.build_jobs(&target(), &mut StdRng::seed_from_u64(1));
        assert_eq!(jobs.len(), 490);
    }

    #[test]
    fn test_output_stems_unique() {
        let jobs = SweepPlan::odd_default().build_jobs(&target(), &mut StdRng::seed_from_u64(2));
        let stems: HashSet<_> = jobs.iter().map(|j| j.output.clone()).collect();
        assert_eq!(stems.len(), jobs.len());
    }

    #[test]
    fn test_common_arguments_on_every_job() {
        let jobs = SweepPlan::odd_default().build_jobs(&target(), &mut StdRng::seed_from_u64(3));

        for job in &jobs {
            assert_eq!(
                arg_after(&job.args, "--digi-config"),
                "/opt/simsweep/odd-digi-geometric-config.json"
            );
            let seed: u32 = arg_after(&job.args, "--rnd-seed").parse().unwrap();
            assert!(seed <= MAX_RND_SEED);
            assert_eq!(job.script, target().script);
            assert_eq!(job.jobs, 490);
        }
    }

    #[test]
    fn test_job_indices_are_one_based_and_sequential() {
        let jobs = SweepPlan::odd_default().build_jobs(&target(), &mut StdRng::seed_from_u64(4));
        let indices: Vec<_> = jobs.iter().map(|j| j.job).collect();
        let expected: Vec<_> = (1..=490).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_single_muon_naming_and_arguments() {
        let jobs = SweepPlan::odd_default().build_jobs(&target(), &mut StdRng::seed_from_u64(5));

        // multiplicity 1, pT 10 GeV, repetition 3
        let job = &jobs[13];
        assert_eq!(job.output, PathBuf::from("/data/odd/geant4_1muon_10GeV.3"));
        assert_eq!(
            &job.args[..10],
            &[
                "--geant4",
                "--gun-multiplicity",
                "1",
                "--gun-pt-range",
                "10",
                "10",
                "--events",
                "100",
                "--skip",
                "300",
            ]
        );
    }

    #[test]
    fn test_ttbar_naming_and_arguments() {
        let jobs = SweepPlan::odd_default().build_jobs(&target(), &mut StdRng::seed_from_u64(6));

        // First ttbar job follows the 90 single-muon jobs
        assert_eq!(jobs[90].output, PathBuf::from("/data/odd/geant4_ttbar_mu20.0"));

        let last = jobs.last().unwrap();
        assert_eq!(last.output, PathBuf::from("/data/odd/geant4_ttbar_mu300.49"));
        assert_eq!(
            &last.args[..8],
            &[
                "--geant4",
                "--ttbar",
                "--ttbar-pu",
                "300",
                "--events",
                "10",
                "--skip",
                "490",
            ]
        );
    }

    #[test]
    fn test_empty_plan_builds_nothing() {
        let plan = SweepPlan::empty();
        assert_eq!(plan.job_count(), 0);
        assert!(plan.build_jobs(&target(), &mut StdRng::seed_from_u64(7)).is_empty());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let plan = SweepPlan::odd_default();
        let first = plan.build_jobs(&target(), &mut StdRng::seed_from_u64(42));
        let second = plan.build_jobs(&target(), &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_sweep_count() {
        let plan = SweepPlan::new(vec![Sweep::TtbarPileup {
            pileups: vec![200],
            repetitions: 3,
            events: 5,
        }]);
        let jobs = plan.build_jobs(&target(), &mut StdRng::seed_from_u64(8));
        assert_eq!(jobs.len(), 3);
        assert_eq!(arg_after(&jobs[2].args, "--skip"), "10");
        assert!(jobs.iter().all(|j| j.jobs == 3));
    }
}
