//! Cycle Search Driver: Sweep, Scan, Accept

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{PendulumParams, SearchConfig};
use crate::error::{PendulumError, Result};
use crate::recurrence::{RecurrenceCandidate, RecurrenceScan};
use crate::trajectory::{Sample, Trajectory, TrajectorySampler};

/// Margin around the reachable disc when framing a cycle for display
const FRAME_MARGIN: f64 = 1.1;

/// Snapshot of an accepted trial
#[derive(Debug, Clone)]
pub struct CycleSearchResult {
    /// Sweep index of the trial
    pub trial_index: usize,
    /// Initial condition used for this trial
    pub params: PendulumParams,
    /// Full trajectory of the trial
    pub trajectory: Trajectory,
    /// Every candidate of the trial, ranked
    pub scan: RecurrenceScan,
    /// Lowest-distance candidate passing acceptance
    pub best: RecurrenceCandidate,
}

impl CycleSearchResult {
    /// Samples of the detected cycle, `[tortoise, hare)`
    pub fn cycle_samples(&self) -> &[Sample] {
        &self.trajectory.samples()[self.best.tortoise..self.best.hare]
    }

    /// Cycle duration in simulation time
    pub fn cycle_duration(&self) -> f64 {
        self.best.period(self.trajectory.dt())
    }

    /// Everything an external renderer needs
    pub fn handoff(&self) -> RenderHandoff<'_> {
        RenderHandoff {
            samples: self.cycle_samples(),
            params: &self.params,
            dt: self.trajectory.dt(),
        }
    }
}

/// Read-only view handed to presentation code
#[derive(Debug, Clone, Copy)]
pub struct RenderHandoff<'a> {
    /// Cycle samples, Cartesian columns included
    pub samples: &'a [Sample],
    /// Masses, lengths and gravity of the run
    pub params: &'a PendulumParams,
    /// Time between samples
    pub dt: f64,
}

impl RenderHandoff<'_> {
    /// Side of a square frame centred on the pivot that contains both bobs
    pub fn frame_extent(&self) -> f64 {
        2.0 * self.params.reach() * FRAME_MARGIN
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 * self.dt
    }
}

/// Verdict of one trial
#[derive(Debug, Clone, PartialEq)]
pub enum TrialStatus {
    /// A candidate passed; the lowest-distance one
    Accepted(RecurrenceCandidate),
    /// Nothing passed. `closest` is the lowest-distance candidate long
    /// enough to qualify, if the trajectory had one.
    Rejected { closest: Option<RecurrenceCandidate> },
    /// Integration diverged or ran past its deadline
    Failed(PendulumError),
}

/// Summary line of one trial
#[derive(Debug, Clone, PartialEq)]
pub struct TrialReport {
    /// Sweep index
    pub index: usize,
    /// Offset applied to the swept field
    pub perturbation: f64,
    pub status: TrialStatus,
}

impl TrialReport {
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, TrialStatus::Accepted(_))
    }
}

/// Report and, when accepted, full result of a single trial
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    pub report: TrialReport,
    pub result: Option<CycleSearchResult>,
}

/// Outcome of a sweep
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    results: Vec<CycleSearchResult>,
    trials: Vec<TrialReport>,
}

impl SearchReport {
    /// Accepted trials in sweep order
    pub fn results(&self) -> &[CycleSearchResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<CycleSearchResult> {
        self.results
    }

    /// Every evaluated trial in sweep order
    pub fn trials(&self) -> &[TrialReport] {
        &self.trials
    }

    /// False when the sweep was exhausted without an accepted trial
    pub fn found_cycle(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn first(&self) -> Option<&CycleSearchResult> {
        self.results.first()
    }

    pub fn failed_trials(&self) -> impl Iterator<Item = &TrialReport> {
        self.trials
            .iter()
            .filter(|t| matches!(t.status, TrialStatus::Failed(_)))
    }

    /// Record an outcome. Returns true once `max_results` are collected.
    fn record(&mut self, outcome: TrialOutcome, max_results: usize) -> bool {
        self.trials.push(outcome.report);
        if let Some(result) = outcome.result {
            self.results.push(result);
        }
        self.results.len() >= max_results
    }
}

/// Sweep driver
#[derive(Debug, Clone)]
pub struct CycleSearch {
    config: SearchConfig,
    sampler: TrajectorySampler,
}

impl CycleSearch {
    /// Validate the configuration. Fails before any simulation runs.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let sampler = TrajectorySampler::new(config.sampler)?;
        Ok(Self { config, sampler })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the sweep until `max_results` trials are accepted or the
    /// sweep is exhausted.
    ///
    /// In parallel mode trials are evaluated in batches on the rayon pool
    /// and consumed in sweep order, so the accepted set matches the
    /// sequential run.
    pub fn run(&self) -> SearchReport {
        let SearchConfig {
            sweep,
            sampler,
            max_results,
            parallel,
            ..
        } = &self.config;

        info!(
            trials = sweep.trials,
            field = sweep.field.name(),
            increment = sweep.increment,
            steps = sampler.steps,
            dt = sampler.dt,
            parallel,
            "Starting cycle search"
        );

        let mut report = SearchReport::default();

        if *parallel {
            let batch = rayon::current_num_threads().max(1);
            let mut start = 0;
            'sweep: while start < sweep.trials {
                let end = (start + batch).min(sweep.trials);
                let outcomes: Vec<TrialOutcome> = (start..end)
                    .into_par_iter()
                    .map(|index| self.run_trial(index))
                    .collect();

                for outcome in outcomes {
                    if report.record(outcome, *max_results) {
                        break 'sweep;
                    }
                }
                start = end;
            }
        } else {
            for index in 0..sweep.trials {
                if report.record(self.run_trial(index), *max_results) {
                    break;
                }
            }
        }

        if report.found_cycle() {
            info!(
                accepted = report.results.len(),
                evaluated = report.trials.len(),
                "Cycle search finished"
            );
        } else {
            info!(
                evaluated = report.trials.len(),
                "Sweep exhausted without an accepted cycle"
            );
        }

        report
    }

    /// Simulate, scan and judge a single trial of the sweep.
    pub fn run_trial(&self, index: usize) -> TrialOutcome {
        let sweep = &self.config.sweep;
        let perturbation = sweep.perturbation(index);
        let params = sweep.trial_params(&self.config.base, index);

        let trajectory = match self.sampler.simulate(&params, self.config.trial_deadline) {
            Ok(trajectory) => trajectory,
            Err(err) => {
                warn!(trial = index, error = %err, "Trial failed");
                return TrialOutcome {
                    report: TrialReport {
                        index,
                        perturbation,
                        status: TrialStatus::Failed(err),
                    },
                    result: None,
                };
            }
        };

        let scan = RecurrenceScan::scan(&trajectory);
        let policy = &self.config.acceptance;

        match scan.best_accepted(policy).copied() {
            Some(best) => {
                info!(
                    trial = index,
                    tortoise = best.tortoise,
                    hare = best.hare,
                    span = best.span,
                    distance = best.distance,
                    "Found a cycle"
                );
                TrialOutcome {
                    report: TrialReport {
                        index,
                        perturbation,
                        status: TrialStatus::Accepted(best),
                    },
                    result: Some(CycleSearchResult {
                        trial_index: index,
                        params,
                        trajectory,
                        scan,
                        best,
                    }),
                }
            }
            None => {
                let closest = scan
                    .candidates()
                    .iter()
                    .find(|c| c.span > policy.min_span)
                    .copied();
                debug!(
                    trial = index,
                    closest_distance = closest.map(|c| c.distance),
                    "No candidate passed acceptance"
                );
                info!(trial = index, "Trial done without a cycle");
                TrialOutcome {
                    report: TrialReport {
                        index,
                        perturbation,
                        status: TrialStatus::Rejected { closest },
                    },
                    result: None,
                }
            }
        }
    }
}
