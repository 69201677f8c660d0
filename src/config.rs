//! Configuration: Physical Parameters, Sweep and Acceptance Policy
//!
//! All numerical inputs are explicit values passed to the simulation.
//! Nothing here is process-wide state.
//!
//! ```text
//! SearchConfig
//! ├── base:        PendulumParams   (g, m1, m2, θ1, θ2, L1, L2, ω1, ω2)
//! ├── sweep:       SweepSpec        (trials, increment, perturbed field)
//! ├── sampler:     SamplerConfig    (dt, steps, RK4 sub-steps)
//! ├── acceptance:  AcceptancePolicy (distance < d_max, span > s_min)
//! └── limits:      max_results, max_trial_steps, trial_deadline
//! ```

use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_positive, PendulumError, Result};

/// Physical parameters and initial condition of a double pendulum.
///
/// Angles are measured from the downward vertical, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PendulumParams {
    /// Gravitational acceleration
    pub g: f64,
    /// Upper bob mass
    pub m1: f64,
    /// Lower bob mass
    pub m2: f64,
    /// Initial angle of the upper link
    pub theta1: f64,
    /// Initial angle of the lower link
    pub theta2: f64,
    /// Upper link length
    pub l1: f64,
    /// Lower link length
    pub l2: f64,
    /// Initial angular velocity of the upper link
    pub omega1: f64,
    /// Initial angular velocity of the lower link
    pub omega2: f64,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            g: 9.81,
            m1: 1.0,
            m2: 2.0,
            theta1: FRAC_PI_2,
            theta2: 0.0,
            l1: 2.0,
            l2: 1.0,
            omega1: 0.0,
            omega2: 0.0,
        }
    }
}

impl PendulumParams {
    /// Base state of the cycle search: both links horizontal, at rest.
    #[must_use]
    pub fn cycle_search_base() -> Self {
        Self {
            theta2: FRAC_PI_2,
            ..Self::default()
        }
    }

    /// Set the initial angles.
    #[must_use]
    pub const fn with_angles(mut self, theta1: f64, theta2: f64) -> Self {
        self.theta1 = theta1;
        self.theta2 = theta2;
        self
    }

    /// Set the initial angular velocities.
    #[must_use]
    pub const fn with_angular_velocities(mut self, omega1: f64, omega2: f64) -> Self {
        self.omega1 = omega1;
        self.omega2 = omega2;
        self
    }

    /// Set bob masses.
    #[must_use]
    pub const fn with_masses(mut self, m1: f64, m2: f64) -> Self {
        self.m1 = m1;
        self.m2 = m2;
        self
    }

    /// Set link lengths.
    #[must_use]
    pub const fn with_lengths(mut self, l1: f64, l2: f64) -> Self {
        self.l1 = l1;
        self.l2 = l2;
        self
    }

    /// Read one initial-condition field.
    #[must_use]
    pub const fn field(&self, field: InitialField) -> f64 {
        match field {
            InitialField::Theta1 => self.theta1,
            InitialField::Theta2 => self.theta2,
            InitialField::Omega1 => self.omega1,
            InitialField::Omega2 => self.omega2,
        }
    }

    /// Copy with one initial-condition field replaced.
    #[must_use]
    pub const fn with_field(mut self, field: InitialField, value: f64) -> Self {
        match field {
            InitialField::Theta1 => self.theta1 = value,
            InitialField::Theta2 => self.theta2 = value,
            InitialField::Omega1 => self.omega1 = value,
            InitialField::Omega2 => self.omega2 = value,
        }
        self
    }

    /// Total length of both links (radius of the reachable disc).
    #[must_use]
    pub fn reach(&self) -> f64 {
        self.l1 + self.l2
    }

    /// Reject non-positive masses, lengths or gravity and non-finite
    /// initial conditions.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("g", self.g)?;
        ensure_positive("m1", self.m1)?;
        ensure_positive("m2", self.m2)?;
        ensure_positive("L1", self.l1)?;
        ensure_positive("L2", self.l2)?;
        ensure_finite("theta1", self.theta1)?;
        ensure_finite("theta2", self.theta2)?;
        ensure_finite("omega1", self.omega1)?;
        ensure_finite("omega2", self.omega2)?;
        Ok(())
    }
}

/// Initial-condition field perturbed by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InitialField {
    Theta1,
    Theta2,
    Omega1,
    Omega2,
}

impl InitialField {
    /// Short display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Theta1 => "theta1",
            Self::Theta2 => "theta2",
            Self::Omega1 => "omega1",
            Self::Omega2 => "omega2",
        }
    }
}

/// One-parameter sweep: trial `k` sets `field = base + increment * k`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SweepSpec {
    /// Number of trials
    pub trials: usize,
    /// Perturbation added per trial index
    pub increment: f64,
    /// Field being perturbed
    pub field: InitialField,
}

impl Default for SweepSpec {
    fn default() -> Self {
        Self {
            trials: 10,
            increment: 1e-5,
            field: InitialField::Omega2,
        }
    }
}

impl SweepSpec {
    /// Offset applied at a given trial index.
    #[must_use]
    pub fn perturbation(&self, trial: usize) -> f64 {
        self.increment * trial as f64
    }

    /// Initial condition of a given trial.
    #[must_use]
    pub fn trial_params(&self, base: &PendulumParams, trial: usize) -> PendulumParams {
        base.with_field(self.field, base.field(self.field) + self.perturbation(trial))
    }

    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(PendulumError::EmptySweep);
        }
        if !self.increment.is_finite() {
            return Err(PendulumError::NonFiniteInitialCondition {
                name: "increment",
                value: self.increment,
            });
        }
        Ok(())
    }
}

/// Acceptance filter for recurrence candidates.
///
/// Both comparisons are strict: `distance < max_distance` and
/// `span > min_span`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcceptancePolicy {
    /// Phase-space distance threshold
    pub max_distance: f64,
    /// Minimum span in samples
    pub min_span: usize,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            max_distance: 0.4,
            min_span: 500,
        }
    }
}

impl AcceptancePolicy {
    #[must_use]
    pub const fn new(max_distance: f64, min_span: usize) -> Self {
        Self {
            max_distance,
            min_span,
        }
    }

    /// Does a `(distance, span)` pair pass?
    #[must_use]
    pub fn accepts(&self, distance: f64, span: usize) -> bool {
        distance < self.max_distance && span > self.min_span
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_distance.is_finite() && self.max_distance > 0.0 {
            Ok(())
        } else {
            Err(PendulumError::InvalidThreshold {
                name: "max_distance",
                value: self.max_distance,
            })
        }
    }
}

/// Step size and count for one trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplerConfig {
    /// Time between recorded samples
    pub dt: f64,
    /// Number of samples (and steps) in the trajectory
    pub steps: usize,
    /// Equal RK4 sub-steps per recorded step
    pub substeps: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            dt: 1e-3,
            steps: 10_000,
            substeps: 1,
        }
    }
}

impl SamplerConfig {
    #[must_use]
    pub const fn new(dt: f64, steps: usize) -> Self {
        Self {
            dt,
            steps,
            substeps: 1,
        }
    }

    /// Split each recorded step into `substeps` integration steps.
    #[must_use]
    pub const fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps;
        self
    }

    /// Simulated duration covered by the trajectory.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.dt * self.steps as f64
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("dt", self.dt)?;
        if self.steps == 0 {
            return Err(PendulumError::ZeroSteps);
        }
        if self.substeps == 0 {
            return Err(PendulumError::InvalidParameter {
                name: "substeps",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Full configuration of a cycle search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Base physical parameters and initial condition
    pub base: PendulumParams,
    /// Parameter sweep
    pub sweep: SweepSpec,
    /// Per-trial trajectory settings
    pub sampler: SamplerConfig,
    /// Candidate filter
    pub acceptance: AcceptancePolicy,
    /// Stop after this many accepted trials
    pub max_results: usize,
    /// Evaluate trials on the rayon thread pool
    pub parallel: bool,
    /// Hard cap on steps per trial
    pub max_trial_steps: usize,
    /// Soft wall-clock limit per trial
    pub trial_deadline: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base: PendulumParams::cycle_search_base(),
            sweep: SweepSpec::default(),
            sampler: SamplerConfig::new(1e-2, 100_000),
            acceptance: AcceptancePolicy::default(),
            max_results: 1,
            parallel: false,
            max_trial_steps: 10_000_000,
            trial_deadline: None,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn with_base(mut self, base: PendulumParams) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub fn with_sweep(mut self, sweep: SweepSpec) -> Self {
        self.sweep = sweep;
        self
    }

    #[must_use]
    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    #[must_use]
    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Collect up to `k` accepted trials instead of stopping at the first.
    #[must_use]
    pub fn with_max_results(mut self, k: usize) -> Self {
        self.max_results = k;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_trial_deadline(mut self, deadline: Duration) -> Self {
        self.trial_deadline = Some(deadline);
        self
    }

    /// Validate every section. Also checks that every trial of the sweep
    /// produces a valid initial condition.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.sweep.validate()?;
        self.sampler.validate()?;
        self.acceptance.validate()?;

        if self.max_results == 0 {
            return Err(PendulumError::InvalidParameter {
                name: "max_results",
                value: 0.0,
            });
        }
        if self.sampler.steps > self.max_trial_steps {
            return Err(PendulumError::StepBudgetExceeded {
                requested: self.sampler.steps,
                budget: self.max_trial_steps,
            });
        }

        let last = self.sweep.trials - 1;
        self.sweep.trial_params(&self.base, last).validate()
    }
}
