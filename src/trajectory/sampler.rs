//! Trajectory Sampler: Observe, Then Advance

use std::f64::consts::PI;
use std::ops::Range;
use std::time::{Duration, Instant};

use ndarray::Array2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{PendulumParams, SamplerConfig};
use crate::error::{PendulumError, Result};
use crate::systems::{CartesianPositions, DoublePendulum, HamiltonianSystem};

/// Steps between wall-clock deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 1024;

/// One recorded step of a trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Potential energy V
    pub v: f64,
    /// Kinetic energy K
    pub k: f64,
    /// Total mechanical energy H = V + K
    pub h: f64,
    /// Upper link angle (unwrapped)
    pub theta1: f64,
    /// Lower link angle (unwrapped)
    pub theta2: f64,
    /// Momentum conjugate to θ₁
    pub p1: f64,
    /// Momentum conjugate to θ₂
    pub p2: f64,
    /// Upper bob x
    pub x1: f64,
    /// Upper bob y
    pub y1: f64,
    /// Lower bob x
    pub x2: f64,
    /// Lower bob y
    pub y2: f64,
}

impl Sample {
    /// Record the current state of a system.
    pub fn observe(system: &DoublePendulum) -> Self {
        let v = system.potential_energy();
        let k = system.kinetic_energy();
        let pos = system.cartesian();

        Self {
            v,
            k,
            h: v + k,
            theta1: system.theta1(),
            theta2: system.theta2(),
            p1: system.p1(),
            p2: system.p2(),
            x1: pos.x1,
            y1: pos.y1,
            x2: pos.x2,
            y2: pos.y2,
        }
    }

    /// Canonical coordinates [θ₁, θ₂, p₁, p₂]
    #[must_use]
    pub const fn phase(&self) -> [f64; 4] {
        [self.theta1, self.theta2, self.p1, self.p2]
    }

    #[must_use]
    pub const fn cartesian(&self) -> CartesianPositions {
        CartesianPositions {
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        }
    }

    /// Angles reduced to (−π, π], for display only.
    #[must_use]
    pub fn wrapped_angles(&self) -> (f64, f64) {
        (wrap_angle(self.theta1), wrap_angle(self.theta2))
    }

    fn check_finite(&self) -> Result<()> {
        let energies = [("V", self.v), ("K", self.k), ("H", self.h)];
        match energies.iter().find(|(_, value)| !value.is_finite()) {
            Some(&(quantity, _)) => Err(PendulumError::NumericalInstability {
                quantity,
                step: None,
            }),
            None => Ok(()),
        }
    }
}

fn wrap_angle(theta: f64) -> f64 {
    let wrapped = (theta + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Time-ordered, immutable sequence of samples
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trajectory {
    samples: Vec<Sample>,
    dt: f64,
}

impl Trajectory {
    /// Wrap already recorded samples taken `dt` apart.
    #[must_use]
    pub fn from_samples(samples: Vec<Sample>, dt: f64) -> Self {
        Self { samples, dt }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sub-slice `[start, end)`, `None` if out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Option<&[Sample]> {
        self.samples.get(range)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Time between samples
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Simulation time of sample `index`
    pub fn time_of(&self, index: usize) -> f64 {
        index as f64 * self.dt
    }

    /// Phase-space points as an `[N, 4]` matrix of (θ₁, θ₂, p₁, p₂)
    pub fn phase_points(&self) -> Array2<f64> {
        let n = self.samples.len();
        let mut points = Array2::zeros((n, 4));

        for (i, sample) in self.samples.iter().enumerate() {
            for (d, value) in sample.phase().into_iter().enumerate() {
                points[[i, d]] = value;
            }
        }

        points
    }

    /// Largest |H(i) − H(0)| over the trajectory
    pub fn max_energy_drift(&self) -> f64 {
        let Some(first) = self.samples.first() else {
            return 0.0;
        };
        self.samples
            .iter()
            .map(|s| (s.h - first.h).abs())
            .fold(0.0, f64::max)
    }

    /// Largest drift relative to |H(0)|; `None` when H(0) is zero.
    pub fn relative_energy_drift(&self) -> Option<f64> {
        let h0 = self.samples.first()?.h.abs();
        if h0 < f64::EPSILON {
            None
        } else {
            Some(self.max_energy_drift() / h0)
        }
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Drives a system for a fixed step budget and records every step
#[derive(Debug, Clone, Copy)]
pub struct TrajectorySampler {
    config: SamplerConfig,
}

impl TrajectorySampler {
    /// Create a sampler; rejects non-positive `dt` and zero steps.
    pub fn new(config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Build a system from `params` and sample it.
    pub fn simulate(
        &self,
        params: &PendulumParams,
        deadline: Option<Duration>,
    ) -> Result<Trajectory> {
        let mut system = DoublePendulum::from_params(params)?;
        self.sample(&mut system, deadline)
    }

    /// Record exactly `steps` samples, advancing the system between them.
    ///
    /// The system is left at the last recorded state, `steps − 1` steps
    /// after the one it started from.
    ///
    /// Integrator failures are returned with the offending step index.
    /// With a `deadline`, the run is abandoned once the wall-clock limit
    /// is reached.
    pub fn sample(
        &self,
        system: &mut DoublePendulum,
        deadline: Option<Duration>,
    ) -> Result<Trajectory> {
        let SamplerConfig { dt, steps, substeps } = self.config;
        let sub_dt = dt / substeps as f64;
        let started = Instant::now();
        let mut samples = Vec::with_capacity(steps);

        for step in 0..steps {
            if let Some(limit) = deadline {
                if step % DEADLINE_CHECK_INTERVAL == 0 && started.elapsed() >= limit {
                    return Err(PendulumError::DeadlineExceeded { step, limit });
                }
            }

            let sample = Sample::observe(system);
            sample.check_finite().map_err(|e| e.at_step(step))?;
            samples.push(sample);

            // The state after the last sample is never recorded
            if step + 1 == steps {
                break;
            }
            for _ in 0..substeps {
                system.time_step(sub_dt).map_err(|e| e.at_step(step))?;
            }
        }

        let trajectory = Trajectory::from_samples(samples, dt);
        debug!(
            steps,
            dt,
            energy_drift = trajectory.max_energy_drift(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Sampled trajectory"
        );

        Ok(trajectory)
    }
}
