//! Error types for pendulum simulation and cycle search.
//!
//! Three outcomes must stay distinguishable for callers:
//!
//! - **Configuration**: bad input, rejected before any simulation starts
//! - **Numerical instability**: a single trial diverged (non-finite state)
//! - **Deadline**: a single trial ran past its soft wall-clock budget
//!
//! "No cycle found" is not an error. It is an empty
//! [`SearchReport`](crate::SearchReport).

use std::time::Duration;

use thiserror::Error;

/// Coarse classification of a [`PendulumError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid physical or numerical parameters.
    Configuration,
    /// Non-finite coordinate or energy during integration.
    NumericalInstability,
    /// Soft per-trial deadline exceeded.
    Deadline,
}

/// Errors raised by the integrator, the sampler and the search driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PendulumError {
    /// Mass, length, gravity or step size is not finite and strictly positive.
    #[error("Invalid parameter `{name}`: {value} (must be finite and > 0)")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Initial angle or angular velocity is not finite.
    #[error("Invalid initial condition `{name}`: {value} (must be finite)")]
    NonFiniteInitialCondition { name: &'static str, value: f64 },

    /// A trajectory needs at least one sample.
    #[error("Step count must be at least 1")]
    ZeroSteps,

    /// Requested step count is larger than the hard per-trial budget.
    #[error("Step count {requested} exceeds the per-trial budget of {budget}")]
    StepBudgetExceeded { requested: usize, budget: usize },

    /// Sweep with no trials.
    #[error("Sweep must contain at least one trial")]
    EmptySweep,

    /// Acceptance threshold is not usable.
    #[error("Invalid threshold `{name}`: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// Non-finite coordinate or energy detected.
    #[error("Numerical instability: non-finite {quantity}{}", step_suffix(.step))]
    NumericalInstability {
        quantity: &'static str,
        step: Option<usize>,
    },

    /// Soft wall-clock deadline for a single trial.
    #[error("Trial deadline of {limit:?} exceeded at step {step}")]
    DeadlineExceeded { step: usize, limit: Duration },
}

fn step_suffix(step: &Option<usize>) -> String {
    step.map(|s| format!(" at step {s}")).unwrap_or_default()
}

impl PendulumError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NumericalInstability { .. } => ErrorKind::NumericalInstability,
            Self::DeadlineExceeded { .. } => ErrorKind::Deadline,
            _ => ErrorKind::Configuration,
        }
    }

    /// True for errors that reject input before simulation.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.kind(), ErrorKind::Configuration)
    }

    /// Attach the step index to an instability reported by the integrator.
    #[must_use]
    pub fn at_step(self, index: usize) -> Self {
        match self {
            Self::NumericalInstability { quantity, step: None } => Self::NumericalInstability {
                quantity,
                step: Some(index),
            },
            other => other,
        }
    }
}

/// Result type for pendulum operations.
pub type Result<T> = std::result::Result<T, PendulumError>;

/// Require `value` to be finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PendulumError::InvalidParameter { name, value })
    }
}

/// Require `value` to be finite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PendulumError::NonFiniteInitialCondition { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PendulumError::InvalidParameter { name: "m1", value: 0.0 };
        assert!(format!("{err}").contains("m1"));

        let err = PendulumError::NumericalInstability {
            quantity: "p2",
            step: None,
        };
        assert_eq!(format!("{err}"), "Numerical instability: non-finite p2");

        let err = err.at_step(42);
        assert_eq!(
            format!("{err}"),
            "Numerical instability: non-finite p2 at step 42"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(PendulumError::ZeroSteps.kind(), ErrorKind::Configuration);
        assert!(PendulumError::EmptySweep.is_configuration());

        let err = PendulumError::DeadlineExceeded {
            step: 10,
            limit: Duration::from_millis(5),
        };
        assert_eq!(err.kind(), ErrorKind::Deadline);
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_at_step_keeps_existing_index() {
        let err = PendulumError::NumericalInstability {
            quantity: "H",
            step: Some(3),
        };
        assert_eq!(
            err.at_step(99),
            PendulumError::NumericalInstability {
                quantity: "H",
                step: Some(3)
            }
        );
    }

    #[test]
    fn test_ensure_helpers() {
        assert!(ensure_positive("L1", 2.0).is_ok());
        assert!(ensure_positive("L2", -1.0).is_err());
        assert!(ensure_positive("g", f64::NAN).is_err());
        assert!(ensure_finite("theta1", f64::INFINITY).is_err());
        assert!(ensure_finite("omega2", -3.0).is_ok());
    }
}
