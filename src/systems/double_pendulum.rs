//! Double Pendulum: Hamiltonian Formulation
//!
//! Two point masses m₁, m₂ on massless rigid links of lengths L₁, L₂.
//! Angles θ₁, θ₂ are measured from the downward vertical. With
//! Δ = θ₁ − θ₂ and D = m₁ + m₂ sin²Δ the Hamiltonian is
//!
//!   H = [m₂L₂²p₁² + (m₁+m₂)L₁²p₂² − 2m₂L₁L₂p₁p₂ cosΔ] / (2m₂L₁²L₂²D)
//!       − (m₁+m₂)gL₁ cosθ₁ − m₂gL₂ cosθ₂
//!
//! and Hamilton's equations read
//!
//!   dθ₁/dt = (L₂p₁ − L₁p₂ cosΔ) / (L₁²L₂D)
//!   dθ₂/dt = ((m₁+m₂)L₁p₂ − m₂L₂p₁ cosΔ) / (m₂L₁L₂²D)
//!   dp₁/dt = −(m₁+m₂)gL₁ sinθ₁ − C₁ + C₂
//!   dp₂/dt = −m₂gL₂ sinθ₂ + C₁ − C₂
//!
//! with
//!
//!   C₁ = p₁p₂ sinΔ / (L₁L₂D)
//!   C₂ = [m₂L₂²p₁² + (m₁+m₂)L₁²p₂² − 2m₂L₁L₂p₁p₂ cosΔ] sin2Δ / (2L₁²L₂²D²)
//!
//! D ≥ m₁ > 0, so the equations have no singular configuration. Aligned
//! links (θ₁ = θ₂) are regular.
//!
//! ## Integration
//!
//! Classical RK4 on (θ₁, θ₂, p₁, p₂). Angles are never wrapped: wrapping
//! would introduce jumps into the phase-space trajectory.

use ndarray::{array, Array1};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::traits::HamiltonianSystem;
use crate::config::PendulumParams;
use crate::error::{ensure_positive, PendulumError, Result};

const COORDINATE_NAMES: [&str; 4] = ["theta1", "theta2", "p1", "p2"];

/// Canonical state snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HamiltonianState {
    /// Upper link angle
    pub theta1: f64,
    /// Lower link angle
    pub theta2: f64,
    /// Momentum conjugate to θ₁
    pub p1: f64,
    /// Momentum conjugate to θ₂
    pub p2: f64,
    /// Simulation time
    pub time: f64,
}

/// Cartesian positions of both bobs, pivot at the origin, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CartesianPositions {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CartesianPositions {
    /// Joint positions for given angles and link lengths.
    #[must_use]
    pub fn from_angles(theta1: f64, theta2: f64, l1: f64, l2: f64) -> Self {
        let x1 = l1 * theta1.sin();
        let y1 = -l1 * theta1.cos();
        let x2 = x1 + l2 * theta2.sin();
        let y2 = y1 - l2 * theta2.cos();
        Self { x1, y1, x2, y2 }
    }
}

/// Double pendulum integrated in canonical coordinates
#[derive(Debug, Clone)]
pub struct DoublePendulum {
    /// Gravitational acceleration
    g: f64,
    /// Upper bob mass
    m1: f64,
    /// Lower bob mass
    m2: f64,
    /// Upper link length
    l1: f64,
    /// Lower link length
    l2: f64,
    /// Canonical coordinates [θ₁, θ₂, p₁, p₂]
    coords: Array1<f64>,
    /// Current time
    time: f64,
}

impl DoublePendulum {
    /// Create a double pendulum from angles and angular velocities.
    ///
    /// # Arguments
    /// * `g` - Gravitational acceleration
    /// * `m1`, `m2` - Bob masses
    /// * `theta1`, `theta2` - Initial angles from the downward vertical
    /// * `omega1`, `omega2` - Initial angular velocities
    /// * `l1`, `l2` - Link lengths
    ///
    /// Angular velocities are converted to canonical momenta through the
    /// mass matrix. Non-positive masses, lengths or gravity are rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        g: f64,
        m1: f64,
        m2: f64,
        theta1: f64,
        theta2: f64,
        omega1: f64,
        omega2: f64,
        l1: f64,
        l2: f64,
    ) -> Result<Self> {
        Self::from_params(&PendulumParams {
            g,
            m1,
            m2,
            theta1,
            theta2,
            l1,
            l2,
            omega1,
            omega2,
        })
    }

    /// Create from a parameter record.
    pub fn from_params(params: &PendulumParams) -> Result<Self> {
        params.validate()?;

        let PendulumParams {
            g,
            m1,
            m2,
            theta1,
            theta2,
            l1,
            l2,
            omega1,
            omega2,
        } = *params;

        // p = M(θ) ω
        let c = (theta1 - theta2).cos();
        let p1 = (m1 + m2) * l1 * l1 * omega1 + m2 * l1 * l2 * omega2 * c;
        let p2 = m2 * l2 * l2 * omega2 + m2 * l1 * l2 * omega1 * c;

        Ok(Self {
            g,
            m1,
            m2,
            l1,
            l2,
            coords: array![theta1, theta2, p1, p2],
            time: 0.0,
        })
    }

    /// Angular velocities ω = M(θ)⁻¹ p for a coordinate vector.
    fn velocities_of(&self, y: &Array1<f64>) -> (f64, f64) {
        let (m1, m2, l1, l2) = (self.m1, self.m2, self.l1, self.l2);
        let (p1, p2) = (y[2], y[3]);
        let delta = y[0] - y[1];
        let c = delta.cos();
        let s = delta.sin();
        let d = m1 + m2 * s * s;

        let w1 = (l2 * p1 - l1 * p2 * c) / (l1 * l1 * l2 * d);
        let w2 = ((m1 + m2) * l1 * p2 - m2 * l2 * p1 * c) / (m2 * l1 * l2 * l2 * d);
        (w1, w2)
    }

    /// Right-hand side of Hamilton's equations.
    fn derivative(&self, y: &Array1<f64>) -> Array1<f64> {
        let (g, m1, m2, l1, l2) = (self.g, self.m1, self.m2, self.l1, self.l2);
        let (theta1, theta2, p1, p2) = (y[0], y[1], y[2], y[3]);
        let delta = theta1 - theta2;
        let c = delta.cos();
        let s = delta.sin();
        let d = m1 + m2 * s * s;

        let (w1, w2) = self.velocities_of(y);

        let c1 = p1 * p2 * s / (l1 * l2 * d);
        let numerator =
            m2 * l2 * l2 * p1 * p1 + (m1 + m2) * l1 * l1 * p2 * p2 - 2.0 * m2 * l1 * l2 * p1 * p2 * c;
        let c2 = numerator * (2.0 * delta).sin() / (2.0 * l1 * l1 * l2 * l2 * d * d);

        let dp1 = -(m1 + m2) * g * l1 * theta1.sin() - c1 + c2;
        let dp2 = -m2 * g * l2 * theta2.sin() + c1 - c2;

        array![w1, w2, dp1, dp2]
    }

    /// Angular velocities (ω₁, ω₂) of the current state
    pub fn angular_velocities(&self) -> (f64, f64) {
        self.velocities_of(&self.coords)
    }

    /// Cartesian positions of both bobs
    pub fn cartesian(&self) -> CartesianPositions {
        CartesianPositions::from_angles(self.coords[0], self.coords[1], self.l1, self.l2)
    }

    pub fn theta1(&self) -> f64 {
        self.coords[0]
    }

    pub fn theta2(&self) -> f64 {
        self.coords[1]
    }

    pub fn p1(&self) -> f64 {
        self.coords[2]
    }

    pub fn p2(&self) -> f64 {
        self.coords[3]
    }

    /// Link lengths (L₁, L₂)
    pub fn lengths(&self) -> (f64, f64) {
        (self.l1, self.l2)
    }

    /// Elapsed simulation time
    pub fn time(&self) -> f64 {
        self.time
    }
}

impl HamiltonianSystem for DoublePendulum {
    type State = HamiltonianState;

    /// RK4 integration step
    fn time_step(&mut self, dt: f64) -> Result<()> {
        ensure_positive("dt", dt)?;

        let y = &self.coords;
        let k1 = self.derivative(y);
        let k2 = self.derivative(&(y + &(&k1 * (dt / 2.0))));
        let k3 = self.derivative(&(y + &(&k2 * (dt / 2.0))));
        let k4 = self.derivative(&(y + &(&k3 * dt)));

        let next = y + &((&k1 + &(&k2 * 2.0) + &(&k3 * 2.0) + &k4) * (dt / 6.0));

        if let Some((name, _)) = COORDINATE_NAMES
            .iter()
            .zip(next.iter())
            .find(|(_, value)| !value.is_finite())
        {
            return Err(PendulumError::NumericalInstability {
                quantity: *name,
                step: None,
            });
        }

        self.coords = next;
        self.time += dt;
        Ok(())
    }

    fn state(&self) -> HamiltonianState {
        HamiltonianState {
            theta1: self.coords[0],
            theta2: self.coords[1],
            p1: self.coords[2],
            p2: self.coords[3],
            time: self.time,
        }
    }

    fn degrees_of_freedom(&self) -> usize {
        2
    }

    fn canonical(&self) -> Array1<f64> {
        self.coords.clone()
    }

    fn potential_energy(&self) -> f64 {
        -(self.m1 + self.m2) * self.g * self.l1 * self.coords[0].cos()
            - self.m2 * self.g * self.l2 * self.coords[1].cos()
    }

    /// K = ½ pᵀ M⁻¹ p
    fn kinetic_energy(&self) -> f64 {
        let (w1, w2) = self.angular_velocities();
        0.5 * (self.coords[2] * w1 + self.coords[3] * w2)
    }
}
