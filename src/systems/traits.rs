//! Hamiltonian System Trait: Common API for Conservative Integrators
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   HamiltonianSystem Trait                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + time_step(dt)        - Advance canonical state by dt      │
//! │  + run(n, dt)           - Run n steps                        │
//! │  + canonical()          - (q, p) as a flat vector            │
//! │  + potential_energy()   - V(q)                               │
//! │  + kinetic_energy()     - K(q, p)                            │
//! │  + mechanical_energy()  - H = V + K                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use ndarray::Array1;

use crate::error::Result;

/// Trait for systems integrated in canonical coordinates.
pub trait HamiltonianSystem {
    /// Snapshot type for this system
    type State;

    /// Advance the canonical coordinates by one step of size `dt`.
    ///
    /// On a non-finite result the state is left unchanged and a
    /// numerical-instability error is returned.
    fn time_step(&mut self, dt: f64) -> Result<()>;

    /// Run multiple steps, stopping at the first failure.
    fn run(&mut self, n_steps: usize, dt: f64) -> Result<()> {
        for _ in 0..n_steps {
            self.time_step(dt)?;
        }
        Ok(())
    }

    /// Current state snapshot
    fn state(&self) -> Self::State;

    /// Number of degrees of freedom (half the phase-space dimension)
    fn degrees_of_freedom(&self) -> usize;

    /// Canonical coordinates `(q₁..qₙ, p₁..pₙ)`
    fn canonical(&self) -> Array1<f64>;

    /// Potential energy V
    fn potential_energy(&self) -> f64;

    /// Kinetic energy K
    fn kinetic_energy(&self) -> f64;

    /// Total mechanical energy H = V + K
    fn mechanical_energy(&self) -> f64 {
        self.potential_energy() + self.kinetic_energy()
    }
}
