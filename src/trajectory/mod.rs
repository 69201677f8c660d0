//! Trajectory Module: Per-Step Sampling of a Simulation
//!
//! The sampler drives a [`DoublePendulum`](crate::DoublePendulum) for a
//! fixed number of steps and records one [`Sample`] per step:
//!
//! ```text
//! for i in 0..steps:
//!     observe  → Sample { V, K, H, θ₁, θ₂, p₁, p₂, x₁, y₁, x₂, y₂ }
//!     advance  → time_step(dt)
//! ```
//!
//! Observation happens before advancing, so sample `i` is the state at
//! time `i·dt` and sample 0 is the initial condition. The recurrence
//! scanner relies on this to use indices as a time axis.

mod sampler;

pub use sampler::{Sample, Trajectory, TrajectorySampler};
