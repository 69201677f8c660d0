//! Physical Systems Module: Hamiltonian Models
//!
//! - **Double pendulum**: two point masses on rigid links, integrated in
//!   canonical coordinates (θ₁, θ₂, p₁, p₂)
//!
//! The [`HamiltonianSystem`] trait is the seam between a model and the
//! trajectory sampler.

mod double_pendulum;
mod traits;

pub use double_pendulum::{CartesianPositions, DoublePendulum, HamiltonianState};
pub use traits::HamiltonianSystem;
