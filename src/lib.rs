//! # pendulum-cycles
//!
//! Near-Periodic Orbits of the Chaotic Double Pendulum via
//! Hamiltonian Integration and Tortoise/Hare Recurrence Search
//!
//! ## Overview
//!
//! The double pendulum is chaotic for most initial conditions, yet its
//! trajectories keep passing close to states they visited before. Such
//! a return marks a segment that, replayed in a loop, looks periodic.
//! This crate simulates the system and finds these segments.
//!
//! ### Pipeline
//!
//! ```text
//! CycleSearch ──► TrajectorySampler ──► DoublePendulum (RK4 step)
//!      │                 │
//!      │                 ▼
//!      │            Trajectory ──► RecurrenceScan
//!      │                                 │
//!      ◄─────────── accept / reject ◄────┘
//! ```
//!
//! 1. **Integrator**: canonical coordinates (θ₁, θ₂, p₁, p₂) advanced by
//!    Hamilton's equations, energies as pure functions of state
//!
//! 2. **Sampler**: one record per step (V, K, H, canonical coordinates,
//!    Cartesian joints), observed before each step
//!
//! 3. **Recurrence scan**: compares sample i with sample 2i + 1 in phase
//!    space, ranks all pairs by distance
//!
//! 4. **Search driver**: sweeps one initial-condition field, keeps the
//!    first trial whose best candidate is close (distance < 0.4) and
//!    long (span > 500)
//!
//! ## Example
//!
//! ```no_run
//! use pendulum_cycles::{CycleSearch, SearchConfig};
//!
//! let search = CycleSearch::new(SearchConfig::default())?;
//! let report = search.run();
//!
//! for result in report.results() {
//!     let handoff = result.handoff();
//!     println!(
//!         "trial {}: {} samples, frame {:.2}",
//!         result.trial_index,
//!         handoff.samples.len(),
//!         handoff.frame_extent()
//!     );
//! }
//! # Ok::<(), pendulum_cycles::PendulumError>(())
//! ```
//!
//! ## References
//!
//! - Shinbrot et al., "Chaos in a double pendulum", Am. J. Phys. 60, 491 (1992)
//! - Floyd, "Nondeterministic Algorithms", J. ACM 14, 636 (1967) - cycle detection

pub mod config;
pub mod error;
pub mod recurrence;
pub mod search;
pub mod systems;
pub mod trajectory;

// Re-exports from config
pub use config::{
    AcceptancePolicy,
    InitialField,
    PendulumParams,
    SamplerConfig,
    SearchConfig,
    SweepSpec,
};

// Re-exports from error
pub use error::{ErrorKind, PendulumError, Result};

// Re-exports from systems
pub use systems::{
    // Traits
    HamiltonianSystem,
    // Double pendulum
    CartesianPositions,
    DoublePendulum,
    HamiltonianState,
};

// Re-exports from trajectory
pub use trajectory::{Sample, Trajectory, TrajectorySampler};

// Re-exports from recurrence
pub use recurrence::{phase_distance, RecurrenceCandidate, RecurrenceScan};

// Re-exports from search
pub use search::{
    CycleSearch,
    CycleSearchResult,
    RenderHandoff,
    SearchReport,
    TrialOutcome,
    TrialReport,
    TrialStatus,
};
