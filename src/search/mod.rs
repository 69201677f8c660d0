//! Search Module: Parameter Sweep for Near-Periodic Orbits
//!
//! For each trial of a one-parameter sweep:
//!
//! 1. Build the initial state from the base parameters plus perturbation
//! 2. Sample a trajectory
//! 3. Run the tortoise/hare recurrence scan
//! 4. Keep candidates with `distance < d_max` and `span > s_min`
//! 5. Accept the lowest-distance survivor, or move to the next trial
//!
//! The sweep stops once `max_results` trials have been accepted
//! (first-hit by default). A diverging trial is recorded as failed and
//! the sweep continues. An exhausted sweep yields an empty report.

mod driver;

pub use driver::{
    CycleSearch, CycleSearchResult, RenderHandoff, SearchReport, TrialOutcome, TrialReport,
    TrialStatus,
};
