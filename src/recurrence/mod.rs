//! Recurrence Module: Tortoise/Hare Search for Near-Periodic Segments
//!
//! A trajectory that returns close to an earlier state contains an
//! approximate periodic orbit. Without knowing the period in advance,
//! the scanner compares a slow index against a fast one:
//!
//!   tortoise = i,   hare = 2i + 1,   span = i + 1
//!
//! for i ∈ [0, ⌊N/2⌋). The distance is the Euclidean norm in canonical
//! coordinates (θ₁, θ₂, p₁, p₂):
//!
//!   d(a, b) = ‖(θ₁ᵃ−θ₁ᵇ, θ₂ᵃ−θ₂ᵇ, p₁ᵃ−p₁ᵇ, p₂ᵃ−p₂ᵇ)‖₂
//!
//! Cartesian positions are not used: different angle combinations map
//! to the same bob positions and would produce false recurrences.
//!
//! ## Coverage
//!
//! The scan costs O(N) comparisons instead of O(N²), and only spans of
//! the form i + 1 starting at index i are sampled. Every span from 1 to
//! ⌊N/2⌋ is visited exactly once.

mod scanner;

pub use scanner::{phase_distance, RecurrenceCandidate, RecurrenceScan};
