//! Recurrence Scanner: Ranked Tortoise/Hare Candidates

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::AcceptancePolicy;
use crate::trajectory::{Sample, Trajectory};

/// Pair of trajectory indices and their phase-space distance
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecurrenceCandidate {
    /// Slow index i
    pub tortoise: usize,
    /// Fast index 2i + 1
    pub hare: usize,
    /// hare − tortoise
    pub span: usize,
    /// Phase-space distance between the two samples
    pub distance: f64,
}

impl RecurrenceCandidate {
    /// Duration of the candidate cycle for a given sample spacing
    pub fn period(&self, dt: f64) -> f64 {
        self.span as f64 * dt
    }

    /// Does this candidate pass the acceptance filter?
    pub fn is_accepted(&self, policy: &AcceptancePolicy) -> bool {
        policy.accepts(self.distance, self.span)
    }
}

/// Euclidean distance between two samples in (θ₁, θ₂, p₁, p₂)
pub fn phase_distance(a: &Sample, b: &Sample) -> f64 {
    a.phase()
        .iter()
        .zip(b.phase().iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Candidates of one trajectory, ranked by ascending distance
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecurrenceScan {
    candidates: Vec<RecurrenceCandidate>,
}

impl RecurrenceScan {
    /// Run the tortoise/hare scan over a trajectory.
    ///
    /// Produces ⌊N/2⌋ candidates. Ranking uses a stable sort, so equal
    /// distances keep generation order (smaller tortoise first).
    pub fn scan(trajectory: &Trajectory) -> Self {
        let samples = trajectory.samples();
        let n_pairs = samples.len() / 2;

        let mut candidates: Vec<RecurrenceCandidate> = (0..n_pairs)
            .map(|i| {
                let hare = 2 * i + 1;
                RecurrenceCandidate {
                    tortoise: i,
                    hare,
                    span: hare - i,
                    distance: phase_distance(&samples[i], &samples[hare]),
                }
            })
            .collect();

        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        Self { candidates }
    }

    /// All candidates in ranked order
    pub fn candidates(&self) -> &[RecurrenceCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Closest candidate regardless of span
    pub fn best(&self) -> Option<&RecurrenceCandidate> {
        self.candidates.first()
    }

    /// Candidates passing the policy, in ranked order
    pub fn accepted<'a>(
        &'a self,
        policy: &'a AcceptancePolicy,
    ) -> impl Iterator<Item = &'a RecurrenceCandidate> + 'a {
        self.candidates.iter().filter(move |c| c.is_accepted(policy))
    }

    /// Lowest-distance candidate passing the policy
    pub fn best_accepted(&self, policy: &AcceptancePolicy) -> Option<&RecurrenceCandidate> {
        self.candidates.iter().find(|c| c.is_accepted(policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn sample_at(theta1: f64, theta2: f64, p1: f64, p2: f64) -> Sample {
        Sample {
            v: 0.0,
            k: 0.0,
            h: 0.0,
            theta1,
            theta2,
            p1,
            p2,
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
        }
    }

    /// Trajectory whose θ₁ follows `values`, everything else zero
    fn trajectory_from(values: &[f64]) -> Trajectory {
        let samples = values.iter().map(|&v| sample_at(v, 0.0, 0.0, 0.0)).collect();
        Trajectory::from_samples(samples, 0.01)
    }

    #[test]
    fn test_distance_non_negative_and_zero_on_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        let normal = Normal::new(0.0, 5.0).unwrap();

        for _ in 0..1000 {
            let mut draw = || normal.sample(&mut rng);
            let a = sample_at(draw(), draw(), draw(), draw());
            let b = sample_at(draw(), draw(), draw(), draw());

            assert!(phase_distance(&a, &b) >= 0.0);
            assert_eq!(phase_distance(&a, &a), 0.0);
            assert_eq!(phase_distance(&a, &b), phase_distance(&b, &a));
        }
    }

    #[test]
    fn test_distance_ignores_cartesian_columns() {
        let a = sample_at(0.1, 0.2, 0.3, 0.4);
        let b = Sample {
            x1: 10.0,
            y2: -7.0,
            h: 99.0,
            ..a
        };
        assert_eq!(phase_distance(&a, &b), 0.0);

        let c = sample_at(0.1, 0.2, 0.3, 0.4 + 3.0);
        assert!((phase_distance(&a, &c) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_candidate_count_and_bounds() {
        for n in [0, 1, 2, 3, 10, 11] {
            let scan = RecurrenceScan::scan(&trajectory_from(&vec![0.0; n]));
            assert_eq!(scan.len(), n / 2);
            for c in scan.candidates() {
                assert!(c.hare > c.tortoise);
                assert!(c.hare < n);
            }
        }
    }

    #[test]
    fn test_span_is_tortoise_plus_one() {
        let values: Vec<f64> = (0..101).map(|i| (i as f64 * 0.37).sin()).collect();
        let scan = RecurrenceScan::scan(&trajectory_from(&values));

        let mut by_tortoise: Vec<_> = scan.candidates().to_vec();
        by_tortoise.sort_by_key(|c| c.tortoise);

        // Every tortoise index 0..N/2 appears once, span strictly increasing
        for (i, c) in by_tortoise.iter().enumerate() {
            assert_eq!(c.tortoise, i);
            assert_eq!(c.hare, 2 * i + 1);
            assert_eq!(c.span, i + 1);
        }
        assert!(by_tortoise.windows(2).all(|w| w[0].span < w[1].span));
    }

    #[test]
    fn test_ranked_non_decreasing() {
        let mut rng = StdRng::seed_from_u64(11);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let values: Vec<f64> = (0..500).map(|_| normal.sample(&mut rng)).collect();

        let scan = RecurrenceScan::scan(&trajectory_from(&values));
        assert!(scan
            .candidates()
            .windows(2)
            .all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        // Constant trajectory: every distance is zero
        let scan = RecurrenceScan::scan(&trajectory_from(&[1.5; 40]));
        let tortoises: Vec<usize> = scan.candidates().iter().map(|c| c.tortoise).collect();
        assert_eq!(tortoises, (0..20).collect::<Vec<_>>());

        // Two tied pairs: i=1 and i=3 at distance 1, i=0 and i=2 at distance 2
        let values = [0.0, 2.0, 0.0, 1.0, 0.0, 2.0, 0.0, 2.0];
        let scan = RecurrenceScan::scan(&trajectory_from(&values));
        let order: Vec<usize> = scan.candidates().iter().map(|c| c.tortoise).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_periodic_signal_detected() {
        // Harmonic oscillator with a period of 40 samples
        let samples = (0..400)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * i as f64 / 40.0;
                sample_at(phase.sin(), 0.0, phase.cos(), 0.0)
            })
            .collect();
        let scan = RecurrenceScan::scan(&Trajectory::from_samples(samples, 0.01));

        let best = scan.best().unwrap();
        assert!(best.distance < 1e-9);
        assert_eq!(best.span % 40, 0);

        let policy = AcceptancePolicy::new(1e-6, 100);
        let accepted = scan.best_accepted(&policy).unwrap();
        assert!(accepted.span > 100);
        assert_eq!(accepted.span % 40, 0);
        assert!(scan.accepted(&policy).all(|c| c.span > 100 && c.distance < 1e-6));
    }

    #[test]
    fn test_best_accepted_respects_policy() {
        let values: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let scan = RecurrenceScan::scan(&trajectory_from(&values));

        // Distance equals span for a linear ramp
        let best = scan.best().unwrap();
        assert_eq!(best.tortoise, 0);
        assert!((best.distance - 1.0).abs() < 1e-12);
        assert!(scan.best_accepted(&AcceptancePolicy::default()).is_none());

        let loose = AcceptancePolicy::new(60.0, 50);
        let accepted = scan.best_accepted(&loose).unwrap();
        assert_eq!(accepted.span, 51);
        assert!((accepted.period(0.01) - 0.51).abs() < 1e-12);
    }

    #[test]
    fn test_best_accepted_outlives_policy() {
        let values: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let scan = RecurrenceScan::scan(&trajectory_from(&values));

        // Candidate borrows the scan only, not the temporary policy
        let accepted = {
            let policy = AcceptancePolicy::new(80.0, 70);
            scan.best_accepted(&policy)
        };
        assert_eq!(accepted.map(|c| c.span), Some(71));
        assert_eq!(accepted, scan.candidates().get(70));
    }
}
