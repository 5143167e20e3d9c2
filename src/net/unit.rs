//! A single competitive unit: a weight vector plus its own learning rate.

use crate::config::WeightRange;
use crate::error::{check_width, Result};
use rand::Rng;
use serde::Serialize;

/// A unit in a Kohonen layer.
///
/// The weight vector is the unit's position in input space. Every time the
/// unit wins a competition it moves toward the sample and its rate shrinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    weights: Vec<f64>,
    rate: f64,
}

impl Unit {
    /// Creates a new unit with weights drawn uniformly from `range`.
    ///
    /// Panics if `range` is empty or wider than `f64::MAX`; [`WeightRange::new`]
    /// rejects such ranges.
    pub fn new_random<R: Rng>(
        synapse_count: usize,
        range: WeightRange,
        rate: f64,
        rng: &mut R,
    ) -> Self {
        let weights: Vec<f64> = (0..synapse_count)
            .map(|_| rng.gen_range(range.min..range.max))
            .collect();

        Self { weights, rate }
    }

    /// Creates a new unit with the given weights.
    pub fn with_weights(weights: Vec<f64>, rate: f64) -> Self {
        Self { weights, rate }
    }

    /// The unit's weight vector.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The unit's current learning rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Number of inputs the unit is wired to.
    #[inline]
    pub fn synapse_count(&self) -> usize {
        self.weights.len()
    }

    /// Computes the Euclidean distance between this unit's weights and an input vector.
    pub fn distance(&self, input: &[f64]) -> f64 {
        debug_assert_eq!(
            self.weights.len(),
            input.len(),
            "Weight and input dimensions must match"
        );

        self.weights
            .iter()
            .zip(input.iter())
            .map(|(w, i)| (w - i).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Moves the weights toward `value` by the current rate, then decays the rate.
    ///
    /// `weights[k] += rate * (value[k] - weights[k])` followed by
    /// `rate = max(0, rate - decay_step)`.
    pub fn update(&mut self, value: &[f64], decay_step: f64) -> Result<()> {
        check_width(self.weights.len(), value.len())?;

        let rate = self.rate;
        for (w, v) in self.weights.iter_mut().zip(value.iter()) {
            *w += rate * (v - *w);
        }

        self.rate = (self.rate - decay_step).max(0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KohonenError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_initialization_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let unit = Unit::new_random(100, WeightRange::NARROW, 0.5, &mut rng);
        assert_eq!(unit.synapse_count(), 100);
        assert_eq!(unit.rate(), 0.5);
        assert!(unit.weights().iter().all(|&w| (0.01..0.25).contains(&w)));
    }

    #[test]
    fn test_distance() {
        let unit = Unit::with_weights(vec![1.0, 0.0, 0.0], 0.5);
        let dist = unit.distance(&[0.0, 1.0, 0.0]);
        assert!((dist - std::f64::consts::SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_update_moves_toward_sample() {
        let mut unit = Unit::with_weights(vec![0.0, 0.0, 0.0], 0.5);
        unit.update(&[1.0, 2.0, -4.0], 0.01).unwrap();
        assert!((unit.weights()[0] - 0.5).abs() < 1e-12);
        assert!((unit.weights()[1] - 1.0).abs() < 1e-12);
        assert!((unit.weights()[2] + 2.0).abs() < 1e-12);
        assert!((unit.rate() - 0.49).abs() < 1e-12);
    }

    #[test]
    fn test_rate_decay_law() {
        let mut unit = Unit::with_weights(vec![0.2, 0.3], 0.5);
        for _ in 0..100 {
            let before = unit.rate();
            unit.update(&[1.0, 1.0], 0.01).unwrap();
            let after = unit.rate();
            assert_eq!(after, (before - 0.01).max(0.0));
            assert!(after >= 0.0);
            assert!(after <= before);
        }
        assert_eq!(unit.rate(), 0.0);
    }

    #[test]
    fn test_contraction_law() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut unit = Unit::new_random(5, WeightRange::UNIT, 0.5, &mut rng);
        let value = [3.0, -1.0, 0.25, 10.0, 0.0];

        for _ in 0..60 {
            let before = unit.weights().to_vec();
            let rate = unit.rate();
            unit.update(&value, 0.01).unwrap();
            for k in 0..value.len() {
                let expected = (1.0 - rate) * (before[k] - value[k]).abs();
                let actual = (unit.weights()[k] - value[k]).abs();
                assert!((actual - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_frozen_unit_does_not_move() {
        let mut unit = Unit::with_weights(vec![0.1, 0.2], 0.0);
        unit.update(&[5.0, 5.0], 0.01).unwrap();
        assert_eq!(unit.weights(), &[0.1, 0.2]);
        assert_eq!(unit.rate(), 0.0);
    }

    #[test]
    fn test_update_rejects_wrong_width() {
        let mut unit = Unit::with_weights(vec![0.0, 0.0], 0.5);
        let err = unit.update(&[1.0], 0.01).unwrap_err();
        assert!(matches!(
            err,
            KohonenError::DimensionMismatch { expected: 2, actual: 1 }
        ));
        assert_eq!(unit.rate(), 0.5);
    }
}
