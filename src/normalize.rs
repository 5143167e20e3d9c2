//! Dataset-wide per-axis normalization.
//!
//! Every axis `d` is divided by `sqrt(Σ x[d]^2)` taken over the whole batch,
//! so the geometry of the batch is rescaled per axis rather than each sample
//! being projected onto the unit sphere. Query vectors must go through the
//! same fitted [`AxisNormalizer`] as the training batch.

use crate::error::{check_width, KohonenError, Result};
use serde::{Deserialize, Serialize};

/// Per-axis scale factors fitted on a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisNormalizer {
    norms: Vec<f64>,
}

impl AxisNormalizer {
    /// Computes the Euclidean norm of every axis over `samples`.
    ///
    /// An axis that is zero in every sample gets a factor of 1.0. Non-finite
    /// components are rejected.
    pub fn fit(samples: &[Vec<f64>]) -> Result<Self> {
        let width = samples
            .first()
            .map(Vec::len)
            .ok_or(KohonenError::EmptyTrainingSet)?;

        // Scale by the largest magnitude first so the sum of squares cannot overflow.
        let mut peaks = vec![0.0f64; width];
        for (i, sample) in samples.iter().enumerate() {
            check_width(width, sample.len())?;
            if let Some(k) = sample.iter().position(|c| !c.is_finite()) {
                return Err(KohonenError::InvalidSample(format!(
                    "Sample {} has non-finite component {} ({})",
                    i, k, sample[k]
                )));
            }
            for (peak, x) in peaks.iter_mut().zip(sample.iter()) {
                *peak = peak.max(x.abs());
            }
        }

        let mut sums = vec![0.0; width];
        for sample in samples {
            for ((sum, x), peak) in sums.iter_mut().zip(sample.iter()).zip(&peaks) {
                if *peak > 0.0 {
                    let scaled = x / peak;
                    *sum += scaled * scaled;
                }
            }
        }

        let norms = sums
            .into_iter()
            .zip(peaks)
            .map(|(sum, peak)| {
                let norm = peak * sum.sqrt();
                if norm > 0.0 {
                    norm
                } else {
                    1.0
                }
            })
            .collect();

        Ok(Self { norms })
    }

    /// Creates a normalizer from known factors.
    pub fn from_norms(norms: Vec<f64>) -> Result<Self> {
        if norms.is_empty() {
            return Err(KohonenError::EmptyTrainingSet);
        }
        if let Some(d) = norms.iter().position(|n| !n.is_finite() || *n <= 0.0) {
            return Err(KohonenError::InvalidConfig(format!(
                "Norm for axis {} must be a positive number, got {}",
                d, norms[d]
            )));
        }
        Ok(Self { norms })
    }

    /// Fitted factors, one per axis.
    #[inline]
    pub fn norms(&self) -> &[f64] {
        &self.norms
    }

    /// Number of axes.
    #[inline]
    pub fn width(&self) -> usize {
        self.norms.len()
    }

    /// Scales one vector.
    pub fn apply(&self, sample: &[f64]) -> Result<Vec<f64>> {
        check_width(self.norms.len(), sample.len())?;
        Ok(sample.iter().zip(&self.norms).map(|(x, n)| x / n).collect())
    }

    /// Scales every vector in `samples`.
    pub fn apply_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        samples.iter().map(|s| self.apply(s)).collect()
    }

    /// Undoes [`AxisNormalizer::apply`].
    pub fn restore(&self, sample: &[f64]) -> Result<Vec<f64>> {
        check_width(self.norms.len(), sample.len())?;
        Ok(sample.iter().zip(&self.norms).map(|(x, n)| x * n).collect())
    }
}

/// Normalizes a batch by its own per-axis norms.
pub fn normalize(samples: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    AxisNormalizer::fit(samples)?.apply_batch(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_norms() {
        let samples = vec![vec![3.0, 1.0], vec![4.0, 0.0]];
        let normalizer = AxisNormalizer::fit(&samples).unwrap();
        assert!((normalizer.norms()[0] - 5.0).abs() < 1e-12);
        assert!((normalizer.norms()[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_is_per_axis_not_per_sample() {
        let samples = vec![vec![3.0, 2.0], vec![4.0, 0.0]];
        let normalized = normalize(&samples).unwrap();

        assert!((normalized[0][0] - 0.6).abs() < 1e-12);
        assert!((normalized[1][0] - 0.8).abs() < 1e-12);
        assert!((normalized[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(normalized[1][1], 0.0);

        // Each axis, not each sample, ends up with unit norm.
        let axis0: f64 = normalized.iter().map(|s| s[0] * s[0]).sum();
        assert!((axis0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let samples = vec![
            vec![10.5, -3.25, 7.0],
            vec![-2.0, 18.75, 0.5],
            vec![4.0, 1.0, -9.0],
        ];
        let normalizer = AxisNormalizer::fit(&samples).unwrap();
        let normalized = normalizer.apply_batch(&samples).unwrap();

        for (original, scaled) in samples.iter().zip(&normalized) {
            let restored = normalizer.restore(scaled).unwrap();
            for (a, b) in original.iter().zip(&restored) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_axis_is_left_alone() {
        let samples = vec![vec![1.0, 0.0], vec![2.0, 0.0]];
        let normalized = normalize(&samples).unwrap();
        assert!(normalized.iter().all(|s| s[1] == 0.0 && s[1].is_finite()));
    }

    #[test]
    fn test_huge_values_round_trip() {
        let samples = vec![vec![1e200, 1.0], vec![2e200, 2.0]];
        let normalizer = AxisNormalizer::fit(&samples).unwrap();
        assert!(normalizer.norms().iter().all(|n| n.is_finite()));
        assert!((normalizer.norms()[0] / 1e200 - 5f64.sqrt()).abs() < 1e-12);

        let normalized = normalizer.apply_batch(&samples).unwrap();
        assert!((normalized[0][0] - 1.0 / 5f64.sqrt()).abs() < 1e-12);
        assert!((normalized[1][0] - 2.0 / 5f64.sqrt()).abs() < 1e-12);

        for (original, scaled) in samples.iter().zip(&normalized) {
            let restored = normalizer.restore(scaled).unwrap();
            for (a, b) in original.iter().zip(&restored) {
                assert!(((a - b) / a).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            AxisNormalizer::fit(&[vec![1.0, f64::NAN]]),
            Err(KohonenError::InvalidSample(_))
        ));
        assert!(matches!(
            normalize(&[vec![1.0, 2.0], vec![f64::INFINITY, 0.0]]),
            Err(KohonenError::InvalidSample(_))
        ));
    }

    #[test]
    fn test_empty_batch() {
        assert!(matches!(normalize(&[]), Err(KohonenError::EmptyTrainingSet)));
        assert!(AxisNormalizer::from_norms(Vec::new()).is_err());
    }

    #[test]
    fn test_ragged_batch() {
        let samples = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            normalize(&samples),
            Err(KohonenError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_apply_checks_width() {
        let normalizer = AxisNormalizer::from_norms(vec![2.0, 4.0]).unwrap();
        assert_eq!(normalizer.apply(&[1.0, 1.0]).unwrap(), vec![0.5, 0.25]);
        assert!(normalizer.apply(&[1.0]).is_err());
        assert!(AxisNormalizer::from_norms(vec![1.0, 0.0]).is_err());
    }
}
