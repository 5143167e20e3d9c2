//! Synthetic sample source: points scattered around seed centers.

use crate::error::{KohonenError, Result};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal, Uniform};
use serde::{Deserialize, Serialize};

/// A generated point together with the index of the center it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    /// Index into [`ClusterSource::centers`].
    pub center: usize,
    /// The point itself.
    pub point: Vec<f64>,
}

/// Generates points around fixed centers.
///
/// Each point lies in a uniformly random direction from its center at a
/// distance drawn uniformly from `[0, radius)`. Centers are visited round-robin,
/// so consecutive points belong to different centers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSource {
    /// Seed centers; all must have the same width.
    pub centers: Vec<Vec<f64>>,
    /// Maximum distance of a point from its center.
    pub radius: f64,
    /// Points generated per center.
    pub points_per_center: usize,
}

impl ClusterSource {
    /// Creates a validated source.
    pub fn new(centers: Vec<Vec<f64>>, radius: f64, points_per_center: usize) -> Result<Self> {
        let source = Self {
            centers,
            radius,
            points_per_center,
        };
        source.validate()?;
        Ok(source)
    }

    /// Width shared by all centers.
    pub fn width(&self) -> usize {
        self.centers.first().map(Vec::len).unwrap_or(0)
    }

    fn validate(&self) -> Result<()> {
        let width = self.width();
        if width == 0 {
            return Err(KohonenError::InvalidConfig(
                "At least one non-empty center is required".to_string(),
            ));
        }
        if let Some(i) = self.centers.iter().position(|c| c.len() != width) {
            return Err(KohonenError::DimensionMismatch {
                expected: width,
                actual: self.centers[i].len(),
            });
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(KohonenError::InvalidConfig(format!(
                "Radius must be a non-negative number, got {}",
                self.radius
            )));
        }
        Ok(())
    }

    /// Generates `points_per_center * centers.len()` labeled points.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Vec<LabeledSample>> {
        self.validate()?;

        let width = self.width();
        let mut samples = Vec::with_capacity(self.points_per_center * self.centers.len());

        for _ in 0..self.points_per_center {
            for (center_idx, center) in self.centers.iter().enumerate() {
                let direction = random_direction(width, rng);
                let length = if self.radius > 0.0 {
                    Uniform::new(0.0, self.radius).sample(rng)
                } else {
                    0.0
                };

                let point = center
                    .iter()
                    .zip(direction.iter())
                    .map(|(c, d)| c + length * d)
                    .collect();

                samples.push(LabeledSample {
                    center: center_idx,
                    point,
                });
            }
        }

        Ok(samples)
    }

    /// Generates points without their labels.
    pub fn generate_points<R: Rng>(&self, rng: &mut R) -> Result<Vec<Vec<f64>>> {
        Ok(self
            .generate(rng)?
            .into_iter()
            .map(|s| s.point)
            .collect())
    }
}

/// Unit vector with a uniformly distributed direction.
fn random_direction<R: Rng>(width: usize, rng: &mut R) -> Vec<f64> {
    loop {
        let v: Vec<f64> = (0..width).map(|_| StandardNormal.sample(rng)).collect();
        let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 1e-12 {
            return v.into_iter().map(|x| x / norm).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_counts_and_order() {
        let source = ClusterSource::new(vec![vec![0.0, 0.0], vec![10.0, 10.0]], 10.0, 30).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let samples = source.generate(&mut rng).unwrap();

        assert_eq!(samples.len(), 60);
        for (i, sample) in samples.iter().enumerate() {
            assert_eq!(sample.center, i % 2);
            assert_eq!(sample.point.len(), 2);
        }
    }

    #[test]
    fn test_points_within_radius() {
        let centers = vec![vec![1.0, 2.0, 3.0], vec![-5.0, 0.0, 5.0]];
        let source = ClusterSource::new(centers.clone(), 2.5, 100).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for sample in source.generate(&mut rng).unwrap() {
            let center = &centers[sample.center];
            let dist = sample
                .point
                .iter()
                .zip(center)
                .map(|(p, c)| (p - c).powi(2))
                .sum::<f64>()
                .sqrt();
            assert!(dist < 2.5 + 1e-9);
        }
    }

    #[test]
    fn test_zero_radius_reproduces_centers() {
        let source = ClusterSource::new(vec![vec![4.0, 4.0]], 0.0, 3).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let points = source.generate_points(&mut rng).unwrap();
        assert!(points.iter().all(|p| p == &vec![4.0, 4.0]));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let source = ClusterSource::new(vec![vec![0.0, 0.0]], 1.0, 10).unwrap();
        let a = source.generate(&mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        let b = source.generate(&mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_sources() {
        assert!(ClusterSource::new(vec![], 1.0, 1).is_err());
        assert!(ClusterSource::new(vec![vec![0.0], vec![0.0, 1.0]], 1.0, 1).is_err());
        assert!(ClusterSource::new(vec![vec![0.0]], -1.0, 1).is_err());
    }
}
