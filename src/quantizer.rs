//! A network bundled with the normalization it was trained under.

use crate::config::{Config, NormalizationStrategy};
use crate::error::Result;
use crate::net::{Network, Trainer, TrainingReport};
use crate::normalize::AxisNormalizer;
use log::info;

/// Clusters raw vectors: normalizes them per the configured strategy, then
/// asks the network for the winning unit.
///
/// The normalizer is fitted on the training batch and reused for every query,
/// so training and classification always see the same scaling.
#[derive(Debug, Clone)]
pub struct Quantizer {
    network: Network,
    strategy: NormalizationStrategy,
    normalizer: Option<AxisNormalizer>,
    config: Config,
}

impl Quantizer {
    /// Builds an untrained quantizer.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let network = Network::new(&config.network)?;

        Ok(Self {
            network,
            strategy: config.network.normalization,
            normalizer: None,
            config,
        })
    }

    /// Fits the normalizer (if any) on `samples` and trains the network.
    pub fn fit(&mut self, samples: &[Vec<f64>]) -> Result<TrainingReport> {
        let mut trainer = Trainer::new(self.config.training.clone());
        self.fit_with_trainer(&mut trainer, samples, |_| {})
    }

    /// Like [`Quantizer::fit`], with a caller-provided trainer and epoch callback.
    pub fn fit_with_trainer<F>(
        &mut self,
        trainer: &mut Trainer,
        samples: &[Vec<f64>],
        on_epoch: F,
    ) -> Result<TrainingReport>
    where
        F: FnMut(usize),
    {
        // Nothing is replaced until training succeeds.
        let (normalizer, prepared) = match self.strategy {
            NormalizationStrategy::None => (None, samples.to_vec()),
            NormalizationStrategy::GlobalAxis => {
                let normalizer = AxisNormalizer::fit(samples)?;
                info!("Fitted axis norms: {:?}", normalizer.norms());
                let prepared = normalizer.apply_batch(samples)?;
                (Some(normalizer), prepared)
            }
        };

        let report = trainer.train_with_progress(&mut self.network, &prepared, on_epoch)?;
        self.normalizer = normalizer;
        Ok(report)
    }

    /// Applies the fitted normalization to a raw vector.
    pub fn prepare(&self, value: &[f64]) -> Result<Vec<f64>> {
        match &self.normalizer {
            Some(normalizer) => normalizer.apply(value),
            None => Ok(value.to_vec()),
        }
    }

    /// Cluster index of a raw vector.
    pub fn classify(&self, value: &[f64]) -> Result<usize> {
        let prepared = self.prepare(value)?;
        self.network.classify(&prepared)
    }

    /// Cluster indices of many raw vectors.
    pub fn classify_batch(&self, values: &[Vec<f64>]) -> Result<Vec<usize>> {
        values.iter().map(|v| self.classify(v)).collect()
    }

    /// The underlying network.
    #[inline]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The fitted normalizer, once [`Quantizer::fit`] has run with one.
    #[inline]
    pub fn normalizer(&self) -> Option<&AxisNormalizer> {
        self.normalizer.as_ref()
    }

    /// The configured normalization strategy.
    #[inline]
    pub fn strategy(&self) -> NormalizationStrategy {
        self.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NetworkConfig, TrainingConfig};
    use crate::error::KohonenError;

    fn config(network: NetworkConfig) -> Config {
        Config {
            network: NetworkConfig {
                seed: Some(3),
                ..network
            },
            training: TrainingConfig {
                epochs: 200,
                seed: Some(4),
                ..Default::default()
            },
        }
    }

    fn two_blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.5],
            vec![0.5, 0.0],
            vec![0.2, 0.2],
            vec![10.0, 10.5],
            vec![10.5, 10.0],
            vec![10.2, 10.2],
        ]
    }

    #[test]
    fn test_fit_normalized() {
        let mut quantizer =
            Quantizer::new(config(NetworkConfig::narrow_normalized(vec![2], 2))).unwrap();
        let samples = two_blobs();

        quantizer.fit(&samples).unwrap();

        assert!(quantizer.normalizer().is_some());
        let labels = quantizer.classify_batch(&samples).unwrap();
        assert!(labels.iter().all(|&l| l < 2));
    }

    #[test]
    fn test_fit_raw() {
        let mut quantizer = Quantizer::new(config(NetworkConfig::unit_band(vec![2], 2))).unwrap();
        quantizer.fit(&two_blobs()).unwrap();

        assert!(quantizer.normalizer().is_none());
        assert_eq!(quantizer.strategy(), NormalizationStrategy::None);
        assert_eq!(quantizer.prepare(&[3.0, 4.0]).unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_query_uses_training_scaling() {
        let mut quantizer =
            Quantizer::new(config(NetworkConfig::narrow_normalized(vec![2], 2))).unwrap();
        let samples = two_blobs();
        quantizer.fit(&samples).unwrap();

        let normalizer = quantizer.normalizer().unwrap().clone();
        for sample in &samples {
            let direct = quantizer
                .network()
                .classify(&normalizer.apply(sample).unwrap())
                .unwrap();
            assert_eq!(quantizer.classify(sample).unwrap(), direct);
        }
    }

    #[test]
    fn test_fit_empty() {
        let mut quantizer = Quantizer::new(Config::default()).unwrap();
        assert!(matches!(
            quantizer.fit(&[]),
            Err(KohonenError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_failed_fit_keeps_previous_model() {
        let mut quantizer =
            Quantizer::new(config(NetworkConfig::narrow_normalized(vec![2], 2))).unwrap();
        quantizer.fit(&[vec![0.0, 1.0], vec![10.0, 9.0]]).unwrap();
        let network = quantizer.network().clone();
        let normalizer = quantizer.normalizer().cloned();
        let label = quantizer.classify(&[0.0, 1.0]).unwrap();

        assert!(matches!(
            quantizer.fit(&[vec![1.0, 2.0, 3.0]]),
            Err(KohonenError::DimensionMismatch { expected: 2, actual: 3 })
        ));
        assert!(matches!(
            quantizer.fit(&[vec![1.0, f64::NAN]]),
            Err(KohonenError::InvalidSample(_))
        ));

        assert_eq!(quantizer.network(), &network);
        assert_eq!(quantizer.normalizer().cloned(), normalizer);
        assert_eq!(quantizer.classify(&[0.0, 1.0]).unwrap(), label);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = Config::default();
        config.network.layer_sizes = vec![0];
        assert!(matches!(
            Quantizer::new(config),
            Err(KohonenError::InvalidConfig(_))
        ));
    }
}
