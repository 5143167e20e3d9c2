//! Layered Kohonen network.

use crate::config::NetworkConfig;
use crate::error::{check_width, KohonenError, Result};
use crate::net::Layer;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// A stack of competitive layers.
///
/// Layer 0 reads `input_width` inputs; every later layer reads one input per
/// unit of the layer before it. The last layer is the clustering layer: its
/// unit count is the number of clusters and its winner is the cluster index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Network {
    layers: Vec<Layer>,
    input_width: usize,
    decay_step: f64,
}

impl Network {
    /// Creates a network with default weight range and rates.
    pub fn build(layer_sizes: &[usize], input_width: usize) -> Result<Self> {
        let config = NetworkConfig {
            layer_sizes: layer_sizes.to_vec(),
            input_width,
            ..Default::default()
        };
        Self::new(&config)
    }

    /// Creates a network seeded from `config.seed` (entropy when unset).
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Creates a network drawing initial weights from `rng`.
    pub fn with_rng<R: Rng>(config: &NetworkConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let layers: Vec<Layer> = config
            .layer_sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let synapse_count = if i == 0 {
                    config.input_width
                } else {
                    config.layer_sizes[i - 1]
                };
                Layer::new_random(
                    size,
                    synapse_count,
                    config.weight_range,
                    config.initial_rate,
                    rng,
                )
            })
            .collect();

        debug!(
            "Built network: layers={:?}, input_width={}, weights in [{}, {})",
            config.layer_sizes, config.input_width, config.weight_range.min, config.weight_range.max
        );

        Ok(Self {
            layers,
            input_width: config.input_width,
            decay_step: config.decay_step,
        })
    }

    /// Assembles a network from prepared layers.
    ///
    /// Checks that each layer reads as many inputs as the previous one has units
    /// and that every unit's rate lies in `[0, 1]`.
    pub fn from_layers(layers: Vec<Layer>, input_width: usize, decay_step: f64) -> Result<Self> {
        if layers.is_empty() {
            return Err(KohonenError::InvalidConfig(
                "At least one layer is required".to_string(),
            ));
        }
        if !decay_step.is_finite() || decay_step < 0.0 {
            return Err(KohonenError::InvalidConfig(format!(
                "Decay step must be a non-negative number, got {}",
                decay_step
            )));
        }

        let mut expected = input_width;
        for (i, layer) in layers.iter().enumerate() {
            check_width(expected, layer.synapse_count())?;
            expected = layer.len();

            if let Some(k) = layer
                .units()
                .iter()
                .position(|unit| !(0.0..=1.0).contains(&unit.rate()))
            {
                return Err(KohonenError::InvalidConfig(format!(
                    "Unit {} of layer {} has rate {}, expected a value in [0, 1]",
                    k,
                    i,
                    layer.units()[k].rate()
                )));
            }
        }

        Ok(Self {
            layers,
            input_width,
            decay_step,
        })
    }

    /// Width of the vectors the network consumes.
    #[inline]
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Rate decrement applied to a unit each time it wins.
    #[inline]
    pub fn decay_step(&self) -> f64 {
        self.decay_step
    }

    /// All layers, input side first.
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Gets a layer by index.
    #[inline]
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// The clustering layer.
    #[inline]
    pub fn last_layer(&self) -> &Layer {
        // Construction guarantees at least one layer.
        &self.layers[self.layers.len() - 1]
    }

    /// Number of clusters the network separates.
    #[inline]
    pub fn clusters(&self) -> usize {
        self.last_layer().len()
    }

    /// Index of the winning unit of layer `layer_index` for `value`.
    pub fn winner_index(&self, layer_index: usize, value: &[f64]) -> Result<usize> {
        self.layer_at(layer_index)?.winner_index(value)
    }

    /// Runs one competitive step on layer `layer_index`.
    ///
    /// Only the winning unit of that layer changes. Returns its index.
    pub fn learn_layer(&mut self, layer_index: usize, value: &[f64], parallel: bool) -> Result<usize> {
        let decay_step = self.decay_step;
        let max = self.layers.len();
        self.layers
            .get_mut(layer_index)
            .ok_or_else(|| {
                KohonenError::InvalidConfig(format!(
                    "Layer index {} out of range ({} layers)",
                    layer_index, max
                ))
            })?
            .learn(value, decay_step, parallel)
    }

    /// Returns the cluster index for `value`: the winner of the last layer.
    pub fn classify(&self, value: &[f64]) -> Result<usize> {
        check_width(self.input_width, value.len())?;
        self.last_layer().winner_index(value)
    }

    /// Classifies every vector in `values`.
    pub fn classify_batch(&self, values: &[Vec<f64>]) -> Result<Vec<usize>> {
        values.iter().map(|v| self.classify(v)).collect()
    }

    /// Mean distance from each sample to its winning unit in the last layer.
    pub fn quantization_error(&self, samples: &[Vec<f64>]) -> Result<f64> {
        if samples.is_empty() {
            return Err(KohonenError::EmptyTrainingSet);
        }

        let layer = self.last_layer();
        let mut total = 0.0;
        for sample in samples {
            let winner = self.classify(sample)?;
            total += layer.units()[winner].distance(sample);
        }

        Ok(total / samples.len() as f64)
    }

    fn layer_at(&self, index: usize) -> Result<&Layer> {
        self.layers.get(index).ok_or_else(|| {
            KohonenError::InvalidConfig(format!(
                "Layer index {} out of range ({} layers)",
                index,
                self.layers.len()
            ))
        })
    }
}
