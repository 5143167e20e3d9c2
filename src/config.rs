//! Configuration for the Kohonen vector quantizer.

use crate::error::{KohonenError, Result};
use crate::{DEFAULT_DECAY_STEP, DEFAULT_EPOCHS, DEFAULT_INITIAL_RATE};
use serde::{Deserialize, Serialize};

/// Main configuration for a quantizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Network construction configuration.
    pub network: NetworkConfig,

    /// Training loop configuration.
    pub training: TrainingConfig,
}

impl Config {
    /// Validates both sections.
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.training.validate()
    }
}

/// Half-open range `[min, max)` that initial weights are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

impl WeightRange {
    /// Narrow band `[0.01, 0.25)`.
    pub const NARROW: WeightRange = WeightRange { min: 0.01, max: 0.25 };

    /// Full unit band `[0, 1)`.
    pub const UNIT: WeightRange = WeightRange { min: 0.0, max: 1.0 };

    /// Creates a new range, rejecting empty or non-finite bounds.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(KohonenError::InvalidConfig(format!(
                "Weight range bounds must be finite, got [{}, {})",
                self.min, self.max
            )));
        }
        if self.min >= self.max {
            return Err(KohonenError::InvalidConfig(format!(
                "Weight range is empty: [{}, {})",
                self.min, self.max
            )));
        }
        if !(self.max - self.min).is_finite() {
            return Err(KohonenError::InvalidConfig(format!(
                "Weight range is too wide: [{}, {})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for WeightRange {
    fn default() -> Self {
        Self::NARROW
    }
}

/// How raw samples are rescaled before training and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationStrategy {
    /// Samples are used as given.
    None,
    /// Each axis is divided by its dataset-wide Euclidean norm.
    #[default]
    GlobalAxis,
}

/// Network construction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of units per layer. The last entry is the number of clusters.
    /// Default: [2].
    pub layer_sizes: Vec<usize>,

    /// Width of the input vectors.
    /// Default: 2.
    pub input_width: usize,

    /// Range initial weights are drawn from.
    /// Default: [0.01, 0.25).
    pub weight_range: WeightRange,

    /// Learning rate every unit starts with.
    /// Default: 0.5.
    pub initial_rate: f64,

    /// Amount subtracted from a unit's rate each time it wins.
    /// Default: 0.01.
    pub decay_step: f64,

    /// Normalization applied by [`crate::Quantizer`].
    /// Default: global per-axis.
    pub normalization: NormalizationStrategy,

    /// Random seed for weight initialization.
    /// Default: None (random).
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            layer_sizes: vec![2],
            input_width: 2,
            weight_range: WeightRange::NARROW,
            initial_rate: DEFAULT_INITIAL_RATE,
            decay_step: DEFAULT_DECAY_STEP,
            normalization: NormalizationStrategy::GlobalAxis,
            seed: None,
        }
    }
}

impl NetworkConfig {
    /// Narrow initial weights with dataset-wide axis normalization.
    pub fn narrow_normalized(layer_sizes: Vec<usize>, input_width: usize) -> Self {
        Self {
            layer_sizes,
            input_width,
            weight_range: WeightRange::NARROW,
            normalization: NormalizationStrategy::GlobalAxis,
            ..Default::default()
        }
    }

    /// Unit-band initial weights on raw, unnormalized samples.
    pub fn unit_band(layer_sizes: Vec<usize>, input_width: usize) -> Self {
        Self {
            layer_sizes,
            input_width,
            weight_range: WeightRange::UNIT,
            normalization: NormalizationStrategy::None,
            ..Default::default()
        }
    }

    /// Number of output clusters (units in the last layer).
    #[inline]
    pub fn clusters(&self) -> usize {
        self.layer_sizes.last().copied().unwrap_or(0)
    }

    /// Checks layer sizes, input width, weight range and rate parameters.
    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes.is_empty() {
            return Err(KohonenError::InvalidConfig(
                "At least one layer is required".to_string(),
            ));
        }
        if let Some(i) = self.layer_sizes.iter().position(|&size| size == 0) {
            return Err(KohonenError::InvalidConfig(format!(
                "Layer {} has no units",
                i
            )));
        }
        if self.input_width == 0 {
            return Err(KohonenError::InvalidConfig(
                "Input width must be positive".to_string(),
            ));
        }
        self.weight_range.validate()?;
        if !(0.0..=1.0).contains(&self.initial_rate) {
            return Err(KohonenError::InvalidConfig(format!(
                "Initial rate must lie in [0, 1], got {}",
                self.initial_rate
            )));
        }
        if !self.decay_step.is_finite() || self.decay_step < 0.0 {
            return Err(KohonenError::InvalidConfig(format!(
                "Decay step must be a non-negative number, got {}",
                self.decay_step
            )));
        }
        Ok(())
    }
}

/// Training loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of epochs. Each epoch draws `len(training_set)` samples.
    /// Default: 10,000.
    pub epochs: usize,

    /// Random seed for sample draws.
    /// Default: None (random).
    pub seed: Option<u64>,

    /// Search for the winning unit with rayon.
    /// Only pays off for very large layers.
    /// Default: false.
    pub parallel_search: bool,

    /// Log progress every this many epochs (0 disables).
    /// Default: 1,000.
    pub log_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: DEFAULT_EPOCHS,
            seed: None,
            parallel_search: false,
            log_interval: 1_000,
        }
    }
}

impl TrainingConfig {
    /// Checks the training parameters.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(KohonenError::InvalidConfig(
                "Epoch count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
