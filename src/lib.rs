//! # Kohonen - Competitive-Learning Vector Quantizer
//!
//! A small layered network of weight vectors that partitions input vectors
//! into clusters. Training repeatedly picks a random sample, finds the unit
//! nearest to it, and moves only that unit toward the sample by its own
//! learning rate, which then shrinks by a fixed step.
//!
//! ## Overview
//!
//! - **Winner-take-all**: no neighborhood function, only the nearest unit learns
//! - **Per-unit annealing**: each unit's rate drops linearly to zero as it wins
//! - **Reproducible**: seeded `ChaCha8Rng` for both initialization and sample draws
//! - **Dimension-agnostic**: any input width, not just 2-D points
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kohonen::{normalize, Network, Trainer, TrainingConfig};
//!
//! let samples = normalize(&raw_points)?;
//!
//! let mut network = Network::build(&[2], 2)?;
//! let mut trainer = Trainer::new(TrainingConfig::default());
//! trainer.train(&mut network, &samples)?;
//!
//! let cluster = network.classify(&samples[0])?;
//! ```
//!
//! ## Architecture
//!
//! - [`net`] - Units, layers, the network and its trainer
//! - [`mod@normalize`] - Dataset-wide per-axis normalization
//! - [`quantizer`] - Network plus normalization strategy as one model
//! - [`dataset`] - Synthetic points around seed centers
//! - [`render`] - Scatter-plot output
//!
//! ## Training with normalization
//!
//! ```rust,ignore
//! use kohonen::{Config, NetworkConfig, Quantizer};
//!
//! let config = Config {
//!     network: NetworkConfig::narrow_normalized(vec![2], 2),
//!     ..Default::default()
//! };
//! let mut quantizer = Quantizer::new(config)?;
//! quantizer.fit(&raw_points)?;
//! let cluster = quantizer.classify(&[12.0, 9.5])?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod net;
pub mod normalize;
pub mod quantizer;
pub mod render;

// Re-export commonly used types
pub use config::{Config, NetworkConfig, NormalizationStrategy, TrainingConfig, WeightRange};
pub use dataset::{ClusterSource, LabeledSample};
pub use error::{KohonenError, Result};
pub use net::{Layer, Network, Trainer, TrainingReport, Unit};
pub use normalize::{normalize, AxisNormalizer};
pub use quantizer::Quantizer;
pub use render::ScatterPlot;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default learning rate a unit starts with.
pub const DEFAULT_INITIAL_RATE: f64 = 0.5;

/// Default rate decrement per win.
pub const DEFAULT_DECAY_STEP: f64 = 0.01;

/// Default number of training epochs.
pub const DEFAULT_EPOCHS: usize = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_constants_match_defaults() {
        let config = Config::default();
        assert_eq!(config.network.initial_rate, DEFAULT_INITIAL_RATE);
        assert_eq!(config.network.decay_step, DEFAULT_DECAY_STEP);
        assert_eq!(config.training.epochs, DEFAULT_EPOCHS);
    }
}
