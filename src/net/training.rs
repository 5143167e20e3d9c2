//! Competitive-learning training loop.
//!
//! Each epoch draws `len(training_set)` samples uniformly with replacement and
//! moves the nearest unit of the last layer toward every draw. There is no
//! convergence check: the loop always runs its full epoch budget unless it is
//! cancelled between epochs.

use crate::config::TrainingConfig;
use crate::error::{check_width, KohonenError, Result};
use crate::net::Network;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Summary of a finished (or cancelled) training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Epochs that ran to completion.
    pub epochs_completed: usize,
    /// Total number of winner updates applied.
    pub updates: usize,
    /// Whether the run stopped early on a cancellation request.
    pub cancelled: bool,
    /// Mean distance from each training sample to its winner after training.
    pub quantization_error: f64,
}

/// Trainer for the last layer of a [`Network`].
pub struct Trainer {
    config: TrainingConfig,
    rng: ChaCha8Rng,
    cancel: Option<Arc<AtomicBool>>,
}

impl Trainer {
    /// Creates a new trainer seeded from `config.seed` (entropy when unset).
    pub fn new(config: TrainingConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self::with_rng(config, rng)
    }

    /// Creates a trainer that draws samples from the given generator.
    pub fn with_rng(config: TrainingConfig, rng: ChaCha8Rng) -> Self {
        Self {
            config,
            rng,
            cancel: None,
        }
    }

    /// Stops training at the next epoch boundary once `flag` is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The trainer's configuration.
    #[inline]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trains the last layer of `network` on `training_set`.
    pub fn train(&mut self, network: &mut Network, training_set: &[Vec<f64>]) -> Result<TrainingReport> {
        self.train_with_progress(network, training_set, |_| {})
    }

    /// Trains like [`Trainer::train`], calling `on_epoch` with the number of
    /// completed epochs after each one.
    pub fn train_with_progress<F>(
        &mut self,
        network: &mut Network,
        training_set: &[Vec<f64>],
        mut on_epoch: F,
    ) -> Result<TrainingReport>
    where
        F: FnMut(usize),
    {
        self.config.validate()?;
        validate_training_set(network, training_set)?;

        let epochs = self.config.epochs;
        let parallel = self.config.parallel_search;
        let last = network.layers().len() - 1;
        let n = training_set.len();

        info!(
            "Starting training: {} epochs over {} samples, {} clusters",
            epochs,
            n,
            network.clusters()
        );

        let mut updates = 0;
        let mut epochs_completed = 0;
        let mut cancelled = false;

        for epoch in 0..epochs {
            if self.is_cancelled() {
                info!("Training cancelled after {} epochs", epoch);
                cancelled = true;
                break;
            }

            for _ in 0..n {
                let sample = &training_set[self.rng.gen_range(0..n)];
                network.learn_layer(last, sample, parallel)?;
                updates += 1;
            }

            epochs_completed = epoch + 1;
            on_epoch(epochs_completed);

            if self.config.log_interval > 0 && epochs_completed % self.config.log_interval == 0 {
                info!("Epoch {}/{}", epochs_completed, epochs);
            }
        }

        let quantization_error = network.quantization_error(training_set)?;
        info!(
            "Training completed: {} epochs, {} updates, quantization error {:.6}",
            epochs_completed, updates, quantization_error
        );

        Ok(TrainingReport {
            epochs_completed,
            updates,
            cancelled,
            quantization_error,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

/// Rejects empty sets, samples of the wrong width and non-finite components.
fn validate_training_set(network: &Network, training_set: &[Vec<f64>]) -> Result<()> {
    if training_set.is_empty() {
        return Err(KohonenError::EmptyTrainingSet);
    }

    for (i, sample) in training_set.iter().enumerate() {
        check_width(network.input_width(), sample.len())?;
        if let Some(k) = sample.iter().position(|c| !c.is_finite()) {
            return Err(KohonenError::InvalidSample(format!(
                "Sample {} has non-finite component {} ({})",
                i, k, sample[k]
            )));
        }
    }

    // Every sample is fed straight to the clustering layer.
    check_width(network.last_layer().synapse_count(), network.input_width())
}
