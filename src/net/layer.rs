//! A layer of competing units.

use crate::config::WeightRange;
use crate::error::{check_width, KohonenError, Result};
use crate::net::Unit;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

/// An ordered set of units that all read the same number of inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    units: Vec<Unit>,
    synapse_count: usize,
}

impl Layer {
    /// Creates a layer of `size` randomly initialized units.
    pub fn new_random<R: Rng>(
        size: usize,
        synapse_count: usize,
        range: WeightRange,
        rate: f64,
        rng: &mut R,
    ) -> Self {
        let units = (0..size)
            .map(|_| Unit::new_random(synapse_count, range, rate, rng))
            .collect();

        Self {
            units,
            synapse_count,
        }
    }

    /// Creates a layer from explicit units.
    ///
    /// Fails if the layer would be empty or the units disagree on width.
    pub fn from_units(units: Vec<Unit>) -> Result<Self> {
        let synapse_count = units
            .first()
            .map(Unit::synapse_count)
            .ok_or_else(empty_layer)?;

        for unit in &units {
            check_width(synapse_count, unit.synapse_count())?;
        }

        Ok(Self {
            units,
            synapse_count,
        })
    }

    /// Number of units in the layer.
    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always false for a constructed layer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of inputs each unit reads.
    #[inline]
    pub fn synapse_count(&self) -> usize {
        self.synapse_count
    }

    /// The units, in index order.
    #[inline]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Gets a unit by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    /// Returns the index of the unit nearest to `value`.
    ///
    /// Ties go to the lowest index: a later unit only wins on a strictly
    /// smaller distance.
    pub fn winner_index(&self, value: &[f64]) -> Result<usize> {
        check_width(self.synapse_count, value.len())?;

        let first = self.units.first().ok_or_else(empty_layer)?;
        let mut best_idx = 0;
        let mut best_dist = first.distance(value);

        for (i, unit) in self.units.iter().enumerate().skip(1) {
            let dist = unit.distance(value);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        Ok(best_idx)
    }

    /// Same result as [`Layer::winner_index`], with distances computed in parallel.
    ///
    /// Only worth it for layers with many units.
    pub fn winner_index_parallel(&self, value: &[f64]) -> Result<usize> {
        check_width(self.synapse_count, value.len())?;

        // The sequential scan never leaves unit 0 if its distance is NaN.
        let first = self.units.first().ok_or_else(empty_layer)?;
        if first.distance(value).is_nan() {
            return Ok(0);
        }

        let (best_idx, _) = self
            .units
            .par_iter()
            .enumerate()
            .map(|(i, unit)| (i, unit.distance(value)))
            .reduce_with(pick_nearer)
            .ok_or_else(empty_layer)?;

        Ok(best_idx)
    }

    /// Finds the winner for `value` and moves it toward the sample.
    ///
    /// Returns the index of the unit that was updated.
    pub fn learn(&mut self, value: &[f64], decay_step: f64, parallel: bool) -> Result<usize> {
        let winner = if parallel {
            self.winner_index_parallel(value)?
        } else {
            self.winner_index(value)?
        };
        self.units[winner].update(value, decay_step)?;
        Ok(winner)
    }
}

fn empty_layer() -> KohonenError {
    KohonenError::InvalidConfig("Layer has no units".to_string())
}

/// Reduction step for the parallel search.
///
/// Orders candidates by distance, then by index, with NaN distances last.
#[inline]
fn pick_nearer(a: (usize, f64), b: (usize, f64)) -> (usize, f64) {
    let (first, second) = if a.0 <= b.0 { (a, b) } else { (b, a) };
    let beats = if first.1.is_nan() {
        !second.1.is_nan()
    } else {
        second.1 < first.1
    };
    if beats {
        second
    } else {
        first
    }
}
