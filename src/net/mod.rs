//! Kohonen competitive-learning network.
//!
//! - **Unit**: weight vector plus a learning rate that shrinks every time it wins
//! - **Layer**: winner search over a set of units (sequential or rayon)
//! - **Network**: stack of layers; the last one assigns cluster indices
//! - **Trainer**: the fixed-budget winner-take-all loop (training.rs)

mod layer;
mod network;
pub mod training;
mod unit;

pub use layer::Layer;
pub use network::Network;
pub use training::{Trainer, TrainingReport};
pub use unit::Unit;
