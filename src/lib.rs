//! Parallel tabular self-play training for generalized tic-tac-toe
//!
//! This crate provides:
//! - Boards of any size from 3x3 up, with win detection over every 3x3 window
//! - An ε-greedy self-play episode simulator and backward credit assignment
//! - A parallel trainer that merges per-worker value tables by averaging
//! - Plain text persistence of value tables
//! - An interactive human vs AI session that keeps learning
//!
//! # Example
//!
//! ```
//! use xxo::{
//!     app::{LearningConfig, TrainerConfig},
//!     pipeline::ParallelTrainer,
//! };
//!
//! let trainer = ParallelTrainer::new(
//!     LearningConfig::default(),
//!     TrainerConfig::new(1_000, 4).with_seed(3),
//! );
//! let report = trainer.train()?;
//! assert!(report.table.values("---------X").is_some());
//! # Ok::<(), xxo::Error>(())
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod play;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use types::StateKey;
