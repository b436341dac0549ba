//! Application configuration.
//!
//! Every hyperparameter of a run lives in one of two immutable structs that
//! are built once (from CLI flags or in code) and passed by reference into
//! the simulator, the trainer and the interactive session.
//!
//! - [`LearningConfig`]: α, γ, ε, rewards, credit assignment and board size
//! - [`TrainerConfig`]: episode budget, worker count and seed

pub mod config;

pub use config::{LearningConfig, TrainerConfig};
