//! Configuration types for learning and training runs.

use serde::{Deserialize, Serialize};

use crate::{
    q_learning::{CreditAssignment, RewardSchedule},
    tictactoe::OriginBound,
    types::{MIN_BOARD_DIMENSION, defaults},
};

/// Hyperparameters shared by the episode simulator, credit assignment and the
/// interactive session.
///
/// The configuration is immutable once handed to a simulator or trainer; use
/// the builder-style methods to derive variants.
///
/// # Examples
///
/// ```
/// use xxo::app::LearningConfig;
/// use xxo::q_learning::CreditAssignment;
///
/// let config = LearningConfig::default()
///     .with_epsilon(0.1)
///     .with_board(4, 4)
///     .with_credit(CreditAssignment::Interleaved);
/// assert_eq!(config.action_space(), 16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Exploration probability ε
    pub epsilon: f64,
    /// Terminal rewards
    pub rewards: RewardSchedule,
    /// Spreading of the terminal reward over the history
    pub credit: CreditAssignment,
    /// Board width
    pub width: usize,
    /// Board height
    pub height: usize,
    /// Window origins visited by win detection
    pub window_scan: OriginBound,
}

impl LearningConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_credit(mut self, credit: CreditAssignment) -> Self {
        self.credit = credit;
        self
    }

    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_window_scan(mut self, window_scan: OriginBound) -> Self {
        self.window_scan = window_scan;
        self
    }

    /// Number of actions per state, one per board cell.
    pub fn action_space(&self) -> usize {
        self.width * self.height
    }

    /// Check that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidSize`] for boards below 3x3 and
    /// [`crate::Error::InvalidConfiguration`] for rates outside `[0, 1]` or a
    /// zero learning rate.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.width < MIN_BOARD_DIMENSION || self.height < MIN_BOARD_DIMENSION {
            return Err(crate::Error::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        let out_of_range = |name: &str, range: &str, value: f64| {
            Err(crate::Error::InvalidConfiguration {
                message: format!("{name} must be within {range}, got {value}"),
            })
        };

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return out_of_range("learning rate", "(0, 1]", self.learning_rate);
        }
        for (name, value) in [
            ("discount factor", self.discount_factor),
            ("epsilon", self.epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return out_of_range(name, "[0, 1]", value);
            }
        }
        Ok(())
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: defaults::LEARNING_RATE,
            discount_factor: defaults::DISCOUNT_FACTOR,
            epsilon: defaults::EPSILON,
            rewards: RewardSchedule::default(),
            credit: CreditAssignment::default(),
            width: MIN_BOARD_DIMENSION,
            height: MIN_BOARD_DIMENSION,
            window_scan: OriginBound::default(),
        }
    }
}

/// Budget and parallelism of a training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Total number of self-play episodes across all workers
    pub episodes: u64,
    /// Number of independent workers
    pub workers: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl TrainerConfig {
    pub fn new(episodes: u64, workers: usize) -> Self {
        Self {
            episodes,
            workers,
            seed: None,
        }
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] when there are no workers.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.workers == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "at least one worker is required".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self::new(defaults::EPISODES, defaults::WORKERS)
    }
}
