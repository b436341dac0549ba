//! Newtype wrappers for improved type safety and domain modeling.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Minimum board dimension; also the side of a win-detection window.
pub const MIN_BOARD_DIMENSION: usize = 3;

/// Character used for an empty cell inside a [`StateKey`].
pub const EMPTY_KEY_CHAR: char = '-';

/// Canonical identity of a position: the board contents row-major followed by
/// the player to move.
///
/// Cells are encoded as `-` (empty), `X` or `O`, so the empty classic board
/// with X to move is `---------X`. Keys never contain whitespace, which the
/// flat table format relies on.
///
/// # Examples
///
/// ```
/// use xxo::types::StateKey;
///
/// let key = StateKey::parse("X---O----X").unwrap();
/// assert_eq!(key.cell_count(), 9);
/// assert_eq!(key.as_str(), "X---O----X");
///
/// assert!(StateKey::parse("X---O----").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(String);

impl StateKey {
    /// Parse and validate a state key from a string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidStateKey`] if the key has fewer than nine
    /// cells, contains characters other than `-`, `X` and `O`, or does not end
    /// with a player character.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let invalid = |reason: &str| crate::Error::InvalidStateKey {
            key: s.to_string(),
            reason: reason.to_string(),
        };

        let mut chars = s.chars();
        match chars.next_back() {
            Some('X' | 'O') => {}
            _ => return Err(invalid("must end with the player to move (X or O)")),
        }

        let cells = chars.as_str();
        let min_cells = MIN_BOARD_DIMENSION * MIN_BOARD_DIMENSION;
        if cells.len() < min_cells {
            return Err(invalid(&format!("expected at least {min_cells} cells")));
        }
        if let Some(c) = cells.chars().find(|&c| !matches!(c, EMPTY_KEY_CHAR | 'X' | 'O')) {
            return Err(invalid(&format!("invalid cell character '{c}'")));
        }

        Ok(StateKey(s.to_string()))
    }

    /// Wrap an encoding produced by the board (unchecked, for internal use).
    pub(crate) fn from_encoding(encoding: String) -> Self {
        StateKey(encoding)
    }

    /// Number of board cells encoded in the key.
    pub fn cell_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StateKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Default hyperparameters of the learner.
pub mod defaults {
    /// Learning rate α.
    pub const LEARNING_RATE: f64 = 0.1;

    /// Discount factor γ applied per step of the backward pass.
    pub const DISCOUNT_FACTOR: f64 = 0.9;

    /// Exploration probability ε during training.
    pub const EPSILON: f64 = 0.2;

    /// Total self-play episodes per training run.
    pub const EPISODES: u64 = 5_000_000;

    /// Number of parallel workers.
    pub const WORKERS: usize = 20;

    /// Terminal reward for the winning side.
    pub const WIN_REWARD: f64 = 1.0;

    /// Terminal reward for both sides of a drawn game.
    pub const DRAW_REWARD: f64 = 0.0;

    /// Terminal reward for the losing side.
    pub const LOSS_REWARD: f64 = -1.0;
}
