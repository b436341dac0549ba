//! Self-play episodes driven by an epsilon-greedy policy

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::value_table::ValueTable;
use crate::{
    app::LearningConfig,
    error::{Error, Result},
    tictactoe::{Board, GameOutcome, Player},
    types::StateKey,
};

/// One recorded move: the position before it, the cell played and the mover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub state: StateKey,
    pub action: usize,
    pub player: Player,
}

/// Moves of one game in play order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeHistory {
    steps: Vec<Step>,
}

impl EpisodeHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub history: EpisodeHistory,
    pub outcome: GameOutcome,
}

/// Plays complete self-play games against a value table.
///
/// X always opens. Each ply the mover explores a uniformly random empty cell
/// with probability ε and otherwise plays the highest-valued empty cell for
/// the current state key.
#[derive(Debug, Clone)]
pub struct EpisodeSimulator {
    config: LearningConfig,
}

impl EpisodeSimulator {
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: LearningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// ε-greedy action selection
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if `legal_moves` is empty.
    pub fn select_action<R: Rng + ?Sized>(
        &self,
        table: &ValueTable,
        state: &StateKey,
        legal_moves: &[usize],
        rng: &mut R,
    ) -> Result<usize> {
        let action = if rng.random::<f64>() < self.config.epsilon {
            // Explore: random action
            legal_moves.choose(rng).copied()
        } else {
            // Exploit: greedy action based on values
            table.best_action(state.as_str(), legal_moves)
        };
        action.ok_or(Error::NoValidMoves)
    }

    /// Play one game to its end without learning from it.
    ///
    /// # Errors
    ///
    /// Only fails if the board geometry or the table disagree with the
    /// configuration, which indicates a caller bug.
    pub fn play<R: Rng + ?Sized>(&self, table: &ValueTable, rng: &mut R) -> Result<Episode> {
        if table.action_space() != self.config.action_space() {
            return Err(Error::ActionSpaceMismatch {
                expected: self.config.action_space(),
                found: table.action_space(),
            });
        }

        let mut board = Board::new(self.config.width, self.config.height)?;
        let mut history = EpisodeHistory::with_capacity(board.cell_count());
        let mut player = Player::X;

        loop {
            let state = board.state_key(player);
            let legal_moves = board.legal_moves();
            if legal_moves.is_empty() {
                return Ok(Episode {
                    history,
                    outcome: GameOutcome::Draw,
                });
            }

            let action = self.select_action(table, &state, &legal_moves, rng)?;
            let (x, y) = board.coords(action)?;
            board.place(x, y, player.to_cell())?;
            history.push(Step {
                state,
                action,
                player,
            });

            if let Some(outcome) = GameOutcome::of(&board, self.config.window_scan) {
                return Ok(Episode { history, outcome });
            }
            player = player.opponent();
        }
    }

    /// Play one game and propagate its outcome into `table`.
    pub fn run<R: Rng + ?Sized>(&self, table: &mut ValueTable, rng: &mut R) -> Result<Episode> {
        let episode = self.play(table, rng)?;
        self.config
            .credit
            .assign(table, &episode.history, episode.outcome, &self.config);
        Ok(episode)
    }
}
