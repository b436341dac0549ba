//! Backward credit assignment over a finished episode
//!
//! After a game ends, every recorded move is pulled toward a terminal target
//! with a temporal difference step, newest move first. The target shrinks by
//! the discount factor after each step, so early moves receive less credit
//! than the move that decided the game.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    episode::{EpisodeHistory, Step},
    value_table::ValueTable,
};
use crate::{
    app::LearningConfig,
    tictactoe::{GameOutcome, Player},
    types::defaults,
};

/// Terminal rewards from the point of view of one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSchedule {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl RewardSchedule {
    /// Reward `player` receives for `outcome`
    pub fn for_player(&self, outcome: GameOutcome, player: Player) -> f64 {
        match outcome {
            GameOutcome::Win(winner) if winner == player => self.win,
            GameOutcome::Win(_) => self.loss,
            GameOutcome::Draw => self.draw,
        }
    }
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            win: defaults::WIN_REWARD,
            draw: defaults::DRAW_REWARD,
            loss: defaults::LOSS_REWARD,
        }
    }
}

impl fmt::Display for RewardSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "win={},draw={},loss={}", self.win, self.draw, self.loss)
    }
}

impl FromStr for RewardSchedule {
    type Err = crate::Error;

    /// Parse `win=1,draw=0,loss=-1`; omitted keys keep their defaults.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| crate::Error::ParseReward {
            input: s.to_string(),
            reason,
        };

        let mut schedule = RewardSchedule::default();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (key, value_str) = trimmed
                .split_once('=')
                .ok_or_else(|| invalid(format!("entry '{trimmed}' is not key=value")))?;
            let value: f64 = value_str
                .trim()
                .parse()
                .map_err(|_| invalid(format!("'{value_str}' is not a number")))?;
            if !value.is_finite() {
                return Err(invalid(format!("'{value_str}' is not finite")));
            }
            match key.trim().to_ascii_lowercase().as_str() {
                "win" => schedule.win = value,
                "draw" => schedule.draw = value,
                "loss" => schedule.loss = value,
                other => {
                    return Err(invalid(format!(
                        "unknown key '{other}', expected win, draw, or loss"
                    )));
                }
            }
        }
        Ok(schedule)
    }
}

/// How the terminal reward is spread over the moves of a self-play game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreditAssignment {
    /// Each player's moves form their own backward stream, starting from
    /// that player's reward and decaying once per own move.
    #[default]
    PerPlayer,
    /// One stream over the whole interleaved history, starting from the win
    /// reward (or the draw reward) and decaying once per ply whoever moved.
    Interleaved,
}

impl CreditAssignment {
    /// Propagate the outcome of a finished episode into `table`.
    pub fn assign(
        self,
        table: &mut ValueTable,
        history: &EpisodeHistory,
        outcome: GameOutcome,
        config: &LearningConfig,
    ) {
        match self {
            CreditAssignment::PerPlayer => {
                for player in [Player::X, Player::O] {
                    assign_for_player(table, history, outcome, player, config);
                }
            }
            CreditAssignment::Interleaved => {
                let target = match outcome {
                    GameOutcome::Win(_) => config.rewards.win,
                    GameOutcome::Draw => config.rewards.draw,
                };
                backpropagate(table, history.steps().iter(), target, config);
            }
        }
    }
}

impl fmt::Display for CreditAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CreditAssignment::PerPlayer => "per-player",
            CreditAssignment::Interleaved => "interleaved",
        };
        f.write_str(label)
    }
}

impl FromStr for CreditAssignment {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-player" | "per_player" | "player" => Ok(CreditAssignment::PerPlayer),
            "interleaved" | "shared" => Ok(CreditAssignment::Interleaved),
            _ => Err(crate::Error::ParseCredit {
                input: s.to_string(),
                expected: "per-player, interleaved".to_string(),
            }),
        }
    }
}

/// Credit only the moves `player` made, from `player`'s point of view.
pub fn assign_for_player(
    table: &mut ValueTable,
    history: &EpisodeHistory,
    outcome: GameOutcome,
    player: Player,
    config: &LearningConfig,
) {
    let target = config.rewards.for_player(outcome, player);
    let steps = history.steps().iter().filter(|step| step.player == player);
    backpropagate(table, steps, target, config);
}

/// Walk `steps` newest first, moving each value toward a decaying target.
fn backpropagate<'a, I>(table: &mut ValueTable, steps: I, mut target: f64, config: &LearningConfig)
where
    I: DoubleEndedIterator<Item = &'a Step>,
{
    for step in steps.rev() {
        table.td_update(&step.state, step.action, target, config.learning_rate);
        target *= config.discount_factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Board;

    /// X plays 0, 1, 2 along the top row while O plays 3 and 4.
    fn x_wins_top_row() -> EpisodeHistory {
        let mut board = Board::default();
        let mut history = EpisodeHistory::default();
        let mut player = Player::X;
        for action in [0, 3, 1, 4, 2] {
            history.push(Step {
                state: board.state_key(player),
                action,
                player,
            });
            let (x, y) = board.coords(action).unwrap();
            board.place(x, y, player.to_cell()).unwrap();
            player = player.opponent();
        }
        history
    }

    fn value_of(table: &ValueTable, step: &Step) -> f64 {
        table.value(step.state.as_str(), step.action)
    }

    #[test]
    fn test_per_player_rewards_winner_and_punishes_loser() {
        let history = x_wins_top_row();
        let config = LearningConfig::default();
        let mut table = ValueTable::new(9);
        CreditAssignment::PerPlayer.assign(
            &mut table,
            &history,
            GameOutcome::Win(Player::X),
            &config,
        );

        let steps = history.steps();
        // X: targets 1.0, 0.9, 0.81 from the last move backwards
        assert!((value_of(&table, &steps[4]) - 0.1).abs() < 1e-12);
        assert!((value_of(&table, &steps[2]) - 0.09).abs() < 1e-12);
        assert!((value_of(&table, &steps[0]) - 0.081).abs() < 1e-12);
        // O: targets -1.0, -0.9
        assert!((value_of(&table, &steps[3]) + 0.1).abs() < 1e-12);
        assert!((value_of(&table, &steps[1]) + 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_interleaved_decays_through_every_ply() {
        let history = x_wins_top_row();
        let config = LearningConfig::default();
        let mut table = ValueTable::new(9);
        CreditAssignment::Interleaved.assign(
            &mut table,
            &history,
            GameOutcome::Win(Player::X),
            &config,
        );

        let steps = history.steps();
        let expected = [0.06561, 0.0729, 0.081, 0.09, 0.1];
        for (step, want) in steps.iter().zip(expected) {
            assert!((value_of(&table, step) - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_draw_pulls_toward_draw_reward() {
        let history = x_wins_top_row();
        let config = LearningConfig::default();
        let mut table = ValueTable::new(9);
        let state = history.steps()[4].state.clone();
        table.update(&state, 2, 0.5);

        CreditAssignment::PerPlayer.assign(&mut table, &history, GameOutcome::Draw, &config);
        assert!((table.value(state.as_str(), 2) - 0.45).abs() < 1e-12);
        assert_eq!(table.value(history.steps()[3].state.as_str(), 4), 0.0);
    }

    #[test]
    fn test_assign_for_player_touches_only_that_player() {
        let history = x_wins_top_row();
        let config = LearningConfig::default();
        let mut table = ValueTable::new(9);
        assign_for_player(
            &mut table,
            &history,
            GameOutcome::Win(Player::X),
            Player::O,
            &config,
        );
        assert_eq!(table.len(), 2);
        assert!(value_of(&table, &history.steps()[3]) < 0.0);
    }

    #[test]
    fn test_reward_schedule_parsing() {
        let schedule: RewardSchedule = "win=3, draw=0.5,loss=-2".parse().unwrap();
        assert_eq!(
            schedule,
            RewardSchedule {
                win: 3.0,
                draw: 0.5,
                loss: -2.0
            }
        );

        let partial: RewardSchedule = "draw=0.25".parse().unwrap();
        assert_eq!(partial.win, 1.0);
        assert_eq!(partial.draw, 0.25);

        assert!("win".parse::<RewardSchedule>().is_err());
        assert!("tie=1".parse::<RewardSchedule>().is_err());
        assert!("win=abc".parse::<RewardSchedule>().is_err());
        assert_eq!(
            RewardSchedule::default().to_string(),
            "win=1,draw=0,loss=-1"
        );
    }

    #[test]
    fn test_credit_assignment_parsing() {
        assert_eq!(
            "per-player".parse::<CreditAssignment>().unwrap(),
            CreditAssignment::PerPlayer
        );
        assert_eq!(
            "Interleaved".parse::<CreditAssignment>().unwrap(),
            CreditAssignment::Interleaved
        );
        assert!("random".parse::<CreditAssignment>().is_err());
        assert_eq!(CreditAssignment::default().to_string(), "per-player");
    }
}
