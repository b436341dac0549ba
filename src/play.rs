//! Interactive human vs AI session
//!
//! The human plays X and moves first by typing `x y`; the AI plays O
//! greedily from the value table. Once the game ends the AI's own moves are
//! credited from its point of view, so every session teaches the table a
//! little more. Saving the table is left to the caller.

use std::io::{BufRead, Write};

use log::debug;
use rand::{Rng, seq::IndexedRandom};

use crate::{
    Error, Result,
    app::LearningConfig,
    q_learning::{EpisodeHistory, Step, ValueTable, assign_for_player},
    tictactoe::{Board, Cell, GameOutcome, Player},
};

/// Side played by the human
pub const HUMAN: Player = Player::X;
/// Side played by the table
pub const AI: Player = Player::O;

/// One game against a human over arbitrary input and output streams.
#[derive(Debug, Clone)]
pub struct PlaySession {
    config: LearningConfig,
}

impl PlaySession {
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: LearningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Play one game, then credit the AI's moves into `table`.
    ///
    /// Unparseable, out-of-range and occupied targets are reported and
    /// re-prompted without touching the board.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionSpaceMismatch`] if `table` was trained on a
    /// different board size, and [`Error::Io`] if the streams fail or the
    /// input ends before the game does.
    pub fn play<R, W, G>(
        &self,
        table: &mut ValueTable,
        mut input: R,
        mut output: W,
        rng: &mut G,
    ) -> Result<GameOutcome>
    where
        R: BufRead,
        W: Write,
        G: Rng + ?Sized,
    {
        let mut board = Board::new(self.config.width, self.config.height)?;
        if table.action_space() != board.cell_count() {
            return Err(Error::ActionSpaceMismatch {
                expected: board.cell_count(),
                found: table.action_space(),
            });
        }

        writeln!(output, "Welcome to XXO! You are {HUMAN} and the AI is {AI}.")?;
        write!(output, "{board}")?;

        let mut ai_history = EpisodeHistory::default();
        let mut player = HUMAN;
        let outcome = loop {
            if player == HUMAN {
                let (x, y) = read_move(&board, &mut input, &mut output)?;
                board.place(x, y, HUMAN.to_cell())?;
            } else {
                let state = board.state_key(AI);
                let legal_moves = board.legal_moves();
                let action = if table.values(state.as_str()).is_some() {
                    table.best_action(state.as_str(), &legal_moves)
                } else {
                    // Unseen position: any legal move is as good as another
                    legal_moves.choose(rng).copied()
                }
                .ok_or(Error::NoValidMoves)?;

                let (x, y) = board.coords(action)?;
                board.place(x, y, AI.to_cell())?;
                ai_history.push(Step {
                    state,
                    action,
                    player: AI,
                });
                writeln!(output, "AI placed an {AI} at ({x}, {y})")?;
            }
            write!(output, "{board}")?;

            if let Some(outcome) = GameOutcome::of(&board, self.config.window_scan) {
                break outcome;
            }
            player = player.opponent();
        };

        match outcome {
            GameOutcome::Win(winner) => writeln!(output, "{winner} wins!")?,
            GameOutcome::Draw => writeln!(output, "It's a draw!")?,
        }

        assign_for_player(table, &ai_history, outcome, AI, &self.config);
        debug!(
            "Credited {} AI moves for {:?}",
            ai_history.len(),
            outcome
        );
        writeln!(
            output,
            "Game over. The AI has updated its knowledge from the game."
        )?;
        output.flush()?;
        Ok(outcome)
    }
}

/// Prompt until the human names an empty cell on the board.
fn read_move<R: BufRead, W: Write>(
    board: &Board,
    input: &mut R,
    output: &mut W,
) -> Result<(usize, usize)> {
    let mut line = String::new();
    loop {
        write!(output, "Enter your move (x y): ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::Io {
                operation: "read move".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "input ended before the game finished",
                ),
            });
        }

        let Some((x, y)) = parse_move(&line) else {
            writeln!(output, "Please enter two numbers, e.g. `1 2`.")?;
            continue;
        };
        match board.get(x, y) {
            Ok(Cell::Empty) => return Ok((x, y)),
            Ok(_) => writeln!(output, "Cell is already occupied. Try again.")?,
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}

fn parse_move(line: &str) -> Option<(usize, usize)> {
    let mut tokens = line.split_whitespace();
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    match tokens.next() {
        Some(_) => None,
        None => Some((x, y)),
    }
}
