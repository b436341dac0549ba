//! Generalized Tic-Tac-Toe: boards of any size >= 3x3, three in a row wins

pub mod board;
pub mod game;
pub mod lines;

pub use board::{Board, Cell, Player};
pub use game::GameOutcome;
pub use lines::{OriginBound, WINDOW_LINES, check_win, check_win_with};
