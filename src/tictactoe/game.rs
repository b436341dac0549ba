//! Game outcomes

use serde::{Deserialize, Serialize};

use super::{
    board::{Board, Player},
    lines::{OriginBound, check_win_with},
};

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Terminal outcome of the board, or `None` while the game is still open.
    ///
    /// A line in any scanned window wins; a full board without one is a draw.
    pub fn of(board: &Board, bound: OriginBound) -> Option<Self> {
        match check_win_with(board, bound) {
            Some(winner) => Some(GameOutcome::Win(winner)),
            None if board.is_full() => Some(GameOutcome::Draw),
            None => None,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Win(player) => Some(player),
            GameOutcome::Draw => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Cell;

    #[test]
    fn test_outcome_of_open_board() {
        let mut board = Board::default();
        assert_eq!(GameOutcome::of(&board, OriginBound::Inclusive), None);

        board.place(1, 1, Cell::X).unwrap();
        assert_eq!(GameOutcome::of(&board, OriginBound::Inclusive), None);
    }

    #[test]
    fn test_outcome_of_won_and_drawn_boards() {
        let mut board = Board::default();
        for y in 0..3 {
            board.place(2, y, Cell::O).unwrap();
        }
        assert_eq!(
            GameOutcome::of(&board, OriginBound::Inclusive),
            Some(GameOutcome::Win(Player::O))
        );
        assert_eq!(GameOutcome::Win(Player::O).winner(), Some(Player::O));

        let mut drawn = Board::default();
        for (idx, c) in "XOXXOOOXX".chars().enumerate() {
            drawn.place(idx % 3, idx / 3, Cell::from_char(c).unwrap()).unwrap();
        }
        assert_eq!(
            GameOutcome::of(&drawn, OriginBound::Inclusive),
            Some(GameOutcome::Draw)
        );
        assert_eq!(GameOutcome::Draw.winner(), None);
    }
}
