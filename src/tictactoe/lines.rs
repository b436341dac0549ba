//! Winning line detection over 3x3 windows of an arbitrary board

use serde::{Deserialize, Serialize};

use super::{Board, Cell, Player};
use crate::types::MIN_BOARD_DIMENSION;

/// Winning lines inside a 3x3 window as `(dx, dy)` offsets, in the order they
/// are tested.
pub const WINDOW_LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)], // rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)], // columns
    [(0, 0), (1, 1), (2, 2)],
    [(2, 0), (1, 1), (0, 2)], // diagonals
];

/// Which window origins a scan visits on boards larger than 3x3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginBound {
    /// Every origin with `x <= width - 3` and `y <= height - 3`.
    #[default]
    Inclusive,
    /// Origins with `x < width - 3` and `y < height - 3`, which skips the last
    /// window column and row. Kept to reproduce tables trained with that scan.
    Exclusive,
}

/// Find the first completed line on the board, scanning every window.
pub fn check_win(board: &Board) -> Option<Player> {
    check_win_with(board, OriginBound::Inclusive)
}

/// Find the first completed line, visiting window origins in row-major order.
///
/// A 3x3 board always checks its single window regardless of `bound`.
pub fn check_win_with(board: &Board, bound: OriginBound) -> Option<Player> {
    let span_x = board.width() - MIN_BOARD_DIMENSION;
    let span_y = board.height() - MIN_BOARD_DIMENSION;
    if span_x == 0 && span_y == 0 {
        return win_within_window(board, 0, 0);
    }

    let (max_x, max_y) = match bound {
        OriginBound::Inclusive => (span_x + 1, span_y + 1),
        OriginBound::Exclusive => (span_x, span_y),
    };
    (0..max_y)
        .flat_map(|y| (0..max_x).map(move |x| (x, y)))
        .find_map(|(x, y)| win_within_window(board, x, y))
}

/// Test the eight lines of the window whose top-left corner is `(x, y)`.
fn win_within_window(board: &Board, x: usize, y: usize) -> Option<Player> {
    WINDOW_LINES.iter().find_map(|line| {
        let [a, b, c] = line.map(|(dx, dy)| board.cell(x + dx, y + dy));
        if a != Cell::Empty && a == b && b == c {
            a.to_player()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from_rows(rows: &[&str]) -> Board {
        let mut board = Board::new(rows[0].len(), rows.len()).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                board.place(x, y, Cell::from_char(c).unwrap()).unwrap();
            }
        }
        board
    }

    #[test]
    fn test_has_won_horizontal() {
        let board = board_from_rows(&["XXX", "---", "---"]);
        assert_eq!(check_win(&board), Some(Player::X));
    }

    #[test]
    fn test_has_won_vertical() {
        let board = board_from_rows(&["-O-", "-O-", "XOX"]);
        assert_eq!(check_win(&board), Some(Player::O));
    }

    #[test]
    fn test_has_won_diagonal() {
        let board = board_from_rows(&["X-O", "-XO", "--X"]);
        assert_eq!(check_win(&board), Some(Player::X));

        let board = board_from_rows(&["X-O", "-O-", "OX-"]);
        assert_eq!(check_win(&board), Some(Player::O));
    }

    #[test]
    fn test_empty_and_drawn_boards() {
        assert_eq!(check_win(&Board::default()), None);

        let drawn = board_from_rows(&["XOX", "XOO", "OXX"]);
        assert!(drawn.is_full());
        assert_eq!(check_win(&drawn), None);
    }

    #[test]
    fn test_larger_board_finds_line_in_any_window() {
        let board = board_from_rows(&["-----", "-----", "-----", "--OOO"]);
        assert_eq!(check_win(&board), Some(Player::O));

        let board = board_from_rows(&["----", "---X", "---X", "---X"]);
        assert_eq!(check_win(&board), Some(Player::X));
    }

    #[test]
    fn test_exclusive_bound_skips_last_window() {
        let board = board_from_rows(&["----", "---X", "---X", "---X"]);
        assert_eq!(check_win_with(&board, OriginBound::Exclusive), None);

        let board = board_from_rows(&["X---", "X---", "X---", "----"]);
        assert_eq!(
            check_win_with(&board, OriginBound::Exclusive),
            Some(Player::X)
        );
    }

    #[test]
    fn test_broken_line_is_not_a_win() {
        let board = board_from_rows(&["XX-XX", "-----", "-----"]);
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_deterministic() {
        let board = board_from_rows(&["XOX", "OXO", "--X"]);
        let first = check_win(&board);
        for _ in 0..10 {
            assert_eq!(check_win(&board), first);
        }
        assert_eq!(first, Some(Player::X));
    }
}
