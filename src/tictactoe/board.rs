//! Board representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{EMPTY_KEY_CHAR, MIN_BOARD_DIMENSION, StateKey};

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => EMPTY_KEY_CHAR,
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '-' | '.' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }

    /// The player owning this mark, if any
    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }
}

/// A player in the game. X always opens a self-play episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    pub fn to_char(self) -> char {
        self.to_cell().to_char()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Rectangular grid of cells, addressed by `(x, y)` with `x` the column.
///
/// Boards only grow: [`Board::resize`] never drops rows or columns, so a cell
/// keeps its coordinates for the lifetime of the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidSize`] if either dimension is below 3.
    pub fn new(width: usize, height: usize) -> Result<Self, crate::Error> {
        Self::validate_size(width, height)?;
        Ok(Board {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        })
    }

    fn validate_size(width: usize, height: usize) -> Result<(), crate::Error> {
        if width < MIN_BOARD_DIMENSION || height < MIN_BOARD_DIMENSION {
            return Err(crate::Error::InvalidSize { width, height });
        }
        Ok(())
    }

    /// Grow the board to at least `width` x `height`.
    ///
    /// Dimensions smaller than the current ones are ignored. Added rows and
    /// columns are filled with [`Cell::Empty`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidSize`] if either requested dimension is
    /// below 3, even when the board is already larger.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), crate::Error> {
        Self::validate_size(width, height)?;

        let width = width.max(self.width);
        let height = height.max(self.height);
        for row in &mut self.rows {
            row.resize(width, Cell::Empty);
        }
        self.rows.resize(height, vec![Cell::Empty; width]);

        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells, which is also the size of the action space.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<(), crate::Error> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(crate::Error::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Write `cell` at `(x, y)`, overwriting whatever was there.
    ///
    /// Occupancy is not checked here; callers decide whether a move is legal.
    pub fn place(&mut self, x: usize, y: usize, cell: Cell) -> Result<(), crate::Error> {
        self.check_bounds(x, y)?;
        self.rows[y][x] = cell;
        Ok(())
    }

    /// Read the cell at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<Cell, crate::Error> {
        self.check_bounds(x, y)?;
        Ok(self.rows[y][x])
    }

    /// Cell at `(x, y)` without bounds reporting; callers guarantee range.
    pub(crate) fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Row-major action index of `(x, y)`.
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Coordinates of a row-major action index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfRange`] if the index is past the last cell.
    pub fn coords(&self, action: usize) -> Result<(usize, usize), crate::Error> {
        let (x, y) = (action % self.width, action / self.width);
        self.check_bounds(x, y)?;
        Ok((x, y))
    }

    /// Empty cells as row-major action indices
    pub fn legal_moves(&self) -> Vec<usize> {
        self.rows
            .iter()
            .flatten()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.rows.iter().flatten().all(|&cell| cell != Cell::Empty)
    }

    /// Encode the board and the player to move as a [`StateKey`].
    pub fn state_key(&self, to_move: Player) -> StateKey {
        let mut encoding = String::with_capacity(self.cell_count() + 1);
        encoding.extend(self.rows.iter().flatten().map(|cell| cell.to_char()));
        encoding.push(to_move.to_char());
        StateKey::from_encoding(encoding)
    }

    /// Winner of the board, if any window holds a line.
    pub fn winner(&self) -> Option<Player> {
        super::lines::check_win(self)
    }
}

impl Default for Board {
    /// The classic empty 3x3 board.
    fn default() -> Self {
        Board {
            width: MIN_BOARD_DIMENSION,
            height: MIN_BOARD_DIMENSION,
            rows: vec![vec![Cell::Empty; MIN_BOARD_DIMENSION]; MIN_BOARD_DIMENSION],
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = "+".repeat(self.width + 2);
        writeln!(f, "{border}")?;
        for row in &self.rows {
            let line: String = row.iter().map(|cell| cell.to_char()).collect();
            writeln!(f, "+{line}+")?;
        }
        writeln!(f, "{border}")
    }
}
