//! Shared argument groups for CLI commands

use clap::Args;

use crate::types::MIN_BOARD_DIMENSION;

/// Board geometry; also fixes the action space of the table
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardArgs {
    /// Board width (at least 3)
    #[arg(long, default_value_t = MIN_BOARD_DIMENSION)]
    pub width: usize,

    /// Board height (at least 3)
    #[arg(long, default_value_t = MIN_BOARD_DIMENSION)]
    pub height: usize,
}

impl BoardArgs {
    pub fn action_space(&self) -> usize {
        self.width * self.height
    }
}

impl Default for BoardArgs {
    fn default() -> Self {
        Self {
            width: MIN_BOARD_DIMENSION,
            height: MIN_BOARD_DIMENSION,
        }
    }
}
