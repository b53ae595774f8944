use serde::{Deserialize, Serialize};

/// A single Minesweeper cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    /// Mines among the up-to-8 neighbors, only meaningful for non-mine cells.
    pub adjacent_mines: u8,
}

impl Cell {
    /// Whether the flood fill may open this cell.
    pub const fn is_openable(self) -> bool {
        !(self.is_mine || self.is_revealed || self.is_flagged)
    }
}
