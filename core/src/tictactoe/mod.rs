//! Tic-Tac-Toe board rules and a minimax opponent.
//!
//! Slots are indexed `0..9` in row-major order. `X` always moves first.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

pub use search::*;

mod search;

pub const SLOT_COUNT: usize = 9;

/// Three rows, three columns, two diagonals.
const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub const fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "X",
            Self::O => "O",
        })
    }
}

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Draw
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    Playing,
    Won(Mark),
    Draw,
}

impl MatchState {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    slots: [Option<Mark>; SLOT_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from raw slots, rejecting positions that alternating
    /// play starting with `X` cannot reach by counts alone.
    pub fn from_slots(slots: [Option<Mark>; SLOT_COUNT]) -> Result<Self> {
        let board = Self { slots };
        let x_count = board.count(Mark::X);
        let o_count = board.count(Mark::O);

        if x_count == o_count || x_count == o_count + 1 {
            Ok(board)
        } else {
            Err(GameError::InvalidBoard)
        }
    }

    pub fn slots(&self) -> &[Option<Mark>; SLOT_COUNT] {
        &self.slots
    }

    /// The mark that plays next.
    pub fn to_move(&self) -> Mark {
        if self.count(Mark::X) == self.count(Mark::O) {
            Mark::X
        } else {
            Mark::O
        }
    }

    pub fn empty_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| index)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn winner(&self) -> Option<Mark> {
        check_winner(self)
    }

    pub fn state(&self) -> MatchState {
        match self.winner() {
            Some(mark) => MatchState::Won(mark),
            None if self.is_full() => MatchState::Draw,
            None => MatchState::Playing,
        }
    }

    /// Places the mark of the side to move on `slot`.
    pub fn play(&mut self, slot: usize) -> Result<MatchState> {
        if slot >= SLOT_COUNT {
            return Err(GameError::InvalidCoords);
        }
        if self.state().is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        if self.slots[slot].is_some() {
            return Err(GameError::CellOccupied);
        }

        let mark = self.to_move();
        self.slots[slot] = Some(mark);
        let state = self.state();
        log::trace!("{} played slot {}, now {:?}", mark, slot, state);
        Ok(state)
    }

    fn count(&self, mark: Mark) -> usize {
        self.slots.iter().filter(|&&slot| slot == Some(mark)).count()
    }
}

/// Returns the mark owning a completed line, if any.
pub fn check_winner(board: &Board) -> Option<Mark> {
    WINNING_LINES.iter().find_map(|&[a, b, c]| {
        let mark = board.slots[a]?;
        (board.slots[b] == Some(mark) && board.slots[c] == Some(mark)).then_some(mark)
    })
}
