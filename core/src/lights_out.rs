//! Lights Out on a fixed 5×5 grid.
//!
//! Pressing a cell flips it and its orthogonal neighbors. Puzzles are built by
//! pressing random cells on a dark board, so every puzzle is solvable by
//! replaying the same presses.

use alloc::vec::Vec;
use core::ops::RangeInclusive;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Grid dimensions as `(rows, cols)`.
pub const GRID_SIZE: Coord2 = (5, 5);

/// How many random presses scramble a new puzzle.
pub const SCRAMBLE_MOVES: RangeInclusive<u8> = 8..=15;

/// Pressed when the scramble cancels itself out, leaving a plus shape.
const FALLBACK_PRESS: Coord2 = (GRID_SIZE.0 / 2, GRID_SIZE.1 / 2);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    lights: Array2<bool>,
}

impl Board {
    /// All lights off.
    pub fn new() -> Self {
        Self {
            lights: Array2::default(GRID_SIZE.to_nd_index()),
        }
    }

    /// Board with exactly the given cells lit.
    pub fn from_lit(lit: &[Coord2]) -> Result<Self> {
        let mut board = Self::new();
        for &coords in lit {
            let coords = validate_coords(coords, GRID_SIZE)?;
            board.lights[coords.to_nd_index()] = true;
        }
        Ok(board)
    }

    pub fn is_lit(&self, coords: Coord2) -> Option<bool> {
        self.lights.get(coords.to_nd_index()).copied()
    }

    /// Flips `coords` and its in-bounds orthogonal neighbors.
    pub fn toggle(&mut self, coords: Coord2) -> Result<()> {
        let coords = validate_coords(coords, GRID_SIZE)?;
        self.press(coords);
        Ok(())
    }

    pub fn is_solved(&self) -> bool {
        self.lights.iter().all(|&lit| !lit)
    }

    pub fn lit_count(&self) -> CellCount {
        self.lights.iter().filter(|&&lit| lit).count() as CellCount
    }

    fn press(&mut self, coords: Coord2) {
        self.flip(coords);
        for neighbor in Neighborhood::VonNeumann.iter(coords, GRID_SIZE) {
            self.flip(neighbor);
        }
    }

    fn flip(&mut self, coords: Coord2) {
        let light = &mut self.lights[coords.to_nd_index()];
        *light = !*light;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// A scrambled board together with the presses that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub board: Board,
    /// Replaying these presses turns every light off.
    pub sequence: Vec<Coord2>,
}

/// Scrambles a dark board with [`SCRAMBLE_MOVES`] random presses.
pub fn generate_solvable_puzzle<R: Rng>(rng: &mut R) -> Puzzle {
    let (rows, cols) = GRID_SIZE;
    let presses = rng.random_range(SCRAMBLE_MOVES);
    let sequence = (0..presses)
        .map(|_| (rng.random_range(0..rows), rng.random_range(0..cols)))
        .collect();

    puzzle_from_sequence(sequence)
}

/// Coordinates in `sequence` must lie inside [`GRID_SIZE`].
fn puzzle_from_sequence(sequence: Vec<Coord2>) -> Puzzle {
    let mut board = Board::new();
    for &coords in &sequence {
        board.press(coords);
    }

    if board.is_solved() {
        log::debug!(
            "scramble of {} presses cancelled out, using fallback press",
            sequence.len()
        );
        let sequence = alloc::vec![FALLBACK_PRESS];
        board.press(FALLBACK_PRESS);
        return Puzzle { board, sequence };
    }

    log::trace!("generated lights out puzzle: {:?}", sequence);
    Puzzle { board, sequence }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled,
    Solved,
}

/// A puzzle being played, refusing presses once every light is off.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightsOutGame {
    board: Board,
    moves: u32,
}

impl LightsOutGame {
    pub fn new(board: Board) -> Self {
        Self { board, moves: 0 }
    }

    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self::new(generate_solvable_puzzle(rng).board)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_solved(&self) -> bool {
        self.board.is_solved()
    }

    pub fn press(&mut self, coords: Coord2) -> Result<ToggleOutcome> {
        if self.board.is_solved() {
            return Err(GameError::AlreadyEnded);
        }

        self.board.toggle(coords)?;
        self.moves += 1;

        Ok(if self.board.is_solved() {
            log::debug!("lights out solved in {} moves", self.moves);
            ToggleOutcome::Solved
        } else {
            ToggleOutcome::Toggled
        })
    }
}
