#![no_std]

//! Board engines for the arcade mini-games: Minesweeper, Lights Out and
//! Tic-Tac-Toe.
//!
//! Each engine owns its board type and is independent of the others. Boards
//! are plain values held by the caller; randomness is always supplied by the
//! caller, either as a seed or as an [`rand::Rng`].

extern crate alloc;

pub use error::*;
pub use types::*;

pub mod lights_out;
pub mod minesweeper;
pub mod tictactoe;

mod error;
mod types;
