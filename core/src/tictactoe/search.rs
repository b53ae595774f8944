use alloc::vec::Vec;
use core::{fmt, str::FromStr};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::*;

/// Chance that a `Medium` opponent plays a random slot instead of searching.
pub const MEDIUM_RANDOM_CHANCE: f64 = 0.3;

/// Score of an immediate win, reduced by one per ply of delay.
const WIN_SCORE: i32 = 10;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random empty slot
    Easy,
    /// Random with [`MEDIUM_RANDOM_CHANCE`], otherwise the same as `Hard`
    #[default]
    Medium,
    /// Exhaustive minimax
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Unknown difficulty, expected one of easy, medium or hard")]
pub struct ParseDifficultyError;

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str().eq_ignore_ascii_case(s))
            .ok_or(ParseDifficultyError)
    }
}

/// Minimax score of `board` from `ai`'s point of view, `ai` being the
/// maximizing side.
///
/// Wins score `10 - depth` and losses `depth - 10`, so faster wins and slower
/// losses are preferred; draws score `0`. Branches are cut once
/// `beta <= alpha`.
pub fn evaluate(board: &Board, ai: Mark, depth: i32, maximizing: bool, alpha: i32, beta: i32) -> i32 {
    let mut scratch = *board;
    minimax(&mut scratch, ai, depth, maximizing, alpha, beta)
}

fn minimax(
    board: &mut Board,
    ai: Mark,
    depth: i32,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    match board.winner() {
        Some(mark) if mark == ai => return WIN_SCORE - depth,
        Some(_) => return depth - WIN_SCORE,
        None if board.is_full() => return 0,
        None => {}
    }

    if maximizing {
        let mut best = i32::MIN;
        for slot in 0..SLOT_COUNT {
            if board.slots[slot].is_some() {
                continue;
            }
            board.slots[slot] = Some(ai);
            let score = minimax(board, ai, depth + 1, false, alpha, beta);
            board.slots[slot] = None;

            best = best.max(score);
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = i32::MAX;
        for slot in 0..SLOT_COUNT {
            if board.slots[slot].is_some() {
                continue;
            }
            board.slots[slot] = Some(ai.opponent());
            let score = minimax(board, ai, depth + 1, true, alpha, beta);
            board.slots[slot] = None;

            best = best.min(score);
            beta = beta.min(best);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

/// Best slot for `ai` under exhaustive search; ties go to the lowest slot.
pub fn best_move(board: &Board, ai: Mark) -> Option<usize> {
    let mut scratch = *board;
    let mut best: Option<(usize, i32)> = None;

    for slot in board.empty_slots() {
        scratch.slots[slot] = Some(ai);
        let score = minimax(&mut scratch, ai, 0, false, i32::MIN, i32::MAX);
        scratch.slots[slot] = None;

        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((slot, score));
        }
    }

    log::trace!("best move for {}: {:?}", ai, best);
    best.map(|(slot, _)| slot)
}

/// Picks the slot `ai` plays next, or `None` when the match is over.
pub fn select_move<R: Rng>(board: &Board, ai: Mark, difficulty: Difficulty, rng: &mut R) -> Option<usize> {
    if board.state().is_finished() {
        return None;
    }

    let play_random = match difficulty {
        Difficulty::Easy => true,
        Difficulty::Medium => rng.random_bool(MEDIUM_RANDOM_CHANCE),
        Difficulty::Hard => false,
    };

    if play_random {
        let empty: Vec<usize> = board.empty_slots().collect();
        let slot = empty[rng.random_range(0..empty.len())];
        log::trace!("{} difficulty picked random slot {}", difficulty, slot);
        Some(slot)
    } else {
        best_move(board, ai)
    }
}
