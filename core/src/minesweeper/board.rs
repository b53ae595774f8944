use alloc::vec;
use core::num::Saturating;
use ndarray::Array2;
use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use super::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    seed: u64,
    mine_count: CellCount,
    mines_placed: bool,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: EngineState,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Empty board awaiting its first reveal, mines will be drawn from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            cells: Array2::default(BOARD_SIZE.to_nd_index()),
            seed,
            mine_count: 0,
            mines_placed: false,
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: EngineState::default(),
            triggered_mine: None,
        }
    }

    /// Board with a fixed mine layout, for replays and puzzles where the
    /// layout is known up front.
    pub fn with_mines(mine_coords: &[Coord2]) -> Result<Self> {
        let mut board = Self::new(0);

        for &coords in mine_coords {
            let coords = validate_coords(coords, BOARD_SIZE)?;
            board.cells[coords.to_nd_index()].is_mine = true;
        }

        board.finish_placement();
        Ok(board)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn size(&self) -> Coord2 {
        BOARD_SIZE
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        mult(BOARD_SIZE.0, BOARD_SIZE.1) - self.mine_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// Mines not yet accounted for by flags, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        let mines = if self.mines_placed {
            self.mine_count
        } else {
            MINE_COUNT
        };
        (mines as isize) - (self.flagged_count.0 as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = validate_coords(coords, BOARD_SIZE)?;
        self.check_not_finished()?;

        let cell = &mut self.cells[coords.to_nd_index()];
        Ok(if cell.is_revealed {
            FlagOutcome::NoChange
        } else if cell.is_flagged {
            cell.is_flagged = false;
            self.flagged_count -= 1;
            FlagOutcome::Unflagged
        } else {
            cell.is_flagged = true;
            self.flagged_count += 1;
            FlagOutcome::Flagged
        })
    }

    /// Reveals a cell, placing the mines first when this is the first reveal.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = validate_coords(coords, BOARD_SIZE)?;
        self.check_not_finished()?;

        let cell = self.cells[coords.to_nd_index()];
        if cell.is_revealed || cell.is_flagged {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.mines_placed {
            let mut rng = SmallRng::seed_from_u64(self.seed);
            self.place_mines(coords, &mut rng)?;
        }
        self.mark_started();

        Ok(self.reveal_single_cell(coords))
    }

    /// Reveals every hidden neighbor of a numbered cell once the matching
    /// number of flags surrounds it. Hidden cells are revealed directly.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = validate_coords(coords, BOARD_SIZE)?;
        self.check_not_finished()?;

        let cell = self.cells[coords.to_nd_index()];
        if !cell.is_revealed {
            return self.reveal(coords);
        }

        if cell.adjacent_mines == 0 || cell.adjacent_mines != self.count_flagged_neighbors(coords) {
            return Ok(RevealOutcome::NoChange);
        }

        let mut outcome = RevealOutcome::NoChange;
        for neighbor in Neighborhood::Moore.iter(coords, BOARD_SIZE) {
            if self.state.is_finished() {
                break;
            }
            outcome = outcome | self.reveal_single_cell(neighbor);
        }
        Ok(outcome)
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.cells[coords.to_nd_index()];

        if cell.is_revealed || cell.is_flagged {
            return RevealOutcome::NoChange;
        }

        if cell.is_mine {
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return RevealOutcome::HitMine;
        }

        self.flood_fill(coords);

        if self.revealed_count == Saturating(self.safe_cell_count()) {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Depth-first reveal from `start`, expanding through zero cells and
    /// stopping at revealed, flagged and mined cells.
    fn flood_fill(&mut self, start: Coord2) {
        let mut to_visit = vec![start];

        while let Some(coords) = to_visit.pop() {
            let cell = &mut self.cells[coords.to_nd_index()];
            if !cell.is_openable() {
                continue;
            }

            cell.is_revealed = true;
            let expand = cell.adjacent_mines == 0;
            self.revealed_count += 1;

            if expand {
                to_visit.extend(
                    Neighborhood::Moore
                        .iter(coords, BOARD_SIZE)
                        .filter(|&pos| self.cells[pos.to_nd_index()].is_openable()),
                );
            }
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        Neighborhood::Moore
            .iter(coords, BOARD_SIZE)
            .filter(|&pos| self.cells[pos.to_nd_index()].is_flagged)
            .count() as u8
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            log::debug!("minesweeper game started");
            self.state = EngineState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        if won {
            self.state = EngineState::Won;
            self.triggered_mine = None;
        } else {
            self.state = EngineState::Lost;
            for cell in self.cells.iter_mut().filter(|cell| cell.is_mine) {
                cell.is_revealed = true;
            }
        }
        log::debug!("minesweeper game ended: {:?}", self.state);
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    pub(super) fn cells_mut(&mut self) -> &mut Array2<Cell> {
        &mut self.cells
    }

    pub(super) fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub(super) fn set_mines_placed(&mut self, mine_count: CellCount) {
        self.mine_count = mine_count;
        self.mines_placed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(mines: &[Coord2]) -> Board {
        Board::with_mines(mines).unwrap()
    }

    fn hidden(board: &Board) -> usize {
        board.cells.iter().filter(|cell| !cell.is_revealed).count()
    }

    #[test]
    fn new_board_is_empty_and_ready() {
        let board = Board::new(7);

        assert_eq!(board.state(), EngineState::Ready);
        assert!(!board.mines_placed());
        assert!(board.cells.iter().all(|&cell| cell == Cell::default()));
        assert_eq!(board.mines_left(), 10);
    }

    #[test]
    fn first_reveal_never_hits_a_mine() {
        for seed in 0..16 {
            for row in 0..BOARD_SIZE.0 {
                for col in 0..BOARD_SIZE.1 {
                    let mut board = Board::new(seed);
                    let outcome = board.reveal((row, col)).unwrap();

                    assert_ne!(outcome, RevealOutcome::HitMine, "seed {seed} at {row},{col}");
                    assert!(board.mines_placed());
                    assert_eq!(board.mine_count(), MINE_COUNT);
                    assert!(!board.cell_at((row, col)).unwrap().is_mine);
                }
            }
        }
    }

    #[test]
    fn first_click_in_center_clears_surrounding_block() {
        for seed in 0..64 {
            let mut board = Board::new(seed);
            board.reveal((4, 4)).unwrap();

            for row in 3..=5 {
                for col in 3..=5 {
                    assert!(!board.cell_at((row, col)).unwrap().is_mine);
                }
            }
            assert_eq!(board.cell_at((4, 4)).unwrap().adjacent_mines, 0);
        }
    }

    #[test]
    fn same_seed_and_click_give_same_board() {
        let mut first = Board::new(42);
        let mut second = Board::new(42);

        first.reveal((0, 8)).unwrap();
        second.reveal((0, 8)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn hit_mine_reveals_every_mine_and_ends_game() {
        let mines = &[(0, 0), (8, 8), (4, 4)];
        let mut board = board(mines);
        assert_eq!(board.reveal((0, 1)).unwrap(), RevealOutcome::Revealed);

        let outcome = board.reveal((4, 4)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(board.state(), EngineState::Lost);
        assert_eq!(board.triggered_mine(), Some((4, 4)));
        for &coords in mines {
            assert!(board.cell_at(coords).unwrap().is_revealed);
        }
    }

    #[test]
    fn flood_fill_opens_zero_region_and_stops_at_numbers() {
        let mut board = board(&[(8, 8)]);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(board.cell_at((0, 0)).unwrap().adjacent_mines, 0);
        assert_eq!(board.cell_at((7, 7)).unwrap().adjacent_mines, 1);
        assert!(board.cell_at((7, 7)).unwrap().is_revealed);
        assert!(!board.cell_at((8, 8)).unwrap().is_revealed);
        assert_eq!(hidden(&board), 1);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut board = board(&[(8, 8)]);
        assert_eq!(board.toggle_flag((0, 1)).unwrap(), FlagOutcome::Flagged);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        let flagged = board.cell_at((0, 1)).unwrap();
        assert!(flagged.is_flagged);
        assert!(!flagged.is_revealed);
        assert_eq!(board.revealed_count(), board.safe_cell_count() - 1);
    }

    #[test]
    fn walled_region_reveals_only_its_side() {
        // a full column of mines splits the board
        let wall: alloc::vec::Vec<Coord2> = (0..BOARD_SIZE.0).map(|row| (row, 4)).collect();
        let mut board = board(&wall);

        board.reveal((0, 0)).unwrap();

        for row in 0..BOARD_SIZE.0 {
            for col in 0..BOARD_SIZE.1 {
                let cell = board.cell_at((row, col)).unwrap();
                assert_eq!(cell.is_revealed, col < 4, "{row},{col}");
            }
        }
    }

    #[test]
    fn reveal_is_noop_on_flagged_or_revealed_cells() {
        let mut board = board(&[(0, 0), (8, 8)]);
        board.toggle_flag((0, 0)).unwrap();

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn toggle_flag_updates_counter_and_ignores_revealed() {
        let mut board = board(&[(0, 0), (0, 2)]);

        assert_eq!(board.toggle_flag((0, 0)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(board.flagged_count(), 1);
        assert_eq!(board.mines_left(), 1);

        board.reveal((0, 1)).unwrap();
        assert_eq!(board.toggle_flag((0, 1)).unwrap(), FlagOutcome::NoChange);

        assert_eq!(board.toggle_flag((0, 0)).unwrap(), FlagOutcome::Unflagged);
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn flags_before_first_reveal_are_allowed() {
        let mut board = Board::new(3);

        assert_eq!(board.toggle_flag((2, 2)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(board.state(), EngineState::Ready);
        assert_eq!(board.mines_left(), 9);
    }

    #[test]
    fn chord_reveal_uses_flagged_neighbors() {
        let mines = &[(0, 1), (2, 1)];
        let mut board = board(mines);

        board.reveal((1, 1)).unwrap();
        board.toggle_flag((0, 1)).unwrap();
        board.toggle_flag((2, 1)).unwrap();

        let outcome = board.chord_reveal((1, 1)).unwrap();

        assert!(outcome.has_update());
        assert!(board.cell_at((1, 0)).unwrap().is_revealed);
        assert!(board.cell_at((1, 2)).unwrap().is_revealed);
    }

    #[test]
    fn chord_reveal_on_misflag_hits_mine() {
        let mut board = board(&[(0, 1), (2, 1)]);

        board.reveal((1, 1)).unwrap();
        board.toggle_flag((0, 1)).unwrap();
        board.toggle_flag((1, 0)).unwrap();

        assert_eq!(board.chord_reveal((1, 1)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(board.triggered_mine(), Some((2, 1)));
    }

    #[test]
    fn chord_reveal_without_enough_flags_does_nothing() {
        let mut board = board(&[(0, 1), (2, 1)]);
        board.reveal((1, 1)).unwrap();
        board.toggle_flag((0, 1)).unwrap();

        assert_eq!(board.chord_reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn finished_board_rejects_moves_without_changing() {
        let mut board = board(&[(0, 0)]);
        board.reveal((0, 0)).unwrap();
        let snapshot = board.clone();

        assert_eq!(board.reveal((5, 5)), Err(GameError::AlreadyEnded));
        assert_eq!(board.toggle_flag((5, 5)), Err(GameError::AlreadyEnded));
        assert_eq!(board.chord_reveal((5, 5)), Err(GameError::AlreadyEnded));
        assert_eq!(board, snapshot);
    }

    #[test]
    fn out_of_bounds_coords_are_rejected() {
        let mut board = Board::new(1);

        assert_eq!(board.reveal((9, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_flag((0, 9)), Err(GameError::InvalidCoords));
        assert_eq!(board.cell_at((9, 9)), None);
        assert_eq!(Board::with_mines(&[(10, 1)]), Err(GameError::InvalidCoords));
    }

    #[test]
    fn board_snapshot_survives_serialization() {
        let mut board = Board::new(9);
        board.reveal((4, 4)).unwrap();
        board.toggle_flag((0, 0)).ok();

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, board);
    }
}
