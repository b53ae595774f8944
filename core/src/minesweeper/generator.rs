use rand::Rng;

use super::*;

/// Whether `coords` lies in the 3×3 block centered on `safe`.
fn in_safe_zone(coords: Coord2, safe: Coord2) -> bool {
    coords.0.abs_diff(safe.0) <= 1 && coords.1.abs_diff(safe.1) <= 1
}

impl Board {
    /// Places [`MINE_COUNT`] mines uniformly at random, keeping `safe` and its
    /// neighbors clear, then recomputes every adjacency count.
    ///
    /// [`Board::reveal`] calls this with a generator seeded from the board's
    /// seed; it only needs to be called directly to drive placement from a
    /// different source of randomness.
    pub fn place_mines<R: Rng>(&mut self, safe: Coord2, rng: &mut R) -> Result<()> {
        let safe = validate_coords(safe, BOARD_SIZE)?;
        if self.mines_placed() {
            return Err(GameError::MinesAlreadyPlaced);
        }

        let (rows, cols) = BOARD_SIZE;
        let mut placed: CellCount = 0;
        let mut samples: u32 = 0;

        while placed < MINE_COUNT {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            samples += 1;

            if in_safe_zone(coords, safe) {
                continue;
            }

            let cell = &mut self.cells_mut()[coords.to_nd_index()];
            if cell.is_mine {
                continue;
            }
            cell.is_mine = true;
            placed += 1;
        }

        log::debug!(
            "placed {} mines around safe cell {:?} after {} samples",
            placed,
            safe,
            samples
        );
        self.finish_placement();
        Ok(())
    }

    /// Recomputes adjacency counts and the mine total from the current mines.
    pub(super) fn finish_placement(&mut self) {
        let (rows, cols) = BOARD_SIZE;
        let mut mine_count: CellCount = 0;

        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if self.cells()[coords.to_nd_index()].is_mine {
                    mine_count += 1;
                    continue;
                }

                let adjacent = Neighborhood::Moore
                    .iter(coords, BOARD_SIZE)
                    .filter(|&pos| self.cells()[pos.to_nd_index()].is_mine)
                    .count() as u8;
                self.cells_mut()[coords.to_nd_index()].adjacent_mines = adjacent;
            }
        }

        self.set_mines_placed(mine_count);
    }
}
