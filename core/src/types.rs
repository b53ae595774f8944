/// Single coordinate axis used for board height, width, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Returns `coords` when it lies inside a grid of `size`.
pub fn validate_coords(coords: Coord2, size: Coord2) -> crate::Result<Coord2> {
    if coords.0 < size.0 && coords.1 < size.1 {
        Ok(coords)
    } else {
        Err(crate::GameError::InvalidCoords)
    }
}

/// Which cells count as adjacent to a center cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Neighborhood {
    /// The 8 surrounding cells, diagonals included.
    Moore,
    /// The 4 orthogonally adjacent cells.
    VonNeumann,
}

impl Neighborhood {
    const fn displacements(self) -> &'static [(i8, i8)] {
        match self {
            Self::Moore => &MOORE,
            Self::VonNeumann => &VON_NEUMANN,
        }
    }

    /// Iterates the in-bounds neighbors of `center` on a grid of `bounds`.
    pub fn iter(self, center: Coord2, bounds: Coord2) -> NeighborIter {
        NeighborIter::new(center, bounds, self.displacements())
    }
}

const MOORE: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const VON_NEUMANN: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (dr, dc) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(dr)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dc)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(i8, i8)],
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2, displacements: &'static [(i8, i8)]) -> Self {
        Self {
            center,
            bounds,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *self.displacements.get(usize::from(self.index))?;
            self.index += 1;

            let next_item = apply_delta(self.center, delta, self.bounds);
            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
