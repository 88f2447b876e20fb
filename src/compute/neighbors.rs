//! Live-neighbor counting under a neighborhood and an edge topology.

use crate::schema::{Neighborhood, RuleSet, Topology};

use super::{Grid, GridError};

/// Cardinal offsets (row, col).
const VON_NEUMANN_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Cardinal and diagonal offsets (row, col).
const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Offsets examined for a neighborhood, center excluded.
#[inline]
pub fn neighbor_offsets(neighborhood: Neighborhood) -> &'static [(isize, isize)] {
    match neighborhood {
        Neighborhood::Moore => &MOORE_OFFSETS,
        Neighborhood::VonNeumann => &VON_NEUMANN_OFFSETS,
    }
}

/// Read-only view of a margin-padded buffer.
#[derive(Clone, Copy)]
pub(crate) struct Lattice<'a> {
    pub cells: &'a [bool],
    pub height: usize,
    pub width: usize,
}

impl<'a> Lattice<'a> {
    pub fn of(grid: &'a Grid) -> Self {
        Self {
            cells: grid.cells(),
            height: grid.height(),
            width: grid.width(),
        }
    }

    #[inline]
    pub fn alive(&self, row: usize, col: usize) -> bool {
        self.cells[row * (self.width + 2) + col]
    }

    /// Live-neighbor count of an addressable cell. No bounds check.
    #[inline]
    pub fn count(&self, row: usize, col: usize, neighborhood: Neighborhood, topology: Topology) -> u8 {
        match topology {
            Topology::Bounded => self.count_bounded(row, col, neighbor_offsets(neighborhood)),
            Topology::Toroidal => self.count_toroidal(row, col, neighborhood),
        }
    }

    #[inline]
    fn count_bounded(&self, row: usize, col: usize, offsets: &[(isize, isize)]) -> u8 {
        let mut count = 0;
        for &(dr, dc) in offsets {
            let r = row.wrapping_add_signed(dr);
            let c = col.wrapping_add_signed(dc);
            // Margin cells never contribute, whatever the buffer holds.
            let alive =
                (1..=self.height).contains(&r) && (1..=self.width).contains(&c) && self.alive(r, c);
            count += alive as u8;
        }
        count
    }

    /// Every Moore offset is remapped first; the center test and the
    /// Von Neumann row/column test apply to the remapped cell. On a torus one
    /// cell across, off-axis offsets land on the center's own row or column.
    #[inline]
    fn count_toroidal(&self, row: usize, col: usize, neighborhood: Neighborhood) -> u8 {
        let mut count = 0;
        for &(dr, dc) in &MOORE_OFFSETS {
            let r = wrap(row.wrapping_add_signed(dr), self.height);
            let c = wrap(col.wrapping_add_signed(dc), self.width);
            if r == row && c == col {
                continue;
            }
            if neighborhood == Neighborhood::VonNeumann && r != row && c != col {
                continue;
            }
            count += self.alive(r, c) as u8;
        }
        count
    }
}

/// Fold a margin coordinate onto the opposite edge: `0 -> n`, `n + 1 -> 1`.
#[inline]
fn wrap(coord: usize, n: usize) -> usize {
    if coord == 0 {
        n
    } else if coord == n + 1 {
        1
    } else {
        coord
    }
}

/// Count the live neighbors of `(row, col)` under `rules`' neighborhood and
/// topology.
///
/// The result is in `0..=8`. Von Neumann counts stay within `0..=4` except on
/// a torus one cell across, where up to 6 offsets share the center's row or
/// column.
pub fn live_neighbors(grid: &Grid, rules: &RuleSet, row: usize, col: usize) -> Result<u8, GridError> {
    if !grid.contains(row, col) {
        return Err(GridError::OutOfBounds {
            row,
            col,
            height: grid.height(),
            width: grid.width(),
        });
    }
    Ok(Lattice::of(grid).count(row, col, rules.neighborhood, rules.topology))
}
