//! Double-buffered cell storage.
//!
//! Both buffers are `(height + 2) * (width + 2)` cells, row-major. The outer
//! ring is a dead margin that only exists so bounded neighbor lookups never
//! leave the buffer; callers address cells with logical coordinates
//! `1..=height` x `1..=width`.

/// Grid access and sizing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Grid dimensions must be positive and fit in memory, got {height}x{width}")]
    InvalidDimension { height: usize, width: usize },
    #[error("Cell ({row}, {col}) is outside the {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
}

/// Binary cell grid with a scratch buffer for the next generation.
#[derive(Debug, Clone)]
pub struct Grid {
    height: usize,
    width: usize,
    /// Current generation, margin included.
    cells: Vec<bool>,
    /// Next generation, written by the engine and swapped in on commit.
    scratch: Vec<bool>,
    population: usize,
}

impl Grid {
    /// Create an all-dead grid.
    pub fn new(height: usize, width: usize) -> Result<Self, GridError> {
        let size = buffer_len(height, width).ok_or(GridError::InvalidDimension { height, width })?;
        Ok(Self {
            height,
            width,
            cells: vec![false; size],
            scratch: vec![false; size],
            population: 0,
        })
    }

    /// Reallocate both buffers for new dimensions. All cells become dead.
    pub fn resize(&mut self, height: usize, width: usize) -> Result<(), GridError> {
        *self = Self::new(height, width)?;
        Ok(())
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of addressable cells (`height * width`).
    #[inline]
    pub fn area(&self) -> usize {
        self.height * self.width
    }

    /// Number of live addressable cells.
    #[inline]
    pub fn population(&self) -> usize {
        self.population
    }

    /// Row length of the underlying buffers, margin included.
    #[inline]
    pub(crate) fn stride(&self) -> usize {
        self.width + 2
    }

    /// Buffer index of a margin-relative coordinate.
    #[inline]
    pub(crate) fn idx(&self, row: usize, col: usize) -> usize {
        row * self.stride() + col
    }

    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (1..=self.height).contains(&row) && (1..=self.width).contains(&col)
    }

    fn check(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if self.contains(row, col) {
            Ok(self.idx(row, col))
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// State of the cell at a logical coordinate.
    pub fn get(&self, row: usize, col: usize) -> Result<bool, GridError> {
        let i = self.check(row, col)?;
        Ok(self.cells[i])
    }

    /// Draw (`true`) or erase (`false`) the cell at a logical coordinate.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<(), GridError> {
        let i = self.check(row, col)?;
        match (self.cells[i], alive) {
            (false, true) => self.population += 1,
            (true, false) => self.population -= 1,
            _ => {}
        }
        self.cells[i] = alive;
        Ok(())
    }

    /// Flip one cell, returning its new state.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<bool, GridError> {
        let alive = !self.get(row, col)?;
        self.set(row, col, alive)?;
        Ok(alive)
    }

    /// Kill every addressable cell. Dimensions are kept.
    pub fn clear(&mut self) {
        for row in 1..=self.height {
            let start = self.idx(row, 1);
            self.cells[start..start + self.width].fill(false);
        }
        self.population = 0;
    }

    /// Flip every addressable cell.
    pub fn invert(&mut self) {
        for row in 1..=self.height {
            let start = self.idx(row, 1);
            for cell in &mut self.cells[start..start + self.width] {
                *cell = !*cell;
            }
        }
        self.population = self.area() - self.population;
    }

    /// Iterate the live cells as `(row, col)` in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=self.height).flat_map(move |row| {
            (1..=self.width)
                .filter(move |&col| self.cells[self.idx(row, col)])
                .map(move |col| (row, col))
        })
    }

    /// Map a point in a `width * cell_width` by `height * cell_height` canvas
    /// to the logical cell under it.
    ///
    /// Returns `None` for points outside the canvas, so pointer events that
    /// drift off the grid are dropped instead of clamped.
    pub fn cell_at_point(
        &self,
        x: f64,
        y: f64,
        cell_width: f64,
        cell_height: f64,
    ) -> Option<(usize, usize)> {
        if !(cell_width > 0.0 && cell_height > 0.0) {
            return None;
        }
        let canvas_w = self.width as f64 * cell_width;
        let canvas_h = self.height as f64 * cell_height;
        if !(0.0..canvas_w).contains(&x) || !(0.0..canvas_h).contains(&y) {
            return None;
        }
        let row = (y / cell_height).floor() as usize + 1;
        let col = (x / cell_width).floor() as usize + 1;
        // Float rounding can land exactly on the far edge.
        Some((row.min(self.height), col.min(self.width)))
    }

    /// Recount live addressable cells.
    pub fn recount(&mut self) -> usize {
        self.population = (1..=self.height)
            .map(|row| {
                let start = self.idx(row, 1);
                self.cells[start..start + self.width]
                    .iter()
                    .filter(|&&c| c)
                    .count()
            })
            .sum();
        self.population
    }

    /// Current buffer (read) and scratch buffer (write) for a step.
    #[inline]
    pub(crate) fn buffers_mut(&mut self) -> (&[bool], &mut [bool]) {
        (&self.cells, &mut self.scratch)
    }

    /// Raw current buffer, margin included.
    #[inline]
    pub(crate) fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Make the scratch buffer the current generation.
    ///
    /// The margin is never written in either buffer, so a swap keeps it dead.
    pub(crate) fn commit(&mut self) -> usize {
        std::mem::swap(&mut self.cells, &mut self.scratch);
        self.recount()
    }

    /// Overwrite every addressable cell from a row-major `height * width` slice.
    pub(crate) fn fill_from(&mut self, states: &[bool]) {
        debug_assert_eq!(states.len(), self.area());
        for (r, row) in states.chunks(self.width).enumerate() {
            let start = self.idx(r + 1, 1);
            self.cells[start..start + self.width].copy_from_slice(row);
        }
        self.recount();
    }
}

/// Length of one margin-padded buffer, or `None` for an empty or
/// unallocatable grid.
pub(crate) fn buffer_len(height: usize, width: usize) -> Option<usize> {
    if height == 0 || width == 0 {
        return None;
    }
    height
        .checked_add(2)?
        .checked_mul(width.checked_add(2)?)
        .filter(|&len| len <= isize::MAX as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn margin_is_dead(grid: &Grid) -> bool {
        let (h, w) = (grid.height(), grid.width());
        (0..h + 2).all(|r| {
            (0..w + 2).all(|c| {
                let on_margin = r == 0 || r == h + 1 || c == 0 || c == w + 1;
                !on_margin || !grid.cells()[grid.idx(r, c)]
            })
        })
    }

    #[test]
    fn test_new_rejects_zero() {
        assert_eq!(
            Grid::new(0, 5).unwrap_err(),
            GridError::InvalidDimension {
                height: 0,
                width: 5
            }
        );
        assert!(Grid::new(5, 0).is_err());
    }

    #[test]
    fn test_new_rejects_overflowing_dimensions() {
        assert_eq!(
            Grid::new(usize::MAX, 3).unwrap_err(),
            GridError::InvalidDimension {
                height: usize::MAX,
                width: 3
            }
        );
        assert!(Grid::new(1 << 40, 1 << 40).is_err());
        assert!(buffer_len(isize::MAX as usize, 1).is_none());
        assert_eq!(buffer_len(3, 4), Some(30));
    }

    #[test]
    fn test_set_get_population() {
        let mut grid = Grid::new(4, 6).unwrap();
        grid.set(1, 1, true).unwrap();
        grid.set(4, 6, true).unwrap();
        grid.set(4, 6, true).unwrap();
        assert!(grid.get(1, 1).unwrap());
        assert!(!grid.get(2, 2).unwrap());
        assert_eq!(grid.population(), 2);

        grid.set(1, 1, false).unwrap();
        assert_eq!(grid.population(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(3, 3).unwrap();
        for (row, col) in [(0, 1), (1, 0), (4, 1), (1, 4), (0, 0)] {
            assert!(matches!(
                grid.get(row, col),
                Err(GridError::OutOfBounds { .. })
            ));
            assert!(grid.set(row, col, true).is_err());
        }
        assert!(margin_is_dead(&grid));
    }

    #[test]
    fn test_toggle() {
        let mut grid = Grid::new(2, 2).unwrap();
        assert!(grid.toggle(2, 1).unwrap());
        assert!(!grid.toggle(2, 1).unwrap());
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_resize_resets() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(2, 2, true).unwrap();
        grid.resize(5, 7).unwrap();
        assert_eq!((grid.height(), grid.width()), (5, 7));
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.live_cells().count(), 0);
        assert!(grid.resize(0, 7).is_err());
    }

    #[test]
    fn test_clear_keeps_dimensions() {
        let mut grid = Grid::new(3, 4).unwrap();
        grid.invert();
        grid.clear();
        assert_eq!((grid.height(), grid.width()), (3, 4));
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.recount(), 0);
    }

    #[test]
    fn test_invert_population() {
        let mut grid = Grid::new(3, 4).unwrap();
        grid.set(1, 2, true).unwrap();
        grid.set(3, 4, true).unwrap();
        grid.invert();
        assert_eq!(grid.population(), 10);
        assert_eq!(grid.recount(), 10);
        assert!(!grid.get(1, 2).unwrap());
        assert!(grid.get(1, 1).unwrap());
        assert!(margin_is_dead(&grid));
    }

    #[test]
    fn test_live_cells_row_major() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(3, 1, true).unwrap();
        grid.set(1, 3, true).unwrap();
        grid.set(2, 2, true).unwrap();
        let live: Vec<_> = grid.live_cells().collect();
        assert_eq!(live, vec![(1, 3), (2, 2), (3, 1)]);
    }

    #[test]
    fn test_cell_at_point() {
        let grid = Grid::new(10, 20).unwrap();
        assert_eq!(grid.cell_at_point(0.0, 0.0, 5.0, 5.0), Some((1, 1)));
        assert_eq!(grid.cell_at_point(12.0, 7.5, 5.0, 5.0), Some((2, 3)));
        assert_eq!(grid.cell_at_point(99.9, 49.9, 5.0, 5.0), Some((10, 20)));
        assert_eq!(grid.cell_at_point(100.0, 10.0, 5.0, 5.0), None);
        assert_eq!(grid.cell_at_point(10.0, 50.0, 5.0, 5.0), None);
        assert_eq!(grid.cell_at_point(-0.1, 10.0, 5.0, 5.0), None);
        assert_eq!(grid.cell_at_point(1.0, 1.0, 0.0, 5.0), None);
    }

    proptest! {
        #[test]
        fn test_double_invert_is_identity(
            (h, w, cells) in (1usize..12, 1usize..12)
                .prop_flat_map(|(h, w)| (Just(h), Just(w), prop::collection::vec(any::<bool>(), h * w)))
        ) {
            let mut grid = Grid::new(h, w).unwrap();
            grid.fill_from(&cells);
            let before: Vec<_> = grid.live_cells().collect();
            let population = grid.population();

            grid.invert();
            grid.invert();

            prop_assert_eq!(grid.live_cells().collect::<Vec<_>>(), before);
            prop_assert_eq!(grid.population(), population);
            prop_assert!(margin_is_dead(&grid));
        }
    }
}
