//! `*`/`o` text dump of a grid's addressable cells.

use crate::compute::Grid;

/// Character for a live cell.
pub const LIVE_CHAR: char = '*';
/// Character written for a dead cell. On load anything but [`LIVE_CHAR`] is dead.
pub const DEAD_CHAR: char = 'o';

/// Pattern decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Pattern too short: expected {expected} cells, found {found}")]
    MalformedPattern { expected: usize, found: usize },
}

/// Dump the grid as `height` lines of `width` cells, each line ending in `\n`.
pub fn dump(grid: &Grid) -> String {
    let mut out = String::with_capacity(grid.height() * (grid.width() + 1));
    for row in 1..=grid.height() {
        for col in 1..=grid.width() {
            let alive = grid.cells()[grid.idx(row, col)];
            out.push(if alive { LIVE_CHAR } else { DEAD_CHAR });
        }
        out.push('\n');
    }
    out
}

/// Read `height * width` cells positionally into `grid`.
///
/// After each row a single line terminator (`\n`, `\r\n` or `\r`) is skipped
/// if present. Characters past the last cell are ignored. The grid is only
/// written once the whole body has been decoded, so a short input leaves it
/// unchanged.
pub fn load(grid: &mut Grid, text: &str) -> Result<(), PatternError> {
    let states = decode(text, grid.height(), grid.width())?;
    grid.fill_from(&states);
    Ok(())
}

/// Decode a dump body into row-major cell states.
pub fn decode(text: &str, height: usize, width: usize) -> Result<Vec<bool>, PatternError> {
    let expected = height.saturating_mul(width);
    // Every cell takes at least one byte of input.
    let mut states = Vec::with_capacity(expected.min(text.len()));
    let mut chars = text.chars().peekable();

    for _ in 0..height {
        for _ in 0..width {
            match chars.next() {
                Some(c) => states.push(c == LIVE_CHAR),
                None => {
                    return Err(PatternError::MalformedPattern {
                        expected,
                        found: states.len(),
                    });
                }
            }
        }
        match chars.peek() {
            Some('\n') => {
                chars.next();
            }
            Some('\r') => {
                chars.next();
                chars.next_if_eq(&'\n');
            }
            _ => {}
        }
    }

    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_with(height: usize, width: usize, live: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(height, width).unwrap();
        for &(r, c) in live {
            grid.set(r, c, true).unwrap();
        }
        grid
    }

    #[test]
    fn test_dump_format() {
        let grid = grid_with(2, 3, &[(1, 1), (2, 3)]);
        assert_eq!(dump(&grid), "*oo\noo*\n");
    }

    #[test]
    fn test_load_basic() {
        let mut grid = Grid::new(2, 3).unwrap();
        load(&mut grid, "o*o\n**o\n").unwrap();
        assert_eq!(
            grid.live_cells().collect::<Vec<_>>(),
            vec![(1, 2), (2, 1), (2, 2)]
        );
        assert_eq!(grid.population(), 3);
    }

    #[test]
    fn test_load_without_trailing_newline() {
        let mut grid = Grid::new(2, 2).unwrap();
        load(&mut grid, "*o\no*").unwrap();
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_load_crlf_and_flat() {
        let mut crlf = Grid::new(2, 2).unwrap();
        load(&mut crlf, "*o\r\no*\r\n").unwrap();
        let mut flat = Grid::new(2, 2).unwrap();
        load(&mut flat, "*oo*").unwrap();
        assert_eq!(
            crlf.live_cells().collect::<Vec<_>>(),
            flat.live_cells().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_other_chars_are_dead() {
        let mut grid = Grid::new(1, 4).unwrap();
        load(&mut grid, "*.x#").unwrap();
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), vec![(1, 1)]);
    }

    #[test]
    fn test_truncated_input_leaves_grid() {
        let mut grid = grid_with(2, 3, &[(2, 2)]);
        let err = load(&mut grid, "***\n**").unwrap_err();
        assert_eq!(
            err,
            PatternError::MalformedPattern {
                expected: 6,
                found: 5
            }
        );
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), vec![(2, 2)]);
    }

    #[test]
    fn test_decode_huge_dimensions_is_malformed() {
        let err = decode("*o*", usize::MAX, 2).unwrap_err();
        assert_eq!(
            err,
            PatternError::MalformedPattern {
                expected: usize::MAX,
                found: 3
            }
        );
    }

    #[test]
    fn test_load_does_not_resize() {
        let mut grid = Grid::new(1, 2).unwrap();
        load(&mut grid, "**\n**\n**\n").unwrap();
        assert_eq!((grid.height(), grid.width()), (1, 2));
        assert_eq!(grid.population(), 2);
    }

    proptest! {
        #[test]
        fn test_dump_load_roundtrip(
            (h, w, cells) in (1usize..16, 1usize..16)
                .prop_flat_map(|(h, w)| (Just(h), Just(w), prop::collection::vec(any::<bool>(), h * w)))
        ) {
            let mut original = Grid::new(h, w).unwrap();
            original.fill_from(&cells);

            let mut restored = Grid::new(h, w).unwrap();
            load(&mut restored, &dump(&original)).unwrap();

            prop_assert_eq!(
                restored.live_cells().collect::<Vec<_>>(),
                original.live_cells().collect::<Vec<_>>()
            );
            prop_assert_eq!(restored.population(), original.population());
        }
    }
}
