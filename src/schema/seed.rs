//! Seed types for initializing a grid.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compute::{Grid, GridError};

/// Complete seed specification for grid initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Random {
                density: 0.25,
                seed: 42,
            },
        }
    }
}

/// Predefined patterns for initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Leave every cell dead.
    Empty,
    /// Live cells at explicit logical coordinates.
    Cells {
        /// List of (row, col) entries, 1-based.
        cells: Vec<(usize, usize)>,
    },
    /// Independent random cells.
    Random {
        /// Probability of each cell being alive (0.0-1.0).
        density: f64,
        /// Random seed.
        seed: u64,
    },
    /// A `*`/`o` dump body, rows separated by newlines.
    Dump {
        body: String,
    },
    /// Every addressable cell alive.
    Full,
}

/// Seeding errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Pattern(#[from] crate::pattern::PatternError),
    #[error("Random density {0} is outside 0.0..=1.0")]
    InvalidDensity(f64),
}

impl Seed {
    /// Write the pattern into `grid`, replacing its previous contents.
    pub fn apply(&self, grid: &mut Grid) -> Result<(), SeedError> {
        match &self.pattern {
            Pattern::Empty => grid.clear(),
            Pattern::Cells { cells } => {
                // Validate first so a bad coordinate leaves the grid untouched.
                for &(row, col) in cells {
                    grid.get(row, col)?;
                }
                grid.clear();
                for &(row, col) in cells {
                    grid.set(row, col, true)?;
                }
            }
            Pattern::Random { density, seed } => {
                if !(0.0..=1.0).contains(density) {
                    return Err(SeedError::InvalidDensity(*density));
                }
                let mut rng = StdRng::seed_from_u64(*seed);
                let states: Vec<bool> = (0..grid.area()).map(|_| rng.gen_bool(*density)).collect();
                grid.fill_from(&states);
            }
            Pattern::Dump { body } => crate::pattern::load(grid, body)?,
            Pattern::Full => {
                grid.clear();
                grid.invert();
            }
        }
        Ok(())
    }
}
