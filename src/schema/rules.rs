//! Rule sets for binary life-like automata.
//!
//! A rule set is a pair of neighbor-count sets (birth and survival) together
//! with the neighborhood shape and the edge topology it is evaluated under.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which surrounding cells count as neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// The 8 cells around a cell (cardinal and diagonal).
    #[default]
    Moore,
    /// The 4 cardinal cells around a cell.
    VonNeumann,
}

impl Neighborhood {
    /// Largest neighbor count this neighborhood can produce.
    #[inline]
    pub fn capacity(self) -> u8 {
        match self {
            Neighborhood::Moore => 8,
            Neighborhood::VonNeumann => 4,
        }
    }

    /// Single-character code used by the `.laut` and `.ini` formats.
    pub fn code(self) -> char {
        match self {
            Neighborhood::Moore => 'm',
            Neighborhood::VonNeumann => 'v',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(Neighborhood::Moore),
            "v" => Some(Neighborhood::VonNeumann),
            _ => None,
        }
    }
}

/// How the grid edges connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Edges have no wrap; off-grid neighbors are permanently dead.
    #[default]
    Bounded,
    /// Opposite edges are connected (torus).
    Toroidal,
}

impl Topology {
    /// Single-character code used by the `.laut` and `.ini` formats.
    pub fn code(self) -> char {
        match self {
            Topology::Bounded => 'p',
            Topology::Toroidal => 't',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "p" => Some(Topology::Bounded),
            "t" => Some(Topology::Toroidal),
            _ => None,
        }
    }
}

/// Birth/survival rule with its neighborhood and topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Neighbor counts that bring a dead cell to life.
    pub birth: BTreeSet<u8>,
    /// Neighbor counts that keep a live cell alive.
    pub survival: BTreeSet<u8>,
    #[serde(default)]
    pub neighborhood: Neighborhood,
    #[serde(default)]
    pub topology: Topology,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::conway()
    }
}

impl RuleSet {
    /// Build a Moore/bounded rule set from birth and survival counts.
    pub fn new(birth: impl IntoIterator<Item = u8>, survival: impl IntoIterator<Item = u8>) -> Self {
        Self {
            birth: birth.into_iter().collect(),
            survival: survival.into_iter().collect(),
            neighborhood: Neighborhood::Moore,
            topology: Topology::Bounded,
        }
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Conway's Game of Life: B3/S23.
    pub fn conway() -> Self {
        Self::new([3], [2, 3])
    }

    /// HighLife: B36/S23.
    pub fn high_life() -> Self {
        Self::new([3, 6], [2, 3])
    }

    /// Seeds: B2/S, nothing survives.
    pub fn seeds() -> Self {
        Self::new([2], [])
    }

    /// Day & Night: B3678/S34678.
    pub fn day_and_night() -> Self {
        Self::new([3, 6, 7, 8], [3, 4, 6, 7, 8])
    }

    /// Life without Death: B3/S012345678.
    pub fn life_without_death() -> Self {
        Self::new([3], 0..=8)
    }

    /// Whether a dead cell with `count` live neighbors is born.
    #[inline]
    pub fn births(&self, count: u8) -> bool {
        self.birth.contains(&count)
    }

    /// Whether a live cell with `count` live neighbors survives.
    #[inline]
    pub fn survives(&self, count: u8) -> bool {
        self.survival.contains(&count)
    }

    /// Next state of a cell given its current state and live-neighbor count.
    #[inline]
    pub fn next_state(&self, alive: bool, count: u8) -> bool {
        if alive {
            self.survives(count)
        } else {
            self.births(count)
        }
    }

    /// Birth counts as an ascending digit string (`"36"` for HighLife).
    pub fn birth_digits(&self) -> String {
        to_digits(&self.birth)
    }

    /// Survival counts as an ascending digit string (`"23"` for Conway).
    pub fn survival_digits(&self) -> String {
        to_digits(&self.survival)
    }

    /// Check both count sets against the neighborhood capacity.
    pub fn validate(&self) -> Result<(), RuleError> {
        let capacity = self.neighborhood.capacity();
        for &count in self.birth.iter().chain(self.survival.iter()) {
            if count > capacity {
                return Err(RuleError::CountOutOfRange { count, capacity });
            }
        }
        Ok(())
    }
}

/// Parse a digit string such as `"23"` into a count set.
///
/// Duplicate digits collapse. Digits above the neighborhood capacity and
/// non-digit characters are rejected.
pub fn parse_counts(digits: &str, neighborhood: Neighborhood) -> Result<BTreeSet<u8>, RuleError> {
    let capacity = neighborhood.capacity();
    digits
        .chars()
        .map(|c| {
            let count = c.to_digit(10).ok_or(RuleError::InvalidDigit(c))? as u8;
            if count > capacity {
                Err(RuleError::CountOutOfRange { count, capacity })
            } else {
                Ok(count)
            }
        })
        .collect()
}

fn to_digits(counts: &BTreeSet<u8>) -> String {
    counts.iter().map(|c| c.to_string()).collect()
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}/S{}", self.birth_digits(), self.survival_digits())
    }
}

impl FromStr for RuleSet {
    type Err = RuleError;

    /// Parse `B3/S23` notation into a Moore/bounded rule set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RuleError::InvalidNotation(s.to_string());
        let (b, survival) = s.trim().split_once('/').ok_or_else(invalid)?;

        let birth = b
            .strip_prefix(['B', 'b'])
            .ok_or_else(invalid)
            .and_then(|d| parse_counts(d, Neighborhood::Moore))?;
        let survival = survival
            .strip_prefix(['S', 's'])
            .ok_or_else(invalid)
            .and_then(|d| parse_counts(d, Neighborhood::Moore))?;

        Ok(Self::new(birth, survival))
    }
}

/// Rule parsing and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid digit {0:?} in neighbor count list")]
    InvalidDigit(char),
    #[error("Neighbor count {count} exceeds neighborhood capacity {capacity}")]
    CountOutOfRange { count: u8, capacity: u8 },
    #[error("Invalid rule notation {0:?}, expected e.g. B3/S23")]
    InvalidNotation(String),
}
