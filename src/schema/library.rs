//! Named rule-set library, one `B|S|n|t|Name` entry per line.

use std::fmt;

use super::{Neighborhood, RuleError, RuleSet, Topology, parse_counts};

/// A rule set with a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesetEntry {
    pub name: String,
    pub rules: RuleSet,
}

impl RulesetEntry {
    pub fn new(name: impl Into<String>, rules: RuleSet) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Parse one line. Returns `Ok(None)` for lines with fewer than four
    /// fields, which the library skips.
    ///
    /// Five fields are `B|S|n|t|Name`; the legacy four-field form
    /// `B|S|n|Name` is read as bounded.
    pub fn parse(line: &str) -> Result<Option<Self>, LibraryError> {
        let fields: Vec<&str> = line.trim().split('|').collect();
        let (birth, survival, mode, edge, name) = match fields.as_slice() {
            [b, s, n, t, name, ..] => (*b, *s, *n, Some(*t), *name),
            [b, s, n, name] => (*b, *s, *n, None, *name),
            _ => return Ok(None),
        };

        let neighborhood = Neighborhood::from_code(mode)
            .ok_or_else(|| LibraryError::InvalidNeighborhood(mode.to_string()))?;
        let topology = match edge {
            Some(code) => Topology::from_code(code)
                .ok_or_else(|| LibraryError::InvalidTopology(code.to_string()))?,
            None => Topology::Bounded,
        };

        Ok(Some(Self {
            name: name.to_string(),
            rules: RuleSet {
                birth: parse_counts(birth, neighborhood)?,
                survival: parse_counts(survival, neighborhood)?,
                neighborhood,
                topology,
            },
        }))
    }
}

impl fmt::Display for RulesetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.rules.birth_digits(),
            self.rules.survival_digits(),
            self.rules.neighborhood.code(),
            self.rules.topology.code(),
            self.name
        )
    }
}

/// Library parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Invalid neighborhood field {0:?}")]
    InvalidNeighborhood(String),
    #[error("Invalid topology field {0:?}")]
    InvalidTopology(String),
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// What [`RulesetLibrary::add`] did with an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended as a new entry.
    Added,
    /// The same rule set was already listed; it now carries the new name.
    Renamed { previous: String },
    /// The name was empty; nothing changed.
    Ignored,
}

/// Ordered list of named rule sets. A rule set appears at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesetLibrary {
    entries: Vec<RulesetEntry>,
}

impl Default for RulesetLibrary {
    fn default() -> Self {
        Self {
            entries: vec![RulesetEntry::new("Life", RuleSet::conway())],
        }
    }
}

impl RulesetLibrary {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse library text, skipping blank and short lines.
    pub fn parse(text: &str) -> Result<Self, LibraryError> {
        let mut library = Self::empty();
        for line in text.lines() {
            if let Some(entry) = RulesetEntry::parse(line)? {
                library.entries.push(entry);
            }
        }
        Ok(library)
    }

    pub fn entries(&self) -> &[RulesetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RulesetEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Add an entry under a sanitized name.
    ///
    /// Spaces and `|` in the name become `_`. If an entry with the same rule
    /// set exists it is renamed in place instead of being duplicated.
    pub fn add(&mut self, entry: RulesetEntry) -> AddOutcome {
        let name = sanitize_name(&entry.name);
        if name.is_empty() {
            return AddOutcome::Ignored;
        }
        match self.entries.iter_mut().find(|e| e.rules == entry.rules) {
            Some(existing) => {
                let previous = std::mem::replace(&mut existing.name, name);
                AddOutcome::Renamed { previous }
            }
            None => {
                self.entries.push(RulesetEntry::new(name, entry.rules));
                AddOutcome::Added
            }
        }
    }

    /// Remove an entry by name, returning it.
    pub fn remove(&mut self, name: &str) -> Option<RulesetEntry> {
        let index = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(index))
    }
}

impl fmt::Display for RulesetLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

fn sanitize_name(name: &str) -> String {
    name.trim().replace([' ', '|'], "_")
}
