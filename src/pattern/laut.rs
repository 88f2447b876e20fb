//! Saved-game files (`.laut`).

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::compute::{GenerationEngine, GridError, buffer_len};
use crate::schema::{AutomatonConfig, Neighborhood, Rgb, RuleError, RuleSet, Topology, parse_counts};

use super::codec::{self, PatternError};

/// File extension of saved games.
pub const LAUT_EXTENSION: &str = "laut";

/// Saved-game errors.
#[derive(Debug, thiserror::Error)]
pub enum LautError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{0} is not a .laut file")]
    NotLaut(PathBuf),
    #[error("Missing {0}")]
    MissingField(&'static str),
    #[error("Invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Contents of a saved game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LautFile {
    pub rules: RuleSet,
    pub height: usize,
    pub width: usize,
    /// Dump body, one `*`/`o` line per row.
    pub body: String,
    pub color: Rgb,
    pub interval_ms: u64,
}

impl LautFile {
    /// Snapshot an engine's rules and grid.
    pub fn capture(engine: &GenerationEngine, color: Rgb, interval_ms: u64) -> Self {
        let grid = engine.grid();
        Self {
            rules: engine.rules().clone(),
            height: grid.height(),
            width: grid.width(),
            body: codec::dump(grid),
            color,
            interval_ms,
        }
    }

    /// Resize the engine, replace its rules and load the saved cells.
    ///
    /// The body is decoded before anything is touched, so a truncated body
    /// leaves the engine as it was.
    pub fn apply(&self, engine: &mut GenerationEngine) -> Result<(), LautError> {
        let states = codec::decode(&self.body, self.height, self.width)?;
        engine.resize(self.height, self.width)?;
        engine.set_rules(self.rules.clone());
        engine.grid_mut().fill_from(&states);
        Ok(())
    }

    /// Build a fresh engine from this file.
    pub fn to_engine(&self) -> Result<GenerationEngine, LautError> {
        let mut engine = GenerationEngine::new(self.height, self.width, self.rules.clone())?;
        self.apply(&mut engine)?;
        Ok(engine)
    }

    pub fn config(&self) -> AutomatonConfig {
        AutomatonConfig {
            height: self.height,
            width: self.width,
            rules: self.rules.clone(),
            interval_ms: self.interval_ms,
            color: self.color,
        }
    }

    /// Write the file contents.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(
            w,
            "{}|{}|{}",
            self.rules.birth_digits(),
            self.rules.survival_digits(),
            self.rules.neighborhood.code()
        )?;
        writeln!(w, "{}|{}", self.height, self.width)?;
        writeln!(w, "{}", self.rules.topology.code())?;
        w.write_all(self.body.as_bytes())?;
        if !self.body.ends_with('\n') {
            writeln!(w)?;
        }
        writeln!(w, "{} {} {}", self.color.r, self.color.g, self.color.b)?;
        writeln!(w, "{}", self.interval_ms)?;
        Ok(())
    }

    /// Read file contents. Fields are whitespace separated.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, LautError> {
        let mut text = String::new();
        r.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// Parse file contents from text.
    pub fn parse(text: &str) -> Result<Self, LautError> {
        let mut tokens = text.split_whitespace();
        let mut next = |field: &'static str| tokens.next().ok_or(LautError::MissingField(field));

        let ruleset = next("rule set")?;
        let [birth, survival, mode] = split_fields::<3>(ruleset, "rule set")?;
        let neighborhood = Neighborhood::from_code(mode).ok_or_else(|| invalid("neighborhood", mode))?;

        let dims = next("dimensions")?;
        let [height, width] = split_fields::<2>(dims, "dimensions")?;
        let height: usize = height.parse().map_err(|_| invalid("height", height))?;
        let width: usize = width.parse().map_err(|_| invalid("width", width))?;
        if buffer_len(height, width).is_none() {
            return Err(GridError::InvalidDimension { height, width }.into());
        }

        let edge = next("topology")?;
        let topology = Topology::from_code(edge).ok_or_else(|| invalid("topology", edge))?;

        let mut body = String::new();
        for _ in 0..height {
            let row = next("pattern row")?;
            if row.chars().count() != width {
                return Err(invalid("pattern row", row));
            }
            body.push_str(row);
            body.push('\n');
        }

        let mut channel = |name: &'static str| -> Result<u8, LautError> {
            let value = next(name)?;
            value.parse().map_err(|_| invalid(name, value))
        };
        let color = Rgb::new(channel("red")?, channel("green")?, channel("blue")?);

        let interval = next("interval")?;
        let interval_ms = interval.parse().map_err(|_| invalid("interval", interval))?;

        Ok(Self {
            rules: RuleSet {
                birth: parse_counts(birth, neighborhood)?,
                survival: parse_counts(survival, neighborhood)?,
                neighborhood,
                topology,
            },
            height,
            width,
            body,
            color,
            interval_ms,
        })
    }

    /// Load a `.laut` file. Other extensions are refused.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LautError> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some(LAUT_EXTENSION) {
            return Err(LautError::NotLaut(path.to_path_buf()));
        }
        let mut file = File::open(path)?;
        let laut = Self::read_from(&mut file)?;
        log::info!("Pattern loaded: {}", path.display());
        Ok(laut)
    }

    /// Save to `path`, appending `.laut` if it is missing. Returns the path
    /// actually written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, LautError> {
        let path = with_laut_extension(path.as_ref());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        log::info!("Pattern saved: {}", path.display());
        Ok(path)
    }
}

fn with_laut_extension(path: &Path) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some(LAUT_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(LAUT_EXTENSION);
        PathBuf::from(name)
    }
}

fn invalid(field: &'static str, value: &str) -> LautError {
    LautError::InvalidField {
        field,
        value: value.to_string(),
    }
}

fn split_fields<'a, const N: usize>(token: &'a str, field: &'static str) -> Result<[&'a str; N], LautError> {
    let parts: Vec<&str> = token.split('|').collect();
    parts.try_into().map_err(|_| invalid(field, token))
}
