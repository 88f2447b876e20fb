//! Startup settings in the `key:value` ini format.
//!
//! ```text
//! #grid:
//! height:50
//! width:50
//!
//! #game:
//! interval:100
//! mode:m
//! ruleB:3
//! ruleS:23
//!
//! #color:
//! r:0
//! g:0
//! b:0
//! ```
//!
//! An optional `edge:t` / `edge:p` line selects the topology.

use std::fmt::Write as _;
use std::str::FromStr;

use super::{AutomatonConfig, Neighborhood, Rgb, RuleError, RuleSet, Topology, parse_counts};

/// Settings text written when no settings file exists yet.
pub const DEFAULT_SETTINGS: &str = "#grid:\nheight:50\nwidth:50\n\n#game:\ninterval:100\nmode:m\nruleB:3\nruleS:23\n\n#color:\nr:0\ng:0\nb:0\n";

/// Parsed startup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub height: usize,
    pub width: usize,
    pub interval_ms: u64,
    pub neighborhood: Neighborhood,
    pub topology: Topology,
    /// Birth digits as written (`"3"`).
    pub birth: String,
    /// Survival digits as written (`"23"`).
    pub survival: String,
    pub color: Rgb,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            height: 50,
            width: 50,
            interval_ms: 100,
            neighborhood: Neighborhood::Moore,
            topology: Topology::Bounded,
            birth: "3".to_string(),
            survival: "23".to_string(),
            color: Rgb::BLACK,
        }
    }
}

/// Settings parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Line {line}: expected key:value, got {text:?}")]
    MalformedLine { line: usize, text: String },
    #[error("Line {line}: invalid value {value:?} for {key}")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
    #[error(transparent)]
    Rule(#[from] RuleError),
}

fn number<T: FromStr>(line: usize, key: &str, value: &str) -> Result<T, SettingsError> {
    value.parse().map_err(|_| SettingsError::InvalidValue {
        line,
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl Settings {
    /// Parse settings text. Missing keys keep their defaults.
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let entry = raw.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            let (key, value) = entry
                .split_once(':')
                .ok_or_else(|| SettingsError::MalformedLine {
                    line,
                    text: raw.to_string(),
                })?;
            let value = value.trim();

            match key.trim() {
                "height" => settings.height = number(line, key, value)?,
                "width" => settings.width = number(line, key, value)?,
                "interval" => settings.interval_ms = number(line, key, value)?,
                "mode" => {
                    settings.neighborhood = Neighborhood::from_code(value).ok_or_else(|| {
                        SettingsError::InvalidValue {
                            line,
                            key: key.to_string(),
                            value: value.to_string(),
                        }
                    })?
                }
                "edge" => {
                    settings.topology = Topology::from_code(value).ok_or_else(|| {
                        SettingsError::InvalidValue {
                            line,
                            key: key.to_string(),
                            value: value.to_string(),
                        }
                    })?
                }
                "ruleB" => settings.birth = value.to_string(),
                "ruleS" => settings.survival = value.to_string(),
                "r" => settings.color.r = number(line, key, value)?,
                "g" => settings.color.g = number(line, key, value)?,
                "b" => settings.color.b = number(line, key, value)?,
                other => log::warn!("Ignoring unknown settings key {:?} on line {}", other, line),
            }
        }

        Ok(settings)
    }

    /// Rule set described by these settings.
    pub fn rules(&self) -> Result<RuleSet, RuleError> {
        Ok(RuleSet {
            birth: parse_counts(&self.birth, self.neighborhood)?,
            survival: parse_counts(&self.survival, self.neighborhood)?,
            neighborhood: self.neighborhood,
            topology: self.topology,
        })
    }

    /// Convert to a run configuration.
    pub fn to_config(&self) -> Result<AutomatonConfig, SettingsError> {
        Ok(AutomatonConfig {
            height: self.height,
            width: self.width,
            rules: self.rules()?,
            interval_ms: self.interval_ms,
            color: self.color,
        })
    }

    /// Render back to the ini format.
    pub fn to_ini(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "#grid:\nheight:{}\nwidth:{}\n", self.height, self.width);
        let _ = writeln!(
            out,
            "#game:\ninterval:{}\nmode:{}\nedge:{}\nruleB:{}\nruleS:{}\n",
            self.interval_ms,
            self.neighborhood.code(),
            self.topology.code(),
            self.birth,
            self.survival
        );
        let _ = writeln!(
            out,
            "#color:\nr:{}\ng:{}\nb:{}",
            self.color.r, self.color.g, self.color.b
        );
        out
    }
}
