//! Schema module - Rule sets, configuration and seeding types.

mod config;
mod library;
mod rules;
mod seed;
mod settings;

pub use config::*;
pub use library::*;
pub use rules::*;
pub use seed::*;
pub use settings::*;
