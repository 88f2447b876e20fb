//! Life Automaton - generalized two-dimensional binary cellular automata.
//!
//! A grid of binary cells evolves under a birth/survival rule set, with a
//! Moore or Von Neumann neighborhood and bounded or toroidal edges. Conway's
//! Game of Life is the default rule (B3/S23, Moore, bounded).
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Rule sets, configuration, seeds and settings formats
//! - `compute`: Grid storage, neighbor counting, generation stepping, run driver
//! - `pattern`: `*`/`o` dump codec and `.laut` saved games
//!
//! # Example
//!
//! ```rust
//! use life_automaton::{
//!     compute::{GenerationEngine, StepOutcome},
//!     schema::RuleSet,
//! };
//!
//! // Vertical blinker on a 3x3 bounded grid
//! let mut engine = GenerationEngine::new(3, 3, RuleSet::conway()).unwrap();
//! for row in 1..=3 {
//!     engine.set(row, 2, true).unwrap();
//! }
//!
//! let outcome = engine.step();
//! assert_eq!(outcome, StepOutcome::Stepped { generation: 1, population: 3 });
//! assert!(engine.get(2, 1).unwrap() && engine.get(2, 3).unwrap());
//!
//! println!("{}", life_automaton::pattern::dump(engine.grid()));
//! ```

pub mod compute;
pub mod pattern;
pub mod schema;

// Re-export commonly used types
pub use compute::{Driver, GenerationEngine, GenerationStats, Grid, GridError, StepOutcome};
pub use pattern::{LautFile, PatternError};
pub use schema::{AutomatonConfig, Neighborhood, RuleSet, Seed, Topology};
