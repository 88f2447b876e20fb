//! Compute module - Grid storage, neighbor counting and generation stepping.

mod driver;
mod engine;
mod grid;
mod neighbors;

pub use driver::*;
pub use engine::*;
pub use grid::*;
pub use neighbors::*;
