//! Pattern text formats.
//!
//! The dump body lists the addressable cells row by row, `*` for live and
//! `o` for dead. A saved game (`.laut`) wraps that body with the rule set,
//! dimensions, topology, cell color and step interval, all whitespace
//! separated:
//!
//! ```text
//! 3|23|m        birth digits | survival digits | neighborhood (m or v)
//! 4|5           height | width
//! t             topology (t = toroidal, p = bounded)
//! o*ooo         `height` rows of `width` cells
//! oo*oo
//! ***oo
//! ooooo
//! 0 0 0         cell color (r g b)
//! 100           step interval in milliseconds
//! ```

mod codec;
mod laut;

pub use codec::{DEAD_CHAR, LIVE_CHAR, PatternError, decode, dump, load};
pub use laut::{LAUT_EXTENSION, LautError, LautFile};
