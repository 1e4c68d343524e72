//! Graph container APIs used by `skein`.
//!
//! The model is attribute-oriented: nodes carry an open string attribute map, and the
//! layout boundary is a pair of well-known attributes (`pos`, `pinned`) serialized the
//! way the description format stores them.

pub mod format;
mod graph;

pub use format::{ParseError, parse, write};
pub use graph::{Edge, Graph, PINNED_KEY, POS_KEY, SPECIAL_KEY};
