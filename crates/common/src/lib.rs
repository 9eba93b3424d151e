//! Shared types for the token relay engine.
//!
//! # Invariants
//! - Direction arithmetic is modulo 8 in the fixed order N, NE, E, SE, S, SW, W, NW.
//! - `+y` is north and `+x` is east on the grid.

mod direction;
mod types;

pub use direction::{Direction, ParseDirectionError};
pub use types::{GridPoint, PointId};

pub fn crate_info() -> &'static str {
    "relay-common v0.1.0"
}
