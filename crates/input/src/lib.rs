//! Input format: text tokens mapped to a relay scenario.
//!
//! # Invariants
//! - Malformed coordinate pairs truncate the point list; they never fail the parse.
//! - A parsed scenario always has a start index inside its point list.

pub mod scenario;
mod tokens;

pub use scenario::{ParseError, Scenario, parse_scenario};
