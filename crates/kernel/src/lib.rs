//! Relay kernel: world model, ray-search engine, bounded throw history.
//!
//! # Invariants
//! - A step is a pure function of the state: no randomness, no clock.
//! - A point's `active` flag only ever goes from `true` to `false`.
//! - A run terminates within as many steps as it has points.

pub mod engine;
pub mod history;
pub mod snapshot;
pub mod state;
pub mod world;

pub use engine::{RayMatch, StepResult, find_receiver, nearest_on_ray};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryLog, Transition};
pub use snapshot::{Outcome, Snapshot};
pub use state::{KernelError, SimulationState};
pub use world::{Point, World};
