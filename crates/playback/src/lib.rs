//! Playback: drives relay steps at a rate set by a single speed dial.
//!
//! # Invariants
//! - The scheduler never steps a terminated run.
//! - Time is injected through [`Clock`] / [`TickSource`]; nothing here reads
//!   the wall clock unless handed a [`SystemClock`].
//! - Speed changes apply from the next tick, without smoothing.

mod clock;
mod config;
mod driver;
mod scheduler;
mod speed;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, PlaybackConfig};
pub use driver::{IntervalTimer, ScriptedTicks, TickSource, VirtualTimer, drive};
pub use scheduler::{PlaybackStats, PlaybackStatus, Scheduler, TickOutcome, TickReport};
pub use speed::{Cadence, Speed};

pub fn crate_info() -> &'static str {
    "relay-playback v0.1.0"
}
