use serde::{Deserialize, Serialize};

/// Position of the speed dial, 0 (slowest) to 100 (fastest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Speed(u8);

/// How a tick turns into engine steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Run this many steps on every tick.
    Batch { steps_per_tick: u32 },
    /// Run one step per tick, at most once per `min_elapsed_ms`.
    Delay { min_elapsed_ms: u64 },
}

impl Speed {
    pub const MIN: Speed = Speed(0);
    pub const MAX: Speed = Speed(100);
    /// Above this the dial switches from delay mode to batch mode.
    pub const BATCH_THRESHOLD: u8 = 90;

    /// Dial position, clamped to 0..=100.
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX.0))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Map the dial onto a cadence.
    ///
    /// Above 90 every tick runs `(speed - 90) * 5` steps (50 at full speed).
    /// Otherwise a single step runs once `1000 - speed * 11` time units have
    /// passed since the last executed tick (1000 at 0, 10 at 90).
    pub fn cadence(self) -> Cadence {
        if self.0 > Self::BATCH_THRESHOLD {
            Cadence::Batch {
                steps_per_tick: u32::from(self.0 - Self::BATCH_THRESHOLD) * 5,
            }
        } else {
            Cadence::Delay {
                min_elapsed_ms: 1000 - u64::from(self.0) * 11,
            }
        }
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(50)
    }
}

impl From<u8> for Speed {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}
