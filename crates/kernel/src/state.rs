use relay_common::{Direction, PointId};
use serde::{Deserialize, Serialize};

use crate::history::{DEFAULT_HISTORY_CAPACITY, HistoryLog};
use crate::world::{Point, World, fnv_mix};

/// Errors raised while building a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    #[error("world has no points")]
    EmptyWorld,
    #[error("start index {index} is out of range for {len} points")]
    StartOutOfRange { index: usize, len: usize },
    #[error("start point {0} is not active")]
    StartInactive(PointId),
    #[error("history capacity must be positive")]
    ZeroHistoryCapacity,
}

/// Everything a run needs between steps.
///
/// Only [`SimulationState::step`] mutates it. A finished or abandoned run is
/// discarded and rebuilt, never rewound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub(crate) world: World,
    pub(crate) current: usize,
    pub(crate) incoming: Direction,
    pub(crate) throws: u64,
    pub(crate) history: HistoryLog,
    pub(crate) running: bool,
}

impl SimulationState {
    /// Start a run with the token at `start`, having arrived from `incoming`.
    pub fn new(world: World, start: usize, incoming: Direction) -> Result<Self, KernelError> {
        Self::with_history_capacity(world, start, incoming, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(
        world: World,
        start: usize,
        incoming: Direction,
        capacity: usize,
    ) -> Result<Self, KernelError> {
        if capacity == 0 {
            return Err(KernelError::ZeroHistoryCapacity);
        }
        if world.is_empty() {
            return Err(KernelError::EmptyWorld);
        }
        let point = world.get(start).ok_or(KernelError::StartOutOfRange {
            index: start,
            len: world.len(),
        })?;
        if !point.active {
            return Err(KernelError::StartInactive(point.id));
        }
        Ok(Self {
            world,
            current: start,
            incoming,
            throws: 0,
            history: HistoryLog::new(capacity),
            running: true,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Index of the point holding the token.
    pub fn current(&self) -> usize {
        self.current
    }

    /// The holder's point. Always present: `current` is validated at
    /// construction and only ever replaced by an index found in the world.
    pub fn current_point(&self) -> &Point {
        &self.world.points()[self.current]
    }

    /// Direction the token arrived from, seen from the holder.
    pub fn incoming(&self) -> Direction {
        self.incoming
    }

    pub fn throws(&self) -> u64 {
        self.throws
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Deterministic hash of the full run state, for replay comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h = self.world.state_hash();
        fnv_mix(&mut h, &(self.current as u64).to_le_bytes());
        fnv_mix(&mut h, &[self.incoming.index() as u8, self.running as u8]);
        fnv_mix(&mut h, &self.throws.to_le_bytes());
        h
    }
}
