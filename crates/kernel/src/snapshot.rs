use relay_common::PointId;
use serde::{Deserialize, Serialize};

use crate::history::Transition;
use crate::state::SimulationState;
use crate::world::Point;

/// Final result of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub final_holder: PointId,
    pub throws: u64,
}

/// Read-only view of a run handed to renderers after each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub points: Vec<Point>,
    pub current: usize,
    /// Recent throws, oldest first.
    pub history: Vec<Transition>,
    pub throws: u64,
    pub running: bool,
    pub outcome: Option<Outcome>,
}

impl Snapshot {
    /// Capture the current state of a run.
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            points: state.world().points().to_vec(),
            current: state.current(),
            history: state.history().to_vec(),
            throws: state.throws(),
            running: state.is_running(),
            outcome: state.outcome(),
        }
    }

    pub fn current_point(&self) -> Option<&Point> {
        self.points.get(self.current)
    }

    pub fn active_count(&self) -> usize {
        self.points.iter().filter(|p| p.active).count()
    }
}

impl SimulationState {
    /// Final holder and throw count, once the run has terminated.
    pub fn outcome(&self) -> Option<Outcome> {
        (!self.running).then(|| Outcome {
            final_holder: self.current_point().id,
            throws: self.throws,
        })
    }
}
