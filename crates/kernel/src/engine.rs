use relay_common::{Direction, GridPoint, PointId};
use serde::{Deserialize, Serialize};

use crate::history::Transition;
use crate::state::SimulationState;
use crate::world::World;

/// Outcome of a single engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepResult {
    /// The token moved to a new holder.
    Continued(Transition),
    /// No active point lies on any ray from the holder; the run is over.
    Terminated { last_holder: usize },
}

/// A receiver found by the ray search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayMatch {
    pub index: usize,
    pub direction: Direction,
    pub distance: u64,
}

impl SimulationState {
    /// Advance the run by one throw.
    ///
    /// The holder is eliminated first, then the eight rays are searched in
    /// the order given by [`Direction::search_order`] of the arrival
    /// direction. The first ray with any active point wins and the nearest
    /// point on it receives the token.
    ///
    /// # Panics
    /// If the run has already terminated or the holder is inactive. Both mean
    /// the caller kept stepping a finished run.
    pub fn step(&mut self) -> StepResult {
        assert!(self.running, "step called on a terminated run");
        let origin = self.current;
        assert!(
            self.world.deactivate(origin),
            "token holder {origin} was already inactive"
        );

        let source = self.world.points()[origin].position;
        let Some(found) = find_receiver(&self.world, source, self.incoming) else {
            self.running = false;
            tracing::info!(
                last_holder = %self.world.points()[origin].id,
                throws = self.throws,
                "relay terminated"
            );
            return StepResult::Terminated {
                last_holder: origin,
            };
        };

        let transition = Transition {
            from: origin,
            to: found.index,
        };
        self.throws += 1;
        self.history.record(transition);
        // Seen from the receiver, the token came back along the throw ray.
        self.incoming = found.direction.opposite();
        self.current = found.index;

        tracing::debug!(
            from = %PointId::from_index(origin),
            to = %PointId::from_index(found.index),
            direction = %found.direction,
            distance = found.distance,
            throws = self.throws,
            "throw"
        );
        StepResult::Continued(transition)
    }

    /// Step until the run terminates, returning every throw and the last holder.
    ///
    /// Terminates within `world.len()` steps because each step eliminates one
    /// point for good.
    pub fn run_to_end(&mut self) -> (Vec<Transition>, usize) {
        let mut throws = Vec::new();
        loop {
            match self.step() {
                StepResult::Continued(t) => throws.push(t),
                StepResult::Terminated { last_holder } => return (throws, last_holder),
            }
        }
    }
}

/// Search the eight rays from `source`, starting one position past `incoming`.
///
/// Only active points are candidates, so an eliminated holder never receives.
pub fn find_receiver(world: &World, source: GridPoint, incoming: Direction) -> Option<RayMatch> {
    incoming
        .search_order()
        .find_map(|direction| nearest_on_ray(world, source, direction))
}

/// Nearest active point exactly on `direction` from `source`.
///
/// Ties (coincident points) go to the lowest index.
pub fn nearest_on_ray(world: &World, source: GridPoint, direction: Direction) -> Option<RayMatch> {
    let mut best: Option<RayMatch> = None;
    for index in world.active_indices() {
        let position = world.points()[index].position;
        let Some((ray, distance)) = Direction::classify(source, position) else {
            continue;
        };
        if ray != direction {
            continue;
        }
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(RayMatch {
                index,
                direction,
                distance,
            });
        }
    }
    best
}
