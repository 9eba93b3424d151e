use relay_common::PointId;
use relay_kernel::{Outcome, SimulationState, Snapshot, StepResult};

use crate::clock::Clock;
use crate::config::PlaybackConfig;
use crate::speed::{Cadence, Speed};

/// Where the scheduler is in a run's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// No run loaded.
    Idle,
    Playing,
    /// A run is loaded but ticks are ignored until resumed.
    Paused,
    /// The loaded run has terminated.
    Finished,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing loaded, or the run is paused.
    Inactive,
    /// Delay mode and not enough time has passed; render only.
    Throttled { remaining_ms: u64 },
    /// At least one throw happened and the run continues.
    Advanced,
    /// The run terminated, this tick or earlier.
    Finished(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Engine steps executed this tick, including a terminating one.
    pub steps: u32,
    pub outcome: TickOutcome,
}

impl TickReport {
    fn idle(outcome: TickOutcome) -> Self {
        Self { steps: 0, outcome }
    }

    /// Whether the renderer has new state to draw.
    pub fn executed(&self) -> bool {
        self.steps > 0
    }
}

/// Counters for the current run, for instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    pub ticks: u64,
    pub executed_ticks: u64,
    pub steps: u64,
}

/// Runs relay steps at the cadence picked by the speed dial.
///
/// The scheduler owns the run state outright. It is ticked by an external
/// source (frame callback, timer, test) with a monotonically increasing
/// timestamp and decides per tick how many steps to execute.
#[derive(Debug)]
pub struct Scheduler {
    speed: Speed,
    state: Option<SimulationState>,
    status: PlaybackStatus,
    last_executed_ms: Option<u64>,
    stats: PlaybackStats,
}

impl Scheduler {
    pub fn new(speed: Speed) -> Self {
        Self {
            speed,
            state: None,
            status: PlaybackStatus::Idle,
            last_executed_ms: None,
            stats: PlaybackStats::default(),
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(config.speed())
    }

    /// Start playing a freshly built run, replacing any current one.
    ///
    /// The first tick after loading always executes.
    pub fn load(&mut self, state: SimulationState) {
        self.status = if state.is_running() {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Finished
        };
        tracing::info!(
            points = state.world().len(),
            start = %state.current_point().id,
            incoming = %state.incoming(),
            speed = self.speed.value(),
            "run loaded"
        );
        self.state = Some(state);
        self.last_executed_ms = None;
        self.stats = PlaybackStats::default();
    }

    /// Stop stepping; honoured from the next tick.
    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.status == PlaybackStatus::Paused {
            self.status = PlaybackStatus::Playing;
        }
    }

    /// Stop and discard the run. A new run needs a fresh [`Scheduler::load`].
    pub fn reset(&mut self) {
        if self.state.take().is_some() {
            tracing::info!("run discarded");
        }
        self.status = PlaybackStatus::Idle;
        self.last_executed_ms = None;
        self.stats = PlaybackStats::default();
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    pub fn stats(&self) -> &PlaybackStats {
        &self.stats
    }

    pub fn throws(&self) -> u64 {
        self.state.as_ref().map_or(0, SimulationState::throws)
    }

    /// Id of the point currently holding the token.
    pub fn current_holder(&self) -> Option<PointId> {
        self.state.as_ref().map(|s| s.current_point().id)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.as_ref().and_then(SimulationState::outcome)
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state.as_ref().map(Snapshot::capture)
    }

    /// Tick using the clock's current time.
    pub fn tick_with(&mut self, clock: &impl Clock) -> TickReport {
        self.tick(clock.now_ms())
    }

    /// Process one tick at time `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        let _span = tracing::info_span!("playback_tick", now_ms).entered();
        self.stats.ticks += 1;

        match self.status {
            PlaybackStatus::Idle | PlaybackStatus::Paused => {
                return TickReport::idle(TickOutcome::Inactive);
            }
            PlaybackStatus::Finished => {
                return TickReport::idle(
                    self.outcome()
                        .map_or(TickOutcome::Inactive, TickOutcome::Finished),
                );
            }
            PlaybackStatus::Playing => {}
        }
        let Some(state) = self.state.as_mut() else {
            self.status = PlaybackStatus::Idle;
            return TickReport::idle(TickOutcome::Inactive);
        };

        let budget = match self.speed.cadence() {
            Cadence::Batch { steps_per_tick } => steps_per_tick,
            Cadence::Delay { min_elapsed_ms } => {
                let elapsed = self
                    .last_executed_ms
                    .map(|last| now_ms.saturating_sub(last));
                match elapsed {
                    Some(elapsed) if elapsed < min_elapsed_ms => {
                        tracing::trace!(elapsed, min_elapsed_ms, "throttled");
                        return TickReport::idle(TickOutcome::Throttled {
                            remaining_ms: min_elapsed_ms - elapsed,
                        });
                    }
                    _ => 1,
                }
            }
        };

        let mut steps = 0;
        let mut finished = None;
        while steps < budget {
            steps += 1;
            if let StepResult::Terminated { .. } = state.step() {
                finished = state.outcome();
                break;
            }
        }

        self.last_executed_ms = Some(now_ms);
        self.stats.executed_ticks += 1;
        self.stats.steps += u64::from(steps);
        tracing::debug!(steps, throws = state.throws(), "tick executed");

        match finished {
            Some(outcome) => {
                self.status = PlaybackStatus::Finished;
                TickReport {
                    steps,
                    outcome: TickOutcome::Finished(outcome),
                }
            }
            None => TickReport {
                steps,
                outcome: TickOutcome::Advanced,
            },
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Speed::default())
    }
}
