use std::collections::VecDeque;
use std::time::Duration;

use relay_kernel::Outcome;

use crate::clock::{Clock, SystemClock};
use crate::scheduler::{PlaybackStatus, Scheduler, TickReport};

/// Something that produces tick timestamps: a frame callback, a timer, or a
/// test script. `None` means the source has stopped.
pub trait TickSource {
    fn next_tick(&mut self) -> Option<u64>;
}

/// Real-time timer: sleeps for the interval, then reports the clock's time.
#[derive(Debug)]
pub struct IntervalTimer<C: Clock = SystemClock> {
    clock: C,
    interval: Duration,
}

impl IntervalTimer<SystemClock> {
    pub fn new(interval: Duration) -> Self {
        Self::with_clock(SystemClock::new(), interval)
    }
}

impl<C: Clock> IntervalTimer<C> {
    pub fn with_clock(clock: C, interval: Duration) -> Self {
        Self { clock, interval }
    }
}

impl<C: Clock> TickSource for IntervalTimer<C> {
    fn next_tick(&mut self) -> Option<u64> {
        std::thread::sleep(self.interval);
        Some(self.clock.now_ms())
    }
}

/// Simulated timer: advances virtual time by a fixed interval per tick
/// without sleeping. Playback behaves as if ticked in real time.
#[derive(Debug, Clone)]
pub struct VirtualTimer {
    now_ms: u64,
    interval_ms: u64,
}

impl VirtualTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            now_ms: 0,
            interval_ms,
        }
    }
}

impl TickSource for VirtualTimer {
    fn next_tick(&mut self) -> Option<u64> {
        let now = self.now_ms;
        self.now_ms = self.now_ms.saturating_add(self.interval_ms);
        Some(now)
    }
}

/// A fixed list of timestamps, replayed in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTicks {
    ticks: VecDeque<u64>,
}

impl ScriptedTicks {
    pub fn new(ticks: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
        }
    }
}

impl TickSource for ScriptedTicks {
    fn next_tick(&mut self) -> Option<u64> {
        self.ticks.pop_front()
    }
}

/// Tick the scheduler from `source` while it is playing.
///
/// `on_tick` sees the scheduler after every tick, throttled ones included, so
/// a renderer can redraw. Returns the outcome if the run finished, or `None`
/// if the source ran dry or playback was paused or reset from `on_tick`.
pub fn drive<S, F>(scheduler: &mut Scheduler, source: &mut S, mut on_tick: F) -> Option<Outcome>
where
    S: TickSource + ?Sized,
    F: FnMut(&mut Scheduler, &TickReport),
{
    while scheduler.status() == PlaybackStatus::Playing {
        let Some(now) = source.next_tick() else {
            tracing::debug!("tick source exhausted");
            break;
        };
        let report = scheduler.tick(now);
        on_tick(scheduler, &report);
    }
    scheduler.outcome()
}
