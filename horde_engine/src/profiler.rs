//! Frame profiling hooks
//!
//! The World times each of its five phases and reports the durations to the
//! `FrameProfiler` it was built with. `NoOpProfiler` discards them;
//! `PhaseTimings` keeps the last frame and running totals.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Phases of `World::advance`, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePhase {
    Spawn,
    Update,
    Kill,
    Rebuild,
    Collide,
}

impl FramePhase {
    pub const COUNT: usize = 5;

    pub const ALL: [FramePhase; Self::COUNT] = [
        FramePhase::Spawn,
        FramePhase::Update,
        FramePhase::Kill,
        FramePhase::Rebuild,
        FramePhase::Collide,
    ];

    pub fn index(self) -> usize {
        match self {
            FramePhase::Spawn => 0,
            FramePhase::Update => 1,
            FramePhase::Kill => 2,
            FramePhase::Rebuild => 3,
            FramePhase::Collide => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FramePhase::Spawn => "spawn",
            FramePhase::Update => "update",
            FramePhase::Kill => "kill",
            FramePhase::Rebuild => "rebuild",
            FramePhase::Collide => "collide",
        }
    }
}

/// Receiver of per-phase timings.
pub trait FrameProfiler {
    fn record(&mut self, phase: FramePhase, elapsed: Duration);

    /// Called once after the last phase of frame `frame`.
    fn end_frame(&mut self, _frame: u64) {}
}

/// Profiler that drops everything.
pub struct NoOpProfiler;

impl FrameProfiler for NoOpProfiler {
    fn record(&mut self, _phase: FramePhase, _elapsed: Duration) {}
}

/// Keeps the last completed frame's timings and accumulated totals.
#[derive(Debug, Clone, Default)]
pub struct PhaseTimings {
    current: [Duration; FramePhase::COUNT],
    last: [Duration; FramePhase::COUNT],
    total: [Duration; FramePhase::COUNT],
    frames: u64,
}

impl PhaseTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duration of `phase` in the last completed frame.
    pub fn last(&self, phase: FramePhase) -> Duration {
        self.last[phase.index()]
    }

    pub fn total(&self, phase: FramePhase) -> Duration {
        self.total[phase.index()]
    }

    /// Mean duration of `phase` over completed frames (zero before the first).
    pub fn average(&self, phase: FramePhase) -> Duration {
        if self.frames == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total(phase).as_nanos() / self.frames as u128;
        Duration::from_nanos(nanos.min(u64::MAX as u128) as u64)
    }

    /// Sum of all phases in the last completed frame.
    pub fn last_frame_total(&self) -> Duration {
        self.last.iter().sum()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl FrameProfiler for PhaseTimings {
    fn record(&mut self, phase: FramePhase, elapsed: Duration) {
        self.current[phase.index()] += elapsed;
    }

    fn end_frame(&mut self, _frame: u64) {
        for phase in FramePhase::ALL {
            let i = phase.index();
            self.total[i] += self.current[i];
        }
        self.last = std::mem::take(&mut self.current);
        self.frames += 1;
    }
}

/// Shared handle, so the caller can read timings while the World owns the profiler.
impl<P: FrameProfiler> FrameProfiler for Rc<RefCell<P>> {
    fn record(&mut self, phase: FramePhase, elapsed: Duration) {
        self.borrow_mut().record(phase, elapsed);
    }

    fn end_frame(&mut self, frame: u64) {
        self.borrow_mut().end_frame(frame);
    }
}

#[cfg(test)]
#[path = "profiler_tests.rs"]
mod tests;
