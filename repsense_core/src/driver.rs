//! Cooperative frame loop.
//!
//! Each tick requests one detection from the source, dispatches it
//! synchronously, and hands control back to the host. No two frames are ever
//! in flight at once. Any host scheduler that can call [`FrameLoop::tick`]
//! when a frame is ready can drive the core; [`FrameLoop::run`] is the plain
//! blocking version.

use crate::dispatcher::Dispatcher;
use crate::source::PoseSource;
use crate::Metric;

/// Outcome of a single loop iteration
#[derive(Clone, Debug, PartialEq)]
pub enum Tick {
    /// A detection was dispatched; carries the metric it produced, if any
    Dispatched(Option<Metric>),
    /// The detection call failed; the next tick tries again
    SourceFailed,
    /// The source has no more detections
    Exhausted,
    /// The dispatcher is not live; nothing was pulled
    Halted,
}

impl Tick {
    /// Whether another tick should be scheduled
    pub fn should_continue(&self) -> bool {
        matches!(self, Tick::Dispatched(_) | Tick::SourceFailed)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub detections: u64,
    pub source_failures: u64,
}

#[derive(Debug, Default)]
pub struct FrameLoop {
    stats: LoopStats,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn tick<S: PoseSource + ?Sized>(
        &mut self,
        source: &mut S,
        dispatcher: &mut Dispatcher,
    ) -> Tick {
        if !dispatcher.is_live() {
            return Tick::Halted;
        }

        match source.next_detection() {
            Ok(Some(detection)) => {
                self.stats.detections += 1;
                Tick::Dispatched(dispatcher.dispatch(&detection))
            }
            Ok(None) => {
                tracing::debug!("pose source exhausted");
                Tick::Exhausted
            }
            Err(e) => {
                self.stats.source_failures += 1;
                tracing::warn!("pose detection failed: {}", e);
                Tick::SourceFailed
            }
        }
    }

    /// Tick until the source ends or the dispatcher stops
    pub fn run<S: PoseSource + ?Sized>(
        &mut self,
        source: &mut S,
        dispatcher: &mut Dispatcher,
    ) -> LoopStats {
        self.run_with(source, dispatcher, |_| {})
    }

    /// Like [`FrameLoop::run`], calling `on_tick` after every iteration
    pub fn run_with<S, F>(
        &mut self,
        source: &mut S,
        dispatcher: &mut Dispatcher,
        mut on_tick: F,
    ) -> LoopStats
    where
        S: PoseSource + ?Sized,
        F: FnMut(&Tick),
    {
        loop {
            let tick = self.tick(source, dispatcher);
            on_tick(&tick);
            if !tick.should_continue() {
                break;
            }
        }
        self.stats
    }
}
