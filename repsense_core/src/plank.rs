//! Plank hold timer.
//!
//! Form is good when the shoulder-hip-ankle line is nearly straight and the
//! hip sits on the shoulder-ankle midline. Good form has to last through the
//! gate before the hold timer starts; any bad-form frame drops the gate and
//! the running hold at once. A frame missing the shoulder, hip or ankle on
//! both sides counts as bad form. The reported value is the longest continuous
//! hold so far, never the sum of holds.

use crate::config::PlankConfig;
use crate::geometry::angle_between;
use crate::landmark::{ANKLE, HIP, SHOULDER};
use crate::{ExerciseId, LandmarkFrame, Metric};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlankPhase {
    Resting,
    /// Good form seen since `since`, hold timer not running yet
    Gated { since: Duration },
    Holding { since: Duration },
}

#[derive(Clone, Debug)]
pub struct PlankEvaluator {
    config: PlankConfig,
    phase: PlankPhase,
    best: Duration,
}

impl PlankEvaluator {
    pub fn new(config: PlankConfig) -> Self {
        Self {
            config,
            phase: PlankPhase::Resting,
            best: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> PlankPhase {
        self.phase
    }

    /// Longest continuous hold observed this session
    pub fn best_hold(&self) -> Duration {
        self.best
    }

    /// Longest hold in whole seconds
    pub fn best_hold_secs(&self) -> u32 {
        u32::try_from(self.best.as_secs()).unwrap_or(u32::MAX)
    }

    /// `None` when a landmark needed to judge form is missing
    fn judge_form(&self, frame: &LandmarkFrame) -> Option<bool> {
        let shoulder = frame.first_present(&SHOULDER)?;
        let hip = frame.first_present(&HIP)?;
        let ankle = frame.first_present(&ANKLE)?;

        let line = angle_between(Some(shoulder), Some(hip), Some(ankle));
        let midline_y = (shoulder.y + ankle.y) / 2.0;
        let hip_centered = (hip.y - midline_y).abs() <= self.config.hip_tolerance;

        Some(
            (self.config.line_min_deg..=self.config.line_max_deg).contains(&line)
                && hip_centered,
        )
    }

    fn hold(&mut self, now: Duration) {
        if self.phase == PlankPhase::Resting {
            self.phase = PlankPhase::Gated { since: now };
        }
        if let PlankPhase::Gated { since } = self.phase {
            if now.saturating_sub(since) >= self.config.gate() {
                tracing::debug!("plank hold started");
                self.phase = PlankPhase::Holding { since: now };
            }
        }
        if let PlankPhase::Holding { since } = self.phase {
            self.best = self.best.max(now.saturating_sub(since));
        }
    }

    fn break_form(&mut self) {
        if matches!(self.phase, PlankPhase::Holding { .. }) {
            tracing::debug!(best_ms = self.best.as_millis() as u64, "plank form broken");
        }
        self.phase = PlankPhase::Resting;
    }

    pub fn evaluate(&mut self, frame: &LandmarkFrame) -> Metric {
        // Form that cannot be judged is not good form
        let good_form = self.judge_form(frame).unwrap_or(false);
        if good_form {
            self.hold(frame.timestamp());
        } else {
            self.break_form();
        }

        Metric::new(ExerciseId::Plank, self.best_hold_secs()).with_extra("good_form", good_form)
    }
}
