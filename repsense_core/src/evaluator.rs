//! Per-exercise evaluator state.
//!
//! One [`EvaluatorState`] exists per running session. It is built fresh on
//! every session start, so nothing one exercise counts can leak into another.

use crate::jumping_jack::JumpingJackEvaluator;
use crate::plank::PlankEvaluator;
use crate::pushup::PushUpEvaluator;
use crate::squat::SquatEvaluator;
use crate::{Config, ExerciseId, LandmarkFrame, Metric};
use std::fmt::Debug;
use std::time::Duration;

/// Evaluator for the active exercise, selected by [`ExerciseId`]
#[derive(Clone, Debug)]
pub enum EvaluatorState {
    PushUps(PushUpEvaluator),
    Squats(SquatEvaluator),
    JumpingJacks(JumpingJackEvaluator),
    Plank(PlankEvaluator),
}

impl EvaluatorState {
    /// Fresh state for `exercise` using the configured thresholds
    pub fn new(exercise: ExerciseId, config: &Config) -> Self {
        match exercise {
            ExerciseId::PushUps => Self::PushUps(PushUpEvaluator::new(config.pushup.clone())),
            ExerciseId::Squats => Self::Squats(SquatEvaluator::new(config.squat.clone())),
            ExerciseId::JumpingJacks => {
                Self::JumpingJacks(JumpingJackEvaluator::new(config.jumping_jack.clone()))
            }
            ExerciseId::Plank => Self::Plank(PlankEvaluator::new(config.plank.clone())),
        }
    }

    pub fn exercise(&self) -> ExerciseId {
        match self {
            Self::PushUps(_) => ExerciseId::PushUps,
            Self::Squats(_) => ExerciseId::Squats,
            Self::JumpingJacks(_) => ExerciseId::JumpingJacks,
            Self::Plank(_) => ExerciseId::Plank,
        }
    }

    /// Feed one frame and get the updated metric, with per-frame extras
    pub fn evaluate(&mut self, frame: &LandmarkFrame) -> Metric {
        match self {
            Self::PushUps(e) => e.evaluate(frame),
            Self::Squats(e) => e.evaluate(frame),
            Self::JumpingJacks(e) => e.evaluate(frame),
            Self::Plank(e) => e.evaluate(frame),
        }
    }

    /// Current metric without consuming a frame (no extras)
    pub fn snapshot(&self) -> Metric {
        match self {
            Self::PushUps(e) => Metric::new(ExerciseId::PushUps, e.reps()),
            Self::Squats(e) => Metric::new(ExerciseId::Squats, e.reps()),
            Self::JumpingJacks(e) => Metric::new(ExerciseId::JumpingJacks, e.reps()),
            Self::Plank(e) => Metric::new(ExerciseId::Plank, e.best_hold_secs()),
        }
    }
}

/// Two-phase cycle with a debounce window between phase changes.
///
/// A rep is counted only on the return edge, via [`RepCycle::complete`].
#[derive(Clone, Debug)]
pub struct RepCycle<P> {
    phase: P,
    last_transition: Option<Duration>,
    reps: u32,
    debounce: Duration,
}

impl<P: Copy + PartialEq + Debug> RepCycle<P> {
    pub fn new(start: P, debounce: Duration) -> Self {
        Self {
            phase: start,
            last_transition: None,
            reps: 0,
            debounce,
        }
    }

    pub fn phase(&self) -> P {
        self.phase
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    fn settled(&self, now: Duration) -> bool {
        self.last_transition
            .map_or(true, |last| now.saturating_sub(last) >= self.debounce)
    }

    /// Move to `next` if the debounce window has elapsed.
    ///
    /// Returns whether the phase changed.
    pub fn advance(&mut self, next: P, now: Duration) -> bool {
        if self.phase == next || !self.settled(now) {
            return false;
        }
        self.phase = next;
        self.last_transition = Some(now);
        true
    }

    /// Return to `start`, counting one rep if the transition happened
    pub fn complete(&mut self, start: P, now: Duration) -> bool {
        let moved = self.advance(start, now);
        if moved {
            self.reps += 1;
        }
        moved
    }
}
