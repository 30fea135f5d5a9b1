//! Push-up rep counter.
//!
//! Tracks the right arm (shoulder-elbow-wrist) and the torso line
//! (shoulder-hip-ankle). Going down only counts with a straight body; the rep
//! is credited when the arm locks out again.

use crate::config::PushUpConfig;
use crate::evaluator::RepCycle;
use crate::geometry::angle_between;
use crate::landmark::{RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_HIP, RIGHT_SHOULDER, RIGHT_WRIST};
use crate::{ExerciseId, LandmarkFrame, Metric};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushUpPhase {
    Top,
    Bottom,
}

#[derive(Clone, Debug)]
pub struct PushUpEvaluator {
    config: PushUpConfig,
    cycle: RepCycle<PushUpPhase>,
}

impl PushUpEvaluator {
    pub fn new(config: PushUpConfig) -> Self {
        let cycle = RepCycle::new(PushUpPhase::Top, config.debounce());
        Self { config, cycle }
    }

    pub fn reps(&self) -> u32 {
        self.cycle.reps()
    }

    pub fn phase(&self) -> PushUpPhase {
        self.cycle.phase()
    }

    pub fn evaluate(&mut self, frame: &LandmarkFrame) -> Metric {
        let shoulder = frame.get(RIGHT_SHOULDER);
        let elbow = frame.get(RIGHT_ELBOW);
        let wrist = frame.get(RIGHT_WRIST);
        let hip = frame.get(RIGHT_HIP);
        let ankle = frame.get(RIGHT_ANKLE);

        let elbow_angle = angle_between(shoulder, elbow, wrist);
        let torso_angle = angle_between(shoulder, hip, ankle);
        let good_plank =
            (self.config.torso_min_deg..=self.config.torso_max_deg).contains(&torso_angle);

        // Lockout only needs the arm; the descent also needs the torso line
        let arm_tracked = shoulder.is_some() && elbow.is_some() && wrist.is_some();
        let body_tracked = arm_tracked && hip.is_some() && ankle.is_some();
        let now = frame.timestamp();

        match self.cycle.phase() {
            PushUpPhase::Top
                if body_tracked && elbow_angle < self.config.elbow_down_deg && good_plank =>
            {
                self.cycle.advance(PushUpPhase::Bottom, now);
            }
            PushUpPhase::Bottom if arm_tracked && elbow_angle > self.config.elbow_up_deg => {
                if self.cycle.complete(PushUpPhase::Top, now) {
                    tracing::debug!(reps = self.cycle.reps(), "push-up counted");
                }
            }
            _ => {}
        }

        Metric::new(ExerciseId::PushUps, self.cycle.reps())
            .with_extra("elbow_angle", elbow_angle)
            .with_extra("good_plank", good_plank)
    }
}
