//! Squat rep counter, driven by the right knee angle (hip-knee-ankle).

use crate::config::SquatConfig;
use crate::evaluator::RepCycle;
use crate::geometry::angle_between;
use crate::landmark::{RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE};
use crate::{ExerciseId, LandmarkFrame, Metric};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SquatPhase {
    Top,
    Bottom,
}

#[derive(Clone, Debug)]
pub struct SquatEvaluator {
    config: SquatConfig,
    cycle: RepCycle<SquatPhase>,
}

impl SquatEvaluator {
    pub fn new(config: SquatConfig) -> Self {
        let cycle = RepCycle::new(SquatPhase::Top, config.debounce());
        Self { config, cycle }
    }

    pub fn reps(&self) -> u32 {
        self.cycle.reps()
    }

    pub fn phase(&self) -> SquatPhase {
        self.cycle.phase()
    }

    pub fn evaluate(&mut self, frame: &LandmarkFrame) -> Metric {
        let hip = frame.get(RIGHT_HIP);
        let knee = frame.get(RIGHT_KNEE);
        let ankle = frame.get(RIGHT_ANKLE);
        let knee_angle = angle_between(hip, knee, ankle);
        let now = frame.timestamp();

        if hip.is_some() && knee.is_some() && ankle.is_some() {
            match self.cycle.phase() {
                SquatPhase::Top if knee_angle < self.config.knee_down_deg => {
                    self.cycle.advance(SquatPhase::Bottom, now);
                }
                SquatPhase::Bottom if knee_angle > self.config.knee_up_deg => {
                    if self.cycle.complete(SquatPhase::Top, now) {
                        tracing::debug!(reps = self.cycle.reps(), "squat counted");
                    }
                }
                _ => {}
            }
        }

        Metric::new(ExerciseId::Squats, self.cycle.reps()).with_extra("knee_angle", knee_angle)
    }
}
