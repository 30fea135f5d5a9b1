//! Jumping-jack rep counter.
//!
//! Feet separation is judged against a smoothed shoulder-width baseline, so
//! the count does not depend on how far the subject stands from the camera.
//! Hands count as up when both wrists are above the head reference.

use crate::config::JumpingJackConfig;
use crate::evaluator::RepCycle;
use crate::geometry::distance;
use crate::landmark::{
    HEAD, LEFT_ANKLE, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ANKLE, RIGHT_SHOULDER, RIGHT_WRIST,
};
use crate::{ExerciseId, LandmarkFrame, Metric};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JackPhase {
    Closed,
    Open,
}

#[derive(Clone, Debug)]
pub struct JumpingJackEvaluator {
    config: JumpingJackConfig,
    cycle: RepCycle<JackPhase>,
    baseline: Option<f64>,
}

impl JumpingJackEvaluator {
    pub fn new(config: JumpingJackConfig) -> Self {
        let cycle = RepCycle::new(JackPhase::Closed, config.debounce());
        Self {
            config,
            cycle,
            baseline: None,
        }
    }

    pub fn reps(&self) -> u32 {
        self.cycle.reps()
    }

    pub fn phase(&self) -> JackPhase {
        self.cycle.phase()
    }

    /// Smoothed shoulder width, once both shoulders have been seen
    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    fn update_baseline(&mut self, width: f64) {
        let keep = self.config.baseline_smoothing;
        self.baseline = Some(match self.baseline {
            Some(prev) => keep * prev + (1.0 - keep) * width,
            None => width,
        });
    }

    pub fn evaluate(&mut self, frame: &LandmarkFrame) -> Metric {
        let shoulder_width = distance(frame.get(LEFT_SHOULDER), frame.get(RIGHT_SHOULDER));
        if shoulder_width > 0.0 {
            self.update_baseline(shoulder_width);
        }

        let left_ankle = frame.get(LEFT_ANKLE);
        let right_ankle = frame.get(RIGHT_ANKLE);
        let left_wrist = frame.get(LEFT_WRIST);
        let right_wrist = frame.get(RIGHT_WRIST);
        let head = frame.first_present(&HEAD);

        let feet_apart = match self.baseline {
            Some(base) if base > 0.0 => {
                distance(left_ankle, right_ankle) >= self.config.feet_apart_ratio * base
            }
            _ => false,
        };

        let hands_up = match (head, left_wrist, right_wrist) {
            (Some(head), Some(l), Some(r)) => {
                let line = head.y - self.config.hands_margin;
                l.y < line && r.y < line
            }
            _ => false,
        };

        let tracked = self.baseline.is_some()
            && [left_ankle, right_ankle, left_wrist, right_wrist, head]
                .iter()
                .all(Option::is_some);
        let now = frame.timestamp();

        if tracked {
            match self.cycle.phase() {
                JackPhase::Closed if feet_apart && hands_up => {
                    self.cycle.advance(JackPhase::Open, now);
                }
                JackPhase::Open if !feet_apart && !hands_up => {
                    if self.cycle.complete(JackPhase::Closed, now) {
                        tracing::debug!(reps = self.cycle.reps(), "jumping jack counted");
                    }
                }
                _ => {}
            }
        }

        Metric::new(ExerciseId::JumpingJacks, self.cycle.reps())
            .with_extra("feet_apart", feet_apart)
            .with_extra("hands_up", hands_up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::testutil::frame;
    use crate::landmark::NOSE;
    use crate::Point;

    const SHOULDER_W: f64 = 0.2;

    /// Standing subject; `open` spreads feet to 2x shoulder width and raises
    /// both hands above the head.
    fn jack(t_ms: u64, open: bool) -> LandmarkFrame {
        let (feet_half, wrist_y) = if open { (0.2, 0.1) } else { (0.05, 0.55) };
        frame(
            t_ms,
            &[
                (NOSE, Point::new(0.5, 0.2)),
                (LEFT_SHOULDER, Point::new(0.5 + SHOULDER_W / 2.0, 0.3)),
                (RIGHT_SHOULDER, Point::new(0.5 - SHOULDER_W / 2.0, 0.3)),
                (LEFT_WRIST, Point::new(0.65, wrist_y)),
                (RIGHT_WRIST, Point::new(0.35, wrist_y)),
                (LEFT_ANKLE, Point::new(0.5 + feet_half, 0.9)),
                (RIGHT_ANKLE, Point::new(0.5 - feet_half, 0.9)),
            ],
        )
    }

    #[test]
    fn test_open_close_cycle_counts() {
        let mut e = JumpingJackEvaluator::new(JumpingJackConfig::default());
        e.evaluate(&jack(0, false));
        e.evaluate(&jack(250, true));
        assert_eq!(e.phase(), JackPhase::Open);

        let metric = e.evaluate(&jack(500, false));
        assert_eq!(metric.value, 1);
        assert_eq!(metric.extras["feet_apart"], false);
        assert_eq!(metric.extras["hands_up"], false);
    }

    #[test]
    fn test_feet_only_is_not_open() {
        let mut e = JumpingJackEvaluator::new(JumpingJackConfig::default());
        let feet_wide_hands_down = [
            (NOSE, Point::new(0.5, 0.2)),
            (LEFT_SHOULDER, Point::new(0.6, 0.3)),
            (RIGHT_SHOULDER, Point::new(0.4, 0.3)),
            (LEFT_WRIST, Point::new(0.65, 0.55)),
            (RIGHT_WRIST, Point::new(0.35, 0.55)),
            (LEFT_ANKLE, Point::new(0.7, 0.9)),
            (RIGHT_ANKLE, Point::new(0.3, 0.9)),
        ];

        let metric = e.evaluate(&frame(0, &feet_wide_hands_down));
        assert_eq!(metric.extras["feet_apart"], true);
        assert_eq!(metric.extras["hands_up"], false);
        assert_eq!(e.phase(), JackPhase::Closed);
    }

    #[test]
    fn test_fast_toggle_is_debounced() {
        let mut e = JumpingJackEvaluator::new(JumpingJackConfig::default());
        e.evaluate(&jack(0, true));
        e.evaluate(&jack(100, false));
        e.evaluate(&jack(200, true));
        assert_eq!(e.reps(), 0);
        e.evaluate(&jack(300, false));
        assert_eq!(e.reps(), 1);
    }

    #[test]
    fn test_baseline_seeds_from_first_width() {
        let mut e = JumpingJackEvaluator::new(JumpingJackConfig::default());
        assert_eq!(e.baseline(), None);
        e.evaluate(&jack(0, false));
        assert!((e.baseline().unwrap() - SHOULDER_W).abs() < 1e-12);
    }

    #[test]
    fn test_baseline_converges_and_ignores_missing_shoulders() {
        let mut e = JumpingJackEvaluator::new(JumpingJackConfig::default());
        let wide = frame(
            0,
            &[
                (LEFT_SHOULDER, Point::new(0.7, 0.3)),
                (RIGHT_SHOULDER, Point::new(0.3, 0.3)),
            ],
        );
        e.evaluate(&wide);
        assert!((e.baseline().unwrap() - 0.4).abs() < 1e-12);

        for i in 1..=60 {
            e.evaluate(&jack(i * 33, false));
        }
        let converged = e.baseline().unwrap();
        assert!((converged - SHOULDER_W).abs() < 1e-3, "{}", converged);

        e.evaluate(&frame(5000, &[(NOSE, Point::new(0.5, 0.2))]));
        assert_eq!(e.baseline(), Some(converged));
    }

    #[test]
    fn test_missing_head_keeps_phase() {
        let mut e = JumpingJackEvaluator::new(JumpingJackConfig::default());
        e.evaluate(&jack(0, true));
        assert_eq!(e.phase(), JackPhase::Open);

        let closed_no_head = [
            (LEFT_SHOULDER, Point::new(0.6, 0.3)),
            (RIGHT_SHOULDER, Point::new(0.4, 0.3)),
            (LEFT_WRIST, Point::new(0.65, 0.55)),
            (RIGHT_WRIST, Point::new(0.35, 0.55)),
            (LEFT_ANKLE, Point::new(0.55, 0.9)),
            (RIGHT_ANKLE, Point::new(0.45, 0.9)),
        ];

        e.evaluate(&frame(500, &closed_no_head));
        assert_eq!(e.reps(), 0);
        assert_eq!(e.phase(), JackPhase::Open);
    }
}
