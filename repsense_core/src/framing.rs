//! Framing advisor: camera-framing quality and coaching hints.
//!
//! Runs on its own cadence (at most once per throttle interval of frame
//! time) regardless of how fast detections arrive. Apart from the throttle
//! timestamp it keeps no state between calls.

use crate::config::FramingConfig;
use crate::geometry::{angle_between, distance};
use crate::landmark::{ANKLE, HIP, KNEE, LEFT_HIP, LEFT_SHOULDER, RIGHT_HIP, RIGHT_SHOULDER};
use crate::types::{
    DistanceHint, ExerciseId, FrameQuality, LandmarkFrame, Orientation, OverlayState, Point,
    PostureHint,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Region of interest in normalized coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Roi {
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Same region grown by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        Self::new(
            self.left - margin,
            self.right + margin,
            self.top - margin,
            self.bottom + margin,
        )
    }

    pub fn contains(&self, bbox: &BoundingBox) -> bool {
        bbox.min_x >= self.left
            && bbox.max_x <= self.right
            && bbox.min_y >= self.top
            && bbox.max_y <= self.bottom
    }
}

/// Axis-aligned box around a set of landmarks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// `None` for an empty point set
    pub fn around(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => BoundingBox {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(b) => BoundingBox {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }
}

/// `good` inside the region, `ok` inside the margin-expanded region, else `bad`
pub fn classify(bbox: &BoundingBox, roi: &Roi, margin: f64) -> FrameQuality {
    if roi.contains(bbox) {
        FrameQuality::Good
    } else if roi.expanded(margin).contains(bbox) {
        FrameQuality::Ok
    } else {
        FrameQuality::Bad
    }
}

#[derive(Clone, Debug)]
pub struct FramingAdvisor {
    config: FramingConfig,
    orientation: Orientation,
    last_computed: Option<Duration>,
}

impl FramingAdvisor {
    pub fn new(config: FramingConfig) -> Self {
        let orientation = config.orientation;
        Self {
            config,
            orientation,
            last_computed: None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Forget the throttle so the next frame recomputes immediately
    pub fn reset(&mut self) {
        self.last_computed = None;
    }

    /// Throttled overlay update; `None` when skipped or nothing is visible
    pub fn update(&mut self, frame: &LandmarkFrame, exercise: ExerciseId) -> Option<OverlayState> {
        let now = frame.timestamp();
        if let Some(last) = self.last_computed {
            if now.saturating_sub(last) < self.config.throttle() {
                return None;
            }
        }
        self.last_computed = Some(now);
        self.compute(frame, exercise)
    }

    /// Unthrottled overlay for one frame
    pub fn compute(&self, frame: &LandmarkFrame, exercise: ExerciseId) -> Option<OverlayState> {
        let bbox = BoundingBox::around(frame.present())?;
        let roi = self.config.roi(self.orientation);

        Some(OverlayState {
            frame_quality: classify(&bbox, &roi, self.config.roi_margin),
            horizon_y: horizon(frame),
            distance_hint: self.distance_hint(frame, &roi),
            posture_hint: match exercise {
                ExerciseId::Squats => self.posture_hint(frame),
                _ => None,
            },
        })
    }

    fn distance_hint(&self, frame: &LandmarkFrame, roi: &Roi) -> Option<DistanceHint> {
        let shoulder_width = distance(frame.get(LEFT_SHOULDER), frame.get(RIGHT_SHOULDER));
        if shoulder_width <= 0.0 {
            return None;
        }
        let coverage = shoulder_width / roi.width();
        if coverage > self.config.step_back_above {
            Some(DistanceHint::StepBack)
        } else if coverage < self.config.step_closer_below {
            Some(DistanceHint::StepCloser)
        } else {
            None
        }
    }

    fn posture_hint(&self, frame: &LandmarkFrame) -> Option<PostureHint> {
        let hip = frame.first_present(&HIP)?;
        let knee = frame.first_present(&KNEE)?;
        let ankle = frame.first_present(&ANKLE)?;
        let knee_angle = angle_between(Some(hip), Some(knee), Some(ankle));

        Some(if knee_angle > self.config.go_lower_above_deg {
            PostureHint::GoLower
        } else if knee_angle < self.config.rise_up_below_deg {
            PostureHint::RiseUp
        } else {
            PostureHint::Good
        })
    }
}

/// Mid-hip height, or whichever hip is visible
fn horizon(frame: &LandmarkFrame) -> Option<f64> {
    match (frame.get(LEFT_HIP), frame.get(RIGHT_HIP)) {
        (Some(l), Some(r)) => Some((l.y + r.y) / 2.0),
        (Some(hip), None) | (None, Some(hip)) => Some(hip.y),
        (None, None) => None,
    }
}
