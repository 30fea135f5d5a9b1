//! Core domain types for the repsense system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Normalized points and the 33-point landmark convention
//! - Landmark frames and detections delivered by a pose source
//! - Exercise identifiers and metric snapshots
//! - Framing overlay state
//! - Session reports

use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

// ============================================================================
// Landmarks
// ============================================================================

/// Indices into the 33-point body skeleton produced by the pose source.
pub mod landmark {
    /// Number of landmarks in every frame
    pub const COUNT: usize = 33;

    pub const NOSE: usize = 0;
    pub const LEFT_EAR: usize = 7;
    pub const RIGHT_EAR: usize = 8;
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
    pub const LEFT_KNEE: usize = 25;
    pub const RIGHT_KNEE: usize = 26;
    pub const LEFT_ANKLE: usize = 27;
    pub const RIGHT_ANKLE: usize = 28;

    /// Head reference in order of preference
    pub const HEAD: [usize; 3] = [NOSE, LEFT_EAR, RIGHT_EAR];
    pub const SHOULDER: [usize; 2] = [RIGHT_SHOULDER, LEFT_SHOULDER];
    pub const HIP: [usize; 2] = [RIGHT_HIP, LEFT_HIP];
    pub const KNEE: [usize; 2] = [RIGHT_KNEE, LEFT_KNEE];
    pub const ANKLE: [usize; 2] = [RIGHT_ANKLE, LEFT_ANKLE];
}

/// A 2-D position in normalized image space (origin top-left, y grows down)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One detection cycle's worth of landmarks.
///
/// Immutable once built: the pose source produces it and the dispatcher only
/// borrows it for a single dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    timestamp: Duration,
    points: [Option<Point>; landmark::COUNT],
}

impl LandmarkFrame {
    /// Build a frame from points in landmark order.
    ///
    /// Missing trailing points are absent; anything past index 32 is dropped.
    pub fn new(timestamp: Duration, points: impl IntoIterator<Item = Option<Point>>) -> Self {
        let mut slots = [None; landmark::COUNT];
        for (slot, point) in slots.iter_mut().zip(points) {
            *slot = point;
        }
        Self {
            timestamp,
            points: slots,
        }
    }

    /// Monotonic capture time, relative to the pose source's own epoch
    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied().flatten()
    }

    /// First present landmark among `indices`, in the order given
    pub fn first_present(&self, indices: &[usize]) -> Option<Point> {
        indices.iter().find_map(|&index| self.get(index))
    }

    /// Iterate over every present landmark
    pub fn present(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.points.iter().all(Option::is_none)
    }
}

/// What the pose source reports for one detection cycle
#[derive(Clone, Debug, PartialEq)]
pub enum Detection {
    Subject(LandmarkFrame),
    NoSubject { timestamp: Duration },
}

impl Detection {
    pub fn timestamp(&self) -> Duration {
        match self {
            Detection::Subject(frame) => frame.timestamp(),
            Detection::NoSubject { timestamp } => *timestamp,
        }
    }
}

// ============================================================================
// Exercises and Metrics
// ============================================================================

/// Exercise selector for a session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExerciseId {
    #[serde(rename = "pushups")]
    PushUps,
    #[serde(rename = "squats")]
    Squats,
    #[serde(rename = "jumpingjacks")]
    JumpingJacks,
    #[serde(rename = "plank")]
    Plank,
}

impl ExerciseId {
    pub const ALL: [ExerciseId; 4] = [
        ExerciseId::PushUps,
        ExerciseId::Squats,
        ExerciseId::JumpingJacks,
        ExerciseId::Plank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseId::PushUps => "pushups",
            ExerciseId::Squats => "squats",
            ExerciseId::JumpingJacks => "jumpingjacks",
            ExerciseId::Plank => "plank",
        }
    }

    /// Unit the exercise is measured in
    pub fn unit(&self) -> MetricUnit {
        match self {
            ExerciseId::Plank => MetricUnit::Seconds,
            _ => MetricUnit::Reps,
        }
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pushups" | "pushup" | "push-ups" | "push_ups" => Ok(ExerciseId::PushUps),
            "squats" | "squat" => Ok(ExerciseId::Squats),
            "jumpingjacks" | "jumping_jacks" | "jumping-jacks" | "jacks" => {
                Ok(ExerciseId::JumpingJacks)
            }
            "plank" => Ok(ExerciseId::Plank),
            other => Err(Error::Config(format!("Unknown exercise: {:?}", other))),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    Reps,
    Seconds,
}

/// Latest performance snapshot for the active exercise.
///
/// A snapshot, not a delta: each one fully replaces the previous.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Metric {
    pub exercise_id: ExerciseId,
    pub value: u32,
    pub unit: MetricUnit,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, serde_json::Value>,
}

impl Metric {
    pub fn new(exercise_id: ExerciseId, value: u32) -> Self {
        Self {
            exercise_id,
            value,
            unit: exercise_id.unit(),
            extras: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.extras.insert(key.to_string(), value.into());
        self
    }
}

// ============================================================================
// Overlay Types
// ============================================================================

/// How well the subject fits the expected on-screen region
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrameQuality {
    Good,
    Ok,
    #[default]
    Bad,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DistanceHint {
    #[serde(rename = "Step closer")]
    StepCloser,
    #[serde(rename = "Step back")]
    StepBack,
}

impl fmt::Display for DistanceHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DistanceHint::StepCloser => "Step closer",
            DistanceHint::StepBack => "Step back",
        })
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PostureHint {
    #[serde(rename = "Go lower")]
    GoLower,
    #[serde(rename = "Rise up")]
    RiseUp,
    #[serde(rename = "Good")]
    Good,
}

impl fmt::Display for PostureHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostureHint::GoLower => "Go lower",
            PostureHint::RiseUp => "Rise up",
            PostureHint::Good => "Good",
        })
    }
}

/// Camera preview orientation, which selects the framing region
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Advisory framing/coaching overlay for the operator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct OverlayState {
    pub frame_quality: FrameQuality,
    pub horizon_y: Option<f64>,
    pub distance_hint: Option<DistanceHint>,
    pub posture_hint: Option<PostureHint>,
}

// ============================================================================
// Session Report
// ============================================================================

/// Summary of a finished session, built by the host once the loop ends
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub exercise: ExerciseId,
    pub title: String,
    pub metric: Metric,
    pub frames_evaluated: u64,
    pub source_failures: u64,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_pads_and_truncates() {
        let short = LandmarkFrame::new(Duration::ZERO, vec![Some(Point::new(0.1, 0.2))]);
        assert_eq!(short.get(0), Some(Point::new(0.1, 0.2)));
        assert_eq!(short.get(32), None);
        assert_eq!(short.present().count(), 1);

        let long = LandmarkFrame::new(Duration::ZERO, vec![Some(Point::new(0.5, 0.5)); 40]);
        assert_eq!(long.present().count(), landmark::COUNT);
        assert_eq!(long.get(35), None);
    }

    #[test]
    fn test_first_present_respects_order() {
        let mut points = vec![None; landmark::COUNT];
        points[landmark::LEFT_HIP] = Some(Point::new(0.4, 0.6));
        let frame = LandmarkFrame::new(Duration::ZERO, points);

        assert_eq!(frame.first_present(&landmark::HIP), Some(Point::new(0.4, 0.6)));
        assert_eq!(frame.first_present(&landmark::KNEE), None);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_exercise_id_parsing() {
        assert_eq!("pushups".parse::<ExerciseId>().unwrap(), ExerciseId::PushUps);
        assert_eq!("Squat".parse::<ExerciseId>().unwrap(), ExerciseId::Squats);
        assert_eq!(
            "jumping-jacks".parse::<ExerciseId>().unwrap(),
            ExerciseId::JumpingJacks
        );
        assert!(matches!(
            "sprint100m".parse::<ExerciseId>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_metric_serialization() {
        let metric = Metric::new(ExerciseId::Plank, 12).with_extra("good_form", true);
        let json = serde_json::to_value(&metric).unwrap();

        assert_eq!(json["exercise_id"], "plank");
        assert_eq!(json["unit"], "seconds");
        assert_eq!(json["value"], 12);
        assert_eq!(json["extras"]["good_form"], true);

        let bare = serde_json::to_value(Metric::new(ExerciseId::Squats, 3)).unwrap();
        assert_eq!(bare["unit"], "reps");
        assert!(bare.get("extras").is_none());
    }

    #[test]
    fn test_overlay_hints_serialize_as_text() {
        let overlay = OverlayState {
            frame_quality: FrameQuality::Ok,
            horizon_y: Some(0.55),
            distance_hint: Some(DistanceHint::StepBack),
            posture_hint: Some(PostureHint::GoLower),
        };
        let json = serde_json::to_value(&overlay).unwrap();

        assert_eq!(json["frame_quality"], "ok");
        assert_eq!(json["distance_hint"], "Step back");
        assert_eq!(json["posture_hint"], "Go lower");
        assert_eq!(OverlayState::default().frame_quality, FrameQuality::Bad);
    }
}
