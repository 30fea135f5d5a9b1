#![forbid(unsafe_code)]

//! Core logic for the RepSense exercise tracker.
//!
//! This crate provides:
//! - Domain types (landmark frames, detections, metrics, overlays)
//! - Geometry helpers and per-exercise evaluators
//! - The framing advisor
//! - Frame dispatch, the latest-value output slots and the frame loop
//! - Pose sources (recorded JSON lines)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod geometry;
pub mod evaluator;
pub mod pushup;
pub mod squat;
pub mod jumping_jack;
pub mod plank;
pub mod framing;
pub mod latest;
pub mod dispatcher;
pub mod source;
pub mod driver;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, lookup, ExerciseInfo};
pub use config::Config;
pub use geometry::{angle_between, distance};
pub use evaluator::EvaluatorState;
pub use framing::FramingAdvisor;
pub use latest::{Publisher, Subscriber};
pub use dispatcher::{Dispatcher, StopHandle};
pub use source::{JsonlSource, PoseSource};
pub use driver::{FrameLoop, LoopStats, Tick};
