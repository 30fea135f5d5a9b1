//! Frame dispatcher and session control surface.
//!
//! The dispatcher is the single writer of evaluator and overlay state. Each
//! detection is routed to the framing advisor and then to the evaluator of
//! the active exercise; results leave through latest-value slots so a slow
//! consumer never holds up the loop.

use crate::catalog::{self, ExerciseInfo};
use crate::evaluator::EvaluatorState;
use crate::framing::FramingAdvisor;
use crate::latest::{self, Publisher, Subscriber};
use crate::{Config, Detection, Error, ExerciseId, Metric, Orientation, OverlayState, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Clears the dispatcher's liveness flag from anywhere (external teardown).
///
/// After `stop` no further frame reaches an evaluator or the advisor, and
/// nothing is emitted. The host can still call [`Dispatcher::stop`] for the
/// final snapshot.
#[derive(Clone, Debug)]
pub struct StopHandle {
    live: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
struct ActiveSession {
    info: &'static ExerciseInfo,
    evaluator: EvaluatorState,
    /// Timestamp of the first frame, for the time limit
    first_frame: Option<Duration>,
}

#[derive(Debug)]
pub struct Dispatcher {
    config: Config,
    advisor: FramingAdvisor,
    session: Option<ActiveSession>,
    live: Arc<AtomicBool>,
    frames_evaluated: u64,
    metrics: Publisher<Metric>,
    overlays: Publisher<OverlayState>,
}

impl Dispatcher {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let (metrics, _) = latest::channel();
        let (overlays, _) = latest::channel();
        Ok(Self {
            advisor: FramingAdvisor::new(config.framing.clone()),
            config,
            session: None,
            live: Arc::new(AtomicBool::new(false)),
            frames_evaluated: 0,
            metrics,
            overlays,
        })
    }

    /// Reader for metric snapshots
    pub fn metrics(&self) -> Subscriber<Metric> {
        self.metrics.subscribe()
    }

    /// Reader for overlay snapshots
    pub fn overlays(&self) -> Subscriber<OverlayState> {
        self.overlays.subscribe()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            live: Arc::clone(&self.live),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    pub fn active_exercise(&self) -> Option<ExerciseId> {
        self.session.as_ref().map(|s| s.info.id)
    }

    /// Frames evaluated since the last start or reset
    pub fn frames_evaluated(&self) -> u64 {
        self.frames_evaluated
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.advisor.set_orientation(orientation);
    }

    /// Start (or restart) a session for the exercise named by `selector`.
    ///
    /// Unknown selectors fail before any session state is touched.
    pub fn start(&mut self, selector: &str) -> Result<()> {
        let info = catalog::lookup(selector)?;
        self.begin(info);
        Ok(())
    }

    pub fn start_exercise(&mut self, exercise: ExerciseId) -> Result<()> {
        let info = catalog::get_default_catalog()
            .get(exercise)
            .ok_or_else(|| Error::Config(format!("Exercise '{}' is not in the catalog", exercise)))?;
        self.begin(info);
        Ok(())
    }

    fn begin(&mut self, info: &'static ExerciseInfo) {
        self.session = Some(ActiveSession {
            info,
            evaluator: EvaluatorState::new(info.id, &self.config),
            first_frame: None,
        });
        self.frames_evaluated = 0;
        self.advisor.reset();
        self.metrics.clear();
        self.overlays.clear();
        self.live.store(true, Ordering::Release);
        tracing::info!(exercise = %info.id, "session started");
    }

    /// Halt dispatch and emit the final metric for the session.
    ///
    /// Returns `None` when no session was running.
    pub fn stop(&mut self) -> Option<Metric> {
        self.live.store(false, Ordering::Release);
        let session = self.session.take()?;
        let metric = session.evaluator.snapshot();
        self.metrics.publish(metric.clone());
        tracing::info!(
            exercise = %metric.exercise_id,
            value = metric.value,
            frames = self.frames_evaluated,
            "session stopped"
        );
        Some(metric)
    }

    /// Clear counters for the active exercise and keep running
    pub fn reset(&mut self) {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("reset without an active session ignored");
            return;
        };
        session.evaluator = EvaluatorState::new(session.info.id, &self.config);
        session.first_frame = None;
        self.frames_evaluated = 0;
        self.advisor.reset();
        self.metrics.publish(session.evaluator.snapshot());
        tracing::info!(exercise = %session.info.id, "session reset");
    }

    fn time_limit_reached(&mut self, now: Duration) -> bool {
        let enforce = self.config.session.enforce_time_limit;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let started = *session.first_frame.get_or_insert(now);
        enforce && now.saturating_sub(started) >= session.info.time_limit
    }

    /// Route one detection through the advisor and the active evaluator.
    ///
    /// Returns the metric emitted for this frame. Detections without a
    /// subject, and anything arriving while not live, are ignored.
    pub fn dispatch(&mut self, detection: &Detection) -> Option<Metric> {
        if !self.is_live() {
            tracing::trace!("detection after stop ignored");
            return None;
        }
        let Detection::Subject(frame) = detection else {
            return None;
        };

        if self.time_limit_reached(frame.timestamp()) {
            tracing::info!("session time limit reached");
            return self.stop();
        }

        let session = self.session.as_mut()?;
        let exercise = session.info.id;

        if let Some(overlay) = self.advisor.update(frame, exercise) {
            self.overlays.publish(overlay);
        }

        let metric = session.evaluator.evaluate(frame);
        self.frames_evaluated += 1;
        self.metrics.publish(metric.clone());
        Some(metric)
    }
}
