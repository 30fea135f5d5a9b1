//! Configuration file support for repsense.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/repsense/config.toml`.
//! Every threshold the evaluators and the framing advisor use lives here;
//! the defaults are the tuned values, and any section or field may be left
//! out of the file.

use crate::framing::Roi;
use crate::types::Orientation;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub pushup: PushUpConfig,

    #[serde(default)]
    pub squat: SquatConfig,

    #[serde(default)]
    pub jumping_jack: JumpingJackConfig,

    #[serde(default)]
    pub plank: PlankConfig,

    #[serde(default)]
    pub framing: FramingConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Push-up thresholds (right arm, shoulder-hip-ankle torso line)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PushUpConfig {
    /// Elbow angle below which the bottom position is reached
    pub elbow_down_deg: f64,
    /// Elbow angle above which the top position is reached
    pub elbow_up_deg: f64,
    pub torso_min_deg: f64,
    pub torso_max_deg: f64,
    pub debounce_ms: u64,
}

impl Default for PushUpConfig {
    fn default() -> Self {
        Self {
            elbow_down_deg: 80.0,
            elbow_up_deg: 155.0,
            torso_min_deg: 165.0,
            torso_max_deg: 195.0,
            debounce_ms: 250,
        }
    }
}

impl PushUpConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Squat thresholds (right leg, hip-knee-ankle)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SquatConfig {
    pub knee_down_deg: f64,
    pub knee_up_deg: f64,
    pub debounce_ms: u64,
}

impl Default for SquatConfig {
    fn default() -> Self {
        Self {
            knee_down_deg: 85.0,
            knee_up_deg: 165.0,
            debounce_ms: 300,
        }
    }
}

impl SquatConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Jumping-jack thresholds
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpingJackConfig {
    /// Feet count as apart at this multiple of the shoulder-width baseline
    pub feet_apart_ratio: f64,
    /// Wrists must be this far above the head reference (normalized y)
    pub hands_margin: f64,
    /// Weight of the previous baseline in the exponential smoothing
    pub baseline_smoothing: f64,
    pub debounce_ms: u64,
}

impl Default for JumpingJackConfig {
    fn default() -> Self {
        Self {
            feet_apart_ratio: 1.25,
            hands_margin: 0.02,
            baseline_smoothing: 0.9,
            debounce_ms: 220,
        }
    }
}

impl JumpingJackConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Plank form window and gate
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlankConfig {
    pub line_min_deg: f64,
    pub line_max_deg: f64,
    /// Max vertical distance of the hip from the shoulder-ankle midline
    pub hip_tolerance: f64,
    pub gate_ms: u64,
}

impl Default for PlankConfig {
    fn default() -> Self {
        Self {
            line_min_deg: 168.0,
            line_max_deg: 192.0,
            hip_tolerance: 0.045,
            gate_ms: 400,
        }
    }
}

impl PlankConfig {
    pub fn gate(&self) -> Duration {
        Duration::from_millis(self.gate_ms)
    }
}

/// Framing advisor regions, hint bounds and cadence
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    pub orientation: Orientation,
    pub throttle_ms: u64,
    /// Extra margin around the region that still classifies as `ok`
    pub roi_margin: f64,
    pub portrait_roi: Roi,
    pub landscape_roi: Roi,
    /// Shoulder width / region width below this asks the subject to step closer
    pub step_closer_below: f64,
    /// Shoulder width / region width above this asks the subject to step back
    pub step_back_above: f64,
    pub go_lower_above_deg: f64,
    pub rise_up_below_deg: f64,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            throttle_ms: 100,
            roi_margin: 0.03,
            portrait_roi: Roi::new(0.10, 0.90, 0.06, 0.94),
            landscape_roi: Roi::new(0.12, 0.88, 0.08, 0.92),
            step_closer_below: 0.16,
            step_back_above: 0.36,
            go_lower_above_deg: 130.0,
            rise_up_below_deg: 95.0,
        }
    }
}

impl FramingConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn roi(&self, orientation: Orientation) -> Roi {
        match orientation {
            Orientation::Portrait => self.portrait_roi,
            Orientation::Landscape => self.landscape_roi,
        }
    }
}

/// Session lifecycle options
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_enforce_time_limit")]
    pub enforce_time_limit: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enforce_time_limit: default_enforce_time_limit(),
        }
    }
}

fn default_enforce_time_limit() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            config_path => {
                tracing::info!("No config file found at {:?}, using defaults", config_path);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("repsense").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject threshold combinations no evaluator can work with
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let thresholds = [
            ("pushup.elbow_down_deg", self.pushup.elbow_down_deg),
            ("pushup.elbow_up_deg", self.pushup.elbow_up_deg),
            ("pushup.torso_min_deg", self.pushup.torso_min_deg),
            ("pushup.torso_max_deg", self.pushup.torso_max_deg),
            ("squat.knee_down_deg", self.squat.knee_down_deg),
            ("squat.knee_up_deg", self.squat.knee_up_deg),
            ("jumping_jack.feet_apart_ratio", self.jumping_jack.feet_apart_ratio),
            ("jumping_jack.hands_margin", self.jumping_jack.hands_margin),
            ("jumping_jack.baseline_smoothing", self.jumping_jack.baseline_smoothing),
            ("plank.line_min_deg", self.plank.line_min_deg),
            ("plank.line_max_deg", self.plank.line_max_deg),
            ("plank.hip_tolerance", self.plank.hip_tolerance),
            ("framing.roi_margin", self.framing.roi_margin),
            ("framing.step_closer_below", self.framing.step_closer_below),
            ("framing.step_back_above", self.framing.step_back_above),
            ("framing.go_lower_above_deg", self.framing.go_lower_above_deg),
            ("framing.rise_up_below_deg", self.framing.rise_up_below_deg),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                errors.push(format!("{} must be a finite number", name));
            }
        }

        let windows = [
            ("pushup.torso", self.pushup.torso_min_deg, self.pushup.torso_max_deg),
            ("plank.line", self.plank.line_min_deg, self.plank.line_max_deg),
        ];
        for (name, min, max) in windows {
            if min > max {
                errors.push(format!("{} window is empty ({} > {})", name, min, max));
            }
        }

        if self.pushup.elbow_down_deg >= self.pushup.elbow_up_deg {
            errors.push("pushup.elbow_down_deg must be below elbow_up_deg".to_string());
        }
        if self.squat.knee_down_deg >= self.squat.knee_up_deg {
            errors.push("squat.knee_down_deg must be below knee_up_deg".to_string());
        }
        if self.jumping_jack.feet_apart_ratio <= 0.0 {
            errors.push("jumping_jack.feet_apart_ratio must be positive".to_string());
        }
        if !(0.0..1.0).contains(&self.jumping_jack.baseline_smoothing) {
            errors.push("jumping_jack.baseline_smoothing must be in [0, 1)".to_string());
        }
        if self.plank.hip_tolerance < 0.0 {
            errors.push("plank.hip_tolerance must not be negative".to_string());
        }
        if self.framing.roi_margin < 0.0 {
            errors.push("framing.roi_margin must not be negative".to_string());
        }
        if self.framing.throttle_ms == 0 {
            errors.push("framing.throttle_ms must be positive".to_string());
        }
        if self.framing.step_closer_below > self.framing.step_back_above {
            errors.push("framing.step_closer_below must not exceed step_back_above".to_string());
        }
        for (name, roi) in [
            ("portrait_roi", self.framing.portrait_roi),
            ("landscape_roi", self.framing.landscape_roi),
        ] {
            let edges = [roi.left, roi.right, roi.top, roi.bottom];
            if edges.iter().any(|edge| !edge.is_finite()) {
                errors.push(format!("framing.{} must have finite edges", name));
            } else if roi.width() <= 0.0 || roi.height() <= 0.0 {
                errors.push(format!("framing.{} has no area", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(errors.join("; ")))
        }
    }
}
