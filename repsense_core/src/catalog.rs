//! Built-in catalog of pose-evaluated exercises.

use crate::types::{ExerciseId, MetricUnit};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::time::Duration;

/// Cached default catalog - built once and reused by every session
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Resolve an exercise selector string against the default catalog
pub fn lookup(id: &str) -> Result<&'static ExerciseInfo> {
    let exercise: ExerciseId = id.parse()?;
    get_default_catalog()
        .get(exercise)
        .ok_or_else(|| Error::Config(format!("Exercise '{}' is not in the catalog", exercise)))
}

/// Display and session metadata for one exercise
#[derive(Clone, Debug)]
pub struct ExerciseInfo {
    pub id: ExerciseId,
    pub title: String,
    pub description: String,
    pub unit: MetricUnit,
    /// Sessions stop automatically once this much frame time has elapsed
    pub time_limit: Duration,
}

/// The complete set of exercises the evaluators understand
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: HashMap<ExerciseId, ExerciseInfo>,
}

impl Catalog {
    pub fn get(&self, id: ExerciseId) -> Option<&ExerciseInfo> {
        self.exercises.get(&id)
    }

    /// Entries in a stable display order
    pub fn sorted(&self) -> Vec<&ExerciseInfo> {
        let mut entries: Vec<_> = self.exercises.values().collect();
        entries.sort_by_key(|e| e.id);
        entries
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, info) in &self.exercises {
            if *id != info.id {
                errors.push(format!(
                    "Exercise key '{}' doesn't match info.id '{}'",
                    id, info.id
                ));
            }
            if info.title.is_empty() {
                errors.push(format!("Exercise '{}' has empty title", id));
            }
            if info.unit != id.unit() {
                errors.push(format!(
                    "Exercise '{}' unit {:?} doesn't match evaluator unit {:?}",
                    id,
                    info.unit,
                    id.unit()
                ));
            }
            if info.time_limit.is_zero() {
                errors.push(format!("Exercise '{}' has a zero time limit", id));
            }
        }

        for id in ExerciseId::ALL {
            if !self.exercises.contains_key(&id) {
                errors.push(format!("Catalog has no entry for '{}'", id));
            }
        }

        errors
    }
}

/// Builds the default catalog
pub fn build_default_catalog() -> Catalog {
    let entries = [
        (
            ExerciseId::PushUps,
            "Push-ups (60s)",
            "Max correct push-ups in 60 seconds.",
            60,
        ),
        (
            ExerciseId::Squats,
            "Bodyweight Squats (60s)",
            "Max full-depth squats in 60 seconds.",
            60,
        ),
        (
            ExerciseId::JumpingJacks,
            "Jumping Jacks (30s)",
            "Max full-extension jumping jacks in 30 seconds.",
            30,
        ),
        (
            ExerciseId::Plank,
            "Forearm Plank Hold",
            "Hold a straight plank as long as possible.",
            60,
        ),
    ];

    let exercises = entries
        .into_iter()
        .map(|(id, title, description, limit_secs)| {
            (
                id,
                ExerciseInfo {
                    id,
                    title: title.into(),
                    description: description.into(),
                    unit: id.unit(),
                    time_limit: Duration::from_secs(limit_secs),
                },
            )
        })
        .collect();

    Catalog { exercises }
}
