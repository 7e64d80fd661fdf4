// src/storage.rs
//! Typed access to the key-value store.
//!
//! Nothing in here returns an error. A value that cannot be read or parsed is
//! logged and replaced by its default; a write that fails is logged and
//! dropped, and the caller keeps its in-memory state.
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::model::{NutritionHistory, UserProfile, WeightEntry, WorkoutSession};
use crate::plan::TrainingPlan;
use crate::store::KvStore;

/// Fixed store keys, one per logical entity.
pub mod keys {
    pub const WORKOUT_HISTORY: &str = "@workout_history";
    pub const NUTRITION_LOG: &str = "@nutrition_log";
    pub const WEIGHT_LOG: &str = "@weight_log";
    pub const CURRENT_SESSION: &str = "@current_session";
    pub const USER_PROFILE: &str = "@user_profile";
    pub const TRAINING_PLAN: &str = "@training_plan";
}

enum Loaded<T> {
    Missing,
    Value(T),
    Malformed,
    Unavailable,
}

impl<T> Loaded<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Loaded::Value(v) => Some(v),
            _ => None,
        }
    }
}

pub struct Storage<S: KvStore> {
    store: S,
}

impl<S: KvStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Loaded<T> {
        match self.store.get(key) {
            Ok(None) => Loaded::Missing,
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Loaded::Value(value),
                Err(e) => {
                    warn!(key, error = %e, "Ignoring malformed stored value");
                    Loaded::Malformed
                }
            },
            Err(e) => {
                error!(key, error = %e, "Failed to read from store");
                Loaded::Unavailable
            }
        }
    }

    /// Loads a collection that is about to be rewritten. Missing or malformed
    /// values start empty; `None` means the store could not be read and the
    /// write must be skipped so the stored value is not replaced.
    fn load_for_update<T: DeserializeOwned + Default>(&self, key: &str) -> Option<T> {
        match self.load(key) {
            Loaded::Value(value) => Some(value),
            Loaded::Missing | Loaded::Malformed => Some(T::default()),
            Loaded::Unavailable => {
                error!(key, "Stored value unreadable, update dropped");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                error!(key, error = %e, "Failed to serialize value, write dropped");
                return false;
            }
        };
        match self.store.set(key, &json) {
            Ok(()) => {
                debug!(key, bytes = json.len(), "Persisted");
                true
            }
            Err(e) => {
                error!(key, error = %e, "Failed to write to store, write dropped");
                false
            }
        }
    }

    fn delete(&self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(()) => true,
            Err(e) => {
                error!(key, error = %e, "Failed to remove from store");
                false
            }
        }
    }

    // --- Workout history ---

    pub fn get_workout_history(&self) -> Vec<WorkoutSession> {
        self.load(keys::WORKOUT_HISTORY)
            .into_option()
            .unwrap_or_default()
    }

    pub fn save_workout_history(&self, history: &[WorkoutSession]) -> bool {
        self.write(keys::WORKOUT_HISTORY, history)
    }

    /// Upserts a session into history by its date: replaces the entry sharing
    /// the date, otherwise appends. Returns `false` if history could not be
    /// read or written.
    pub fn save_workout_session(&self, session: &WorkoutSession) -> bool {
        let Some(mut history) = self.load_for_update::<Vec<WorkoutSession>>(keys::WORKOUT_HISTORY) else {
            return false;
        };
        match history.iter_mut().find(|s| s.date == session.date) {
            Some(existing) => *existing = session.clone(),
            None => history.push(session.clone()),
        }
        self.save_workout_history(&history)
    }

    /// Removes the history entry for `date`. Returns `true` if one was removed and persisted.
    pub fn delete_workout_session(&self, date: NaiveDate) -> bool {
        let Some(mut history) = self.load_for_update::<Vec<WorkoutSession>>(keys::WORKOUT_HISTORY) else {
            return false;
        };
        let before = history.len();
        history.retain(|s| s.date != date);
        if history.len() == before {
            return false;
        }
        self.save_workout_history(&history)
    }

    // --- Current session slot ---

    pub fn get_current_session(&self) -> Option<WorkoutSession> {
        self.load(keys::CURRENT_SESSION).into_option()
    }

    pub fn save_current_session(&self, session: &WorkoutSession) -> bool {
        self.write(keys::CURRENT_SESSION, session)
    }

    pub fn clear_current_session(&self) -> bool {
        self.delete(keys::CURRENT_SESSION)
    }

    // --- Nutrition ---

    pub fn get_nutrition_log(&self) -> NutritionHistory {
        self.load(keys::NUTRITION_LOG)
            .into_option()
            .unwrap_or_default()
    }

    pub fn save_nutrition_log(&self, log: &NutritionHistory) -> bool {
        self.write(keys::NUTRITION_LOG, log)
    }

    /// Read-modify-write of the nutrition log. `edit` runs on the stored log
    /// (empty if missing or malformed) and the log is saved only if it returns `Ok`.
    ///
    /// `Ok(None)` means nothing was persisted: the log was unreadable, so `edit`
    /// never ran, or the write failed.
    ///
    /// # Errors
    /// Passes through the error returned by `edit`.
    pub fn update_nutrition_log<R, E>(
        &self,
        edit: impl FnOnce(&mut NutritionHistory) -> Result<R, E>,
    ) -> Result<Option<R>, E> {
        let Some(mut log) = self.load_for_update::<NutritionHistory>(keys::NUTRITION_LOG) else {
            return Ok(None);
        };
        let result = edit(&mut log)?;
        Ok(self.save_nutrition_log(&log).then_some(result))
    }

    // --- Weight ---

    pub fn get_weight_log(&self) -> Vec<WeightEntry> {
        self.load(keys::WEIGHT_LOG).into_option().unwrap_or_default()
    }

    pub fn save_weight_log(&self, log: &[WeightEntry]) -> bool {
        self.write(keys::WEIGHT_LOG, log)
    }

    /// Replaces the entry sharing `entry.date`, otherwise puts the new entry first.
    pub fn upsert_weight_entry(&self, entry: WeightEntry) -> bool {
        let Some(mut log) = self.load_for_update::<Vec<WeightEntry>>(keys::WEIGHT_LOG) else {
            return false;
        };
        match log.iter_mut().find(|w| w.date == entry.date) {
            Some(existing) => *existing = entry,
            None => log.insert(0, entry),
        }
        self.save_weight_log(&log)
    }

    // --- Profile ---

    /// Stored profile, or the built-in defaults before the first save.
    pub fn get_user_profile(&self) -> UserProfile {
        self.load(keys::USER_PROFILE)
            .into_option()
            .unwrap_or_default()
    }

    pub fn save_user_profile(&self, profile: &UserProfile) -> bool {
        self.write(keys::USER_PROFILE, profile)
    }

    // --- Training plan ---

    pub fn get_training_plan_override(&self) -> Option<TrainingPlan> {
        self.load(keys::TRAINING_PLAN).into_option()
    }

    pub fn save_training_plan(&self, plan: &TrainingPlan) -> bool {
        self.write(keys::TRAINING_PLAN, plan)
    }
}
