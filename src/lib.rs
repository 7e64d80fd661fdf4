use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

// --- Declare modules ---
pub mod clock;
mod config;
pub mod model;
pub mod nutrition;
pub mod plan;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;
pub mod timer;

// --- Expose public types ---
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, Error as ConfigError, StandardColor, Theme, Units,
};
pub use model::{
    DayOfWeek, Exercise, ExerciseLog, InputError, Macro, NutritionData, NutritionHistory, SetLog,
    SetUpdate, UserProfile, WeightEntry, WorkoutDay, WorkoutSession, WorkoutType,
};
pub use plan::{ExerciseEdit, PlanError, PlanManager, TrainingPlan};
pub use session::{SessionEngine, SessionState};
pub use stats::{NutritionProgress, WeeklyProgress, WeightTrend, WorkoutStats};
pub use storage::Storage;
pub use store::{get_store_path as get_store_path_util, KvStore, MemoryStore, SqliteStore, StoreError};
pub use timer::{LogNotifier, NotificationHandle, Notifier, RestTimer, TickOutcome};

/// What the home screen shows for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub day: DayOfWeek,
    pub workout: WorkoutDay,
    pub weekly_progress: WeeklyProgress,
    pub nutrition: NutritionData,
    pub nutrition_targets: NutritionData,
    pub nutrition_progress: NutritionProgress,
    pub current_weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub workouts: WorkoutStats,
    pub weight: WeightTrend,
}

pub struct AppService {
    pub config: Config,
    pub storage: Storage<SqliteStore>,
    pub store_path: PathBuf,
    pub config_path: PathBuf,
    pub clock: Box<dyn Clock>,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/store path determination, loading, or opening fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let store_path = match &config.store_path {
            Some(path) => path.clone(),
            None => store::get_store_path().context("Failed to determine store path")?,
        };
        let store = SqliteStore::open(&store_path)
            .with_context(|| format!("Failed to open store at {store_path:?}"))?;

        Ok(Self {
            config,
            storage: Storage::new(store),
            store_path,
            config_path,
            clock: Box::new(SystemClock),
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_store_path(&self) -> &Path {
        &self.store_path
    }

    // --- Config ---

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_units(&mut self, units: Units) -> Result<(), ConfigError> {
        self.config.units = units;
        self.save_config()
    }

    /// # Errors
    /// - `ConfigError::InvalidColor` if the colour name is unknown.
    /// - `ConfigError` variants if saving fails.
    pub fn set_header_color(&mut self, color: &str) -> Result<(), ConfigError> {
        let parsed = parse_color(color)?;
        self.config.theme.header_color = format!("{parsed:?}");
        self.save_config()
    }

    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_rest_notifications(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.config.rest_notifications = enabled;
        self.save_config()
    }

    // --- Dates ---

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn today_day(&self) -> DayOfWeek {
        DayOfWeek::from(self.today().weekday())
    }

    // --- Training plan & sessions ---

    pub fn plan_manager(&self) -> PlanManager<'_, SqliteStore> {
        PlanManager::load(&self.storage)
    }

    pub fn training_plan(&self) -> TrainingPlan {
        self.plan_manager().plan().clone()
    }

    pub fn session_engine(&self) -> SessionEngine<'_, SqliteStore> {
        SessionEngine::new(&self.storage, self.clock.as_ref())
    }

    // --- Nutrition ---

    pub fn today_nutrition(&self) -> NutritionData {
        stats::nutrition_for(&self.storage.get_nutrition_log(), self.today())
    }

    /// Adds a built-in quick meal to today's totals.
    /// Returns the new totals, or `None` if the nutrition log could not be updated.
    /// # Errors
    /// Returns `InputError::UnknownMeal` if the meal is not known.
    pub fn add_quick_meal(&self, name: &str) -> Result<Option<NutritionData>, InputError> {
        let meal = nutrition::find_quick_meal(name)?;
        self.add_meal(meal.macros)
    }

    /// Adds arbitrary macros to today's totals.
    /// Returns the new totals, or `None` if the nutrition log could not be updated.
    /// # Errors
    /// Returns `InputError::InvalidMacroValue` for negative or non-finite values.
    pub fn add_meal(&self, macros: NutritionData) -> Result<Option<NutritionData>, InputError> {
        let today = self.today();
        self.storage
            .update_nutrition_log(|log| nutrition::add_meal(log, today, macros))
    }

    /// # Errors
    /// Returns `InputError::InvalidMacroValue` for negative or non-finite values.
    pub fn set_macro(&self, macro_: Macro, value: f64) -> Result<Option<NutritionData>, InputError> {
        let today = self.today();
        self.storage
            .update_nutrition_log(|log| nutrition::set_macro(log, today, macro_, value))
    }

    pub fn reset_today_nutrition(&self) -> bool {
        let today = self.today();
        self.storage
            .update_nutrition_log(|log| {
                nutrition::reset_day(log, today);
                Ok::<_, std::convert::Infallible>(())
            })
            .is_ok_and(|saved| saved.is_some())
    }

    // --- Weight & profile ---

    fn check_weight(weight: f64) -> Result<(), InputError> {
        if weight.is_finite() && weight > 0.0 {
            Ok(())
        } else {
            Err(InputError::InvalidWeight(weight))
        }
    }

    /// Records today's weight, replacing an earlier entry from today.
    /// # Errors
    /// Returns `InputError::InvalidWeight` if weight is not positive.
    pub fn log_weight(&self, weight: f64) -> Result<bool, InputError> {
        Self::check_weight(weight)?;
        info!(weight, "Logging weight");
        Ok(self.storage.upsert_weight_entry(WeightEntry {
            date: self.today(),
            weight,
        }))
    }

    pub fn user_profile(&self) -> UserProfile {
        self.storage.get_user_profile()
    }

    /// # Errors
    /// Returns `InputError::InvalidWeight` if weight is not positive.
    pub fn set_target_weight(&self, weight: f64) -> Result<bool, InputError> {
        Self::check_weight(weight)?;
        let profile = UserProfile {
            target_weight: weight,
            ..self.user_profile()
        };
        Ok(self.storage.save_user_profile(&profile))
    }

    /// # Errors
    /// Returns `InputError::InvalidWeight` if weight is not positive.
    pub fn set_starting_weight(&self, weight: f64) -> Result<bool, InputError> {
        Self::check_weight(weight)?;
        let profile = UserProfile {
            starting_weight: weight,
            ..self.user_profile()
        };
        Ok(self.storage.save_user_profile(&profile))
    }

    pub fn list_weights(&self) -> Vec<WeightEntry> {
        let mut log = self.storage.get_weight_log();
        log.sort_by(|a, b| b.date.cmp(&a.date));
        log
    }

    // --- History & stats ---

    /// Workout history, newest first.
    pub fn workout_history(&self) -> Vec<WorkoutSession> {
        stats::sorted_history(&self.storage.get_workout_history())
    }

    pub fn delete_workout(&self, date: NaiveDate) -> bool {
        self.storage.delete_workout_session(date)
    }

    /// Home screen figures for `day` of the current week.
    pub fn dashboard(&self, day: Option<DayOfWeek>) -> Dashboard {
        let today = self.today();
        let day = day.unwrap_or_else(|| self.today_day());
        let plan = self.training_plan();
        let profile = self.user_profile();
        let nutrition = self.today_nutrition();

        Dashboard {
            date: today,
            day,
            workout: plan.day(day).clone(),
            weekly_progress: stats::weekly_completion(&self.storage.get_workout_history(), &plan, today),
            nutrition,
            nutrition_targets: profile.nutrition_targets,
            nutrition_progress: stats::nutrition_progress(&nutrition, &profile.nutrition_targets),
            current_weight: stats::current_weight(&self.storage.get_weight_log(), &profile),
        }
    }

    pub fn progress_summary(&self) -> ProgressSummary {
        let profile = self.user_profile();
        ProgressSummary {
            workouts: stats::workout_stats(&self.storage.get_workout_history()),
            weight: stats::weight_trend(&self.storage.get_weight_log(), &profile),
        }
    }
}
