// src/model.rs
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Rejected user input. Raised at the service boundary before anything is persisted.
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Invalid weight: {0}. Weight must be a positive number.")]
    InvalidWeight(f64),
    #[error("Invalid value for {macro_name}: {value}. Macros must be zero or positive.")]
    InvalidMacroValue { macro_name: Macro, value: f64 },
    #[error("Unknown day of week: '{0}'")]
    UnknownDay(String),
    #[error("Unknown quick meal: '{0}'")]
    UnknownMeal(String),
}

/// Weekday keys of a training plan, Sunday first.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    EnumIter, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl From<Weekday> for DayOfWeek {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Sun => Self::Sunday,
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
        }
    }
}

impl DayOfWeek {
    /// Parses a user supplied day name ("monday", "Monday", ...).
    /// # Errors
    /// Returns `InputError::UnknownDay` if the name is not a weekday.
    pub fn parse(name: &str) -> Result<Self, InputError> {
        name.trim()
            .parse()
            .map_err(|_| InputError::UnknownDay(name.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkoutType {
    Strength,
    Hypertrophy,
    Rest,
}

/// Exercise template as defined by a training day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: String, // free-form range, e.g. "8-12"
    pub rest: u32,    // seconds
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets: u32, reps: impl Into<String>, rest: u32) -> Self {
        Self {
            name: name.into(),
            sets,
            reps: reps.into(),
            rest,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkoutDay {
    pub name: String,
    pub duration: String,
    #[serde(rename = "type")]
    pub type_: WorkoutType,
    pub exercises: Vec<Exercise>,
}

impl WorkoutDay {
    pub fn is_rest(&self) -> bool {
        self.type_ == WorkoutType::Rest
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct SetLog {
    pub weight: String,
    pub reps: String,
    pub completed: bool,
}

impl SetLog {
    /// A set can be logged once both weight and reps are filled in.
    pub fn is_loggable(&self) -> bool {
        !self.weight.is_empty() && !self.reps.is_empty()
    }
}

/// Partial update for a single set. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetUpdate {
    pub weight: Option<String>,
    pub reps: Option<String>,
    pub completed: Option<bool>,
}

impl SetUpdate {
    pub fn completed() -> Self {
        Self {
            completed: Some(true),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weight.is_none() && self.reps.is_none() && self.completed.is_none()
    }
}

// Weight and reps are numeric text; an empty string clears the field.
pub(crate) fn is_numeric_text(value: &str) -> bool {
    value.is_empty() || value.parse::<f64>().is_ok_and(|v| v.is_finite() && v >= 0.0)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub name: String,
    pub sets: Vec<SetLog>,
    pub target_sets: u32,
    pub target_reps: String,
    pub rest: u32,
}

impl From<&Exercise> for ExerciseLog {
    fn from(exercise: &Exercise) -> Self {
        Self {
            name: exercise.name.clone(),
            sets: vec![SetLog::default(); exercise.sets as usize],
            target_sets: exercise.sets,
            target_reps: exercise.reps.clone(),
            rest: exercise.rest,
        }
    }
}

impl ExerciseLog {
    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.completed).count()
    }

    pub fn is_complete(&self) -> bool {
        !self.sets.is_empty() && self.sets.iter().all(|s| s.completed)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub workout_name: String,
    pub exercises: Vec<ExerciseLog>,
    pub current_exercise_index: usize,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub end_time: Option<DateTime<Utc>>,
    pub date: NaiveDate,
}

impl WorkoutSession {
    /// Builds a fresh session with empty set logs for every exercise.
    pub fn new(workout_name: &str, exercises: &[Exercise], start_time: DateTime<Utc>) -> Self {
        Self {
            workout_name: workout_name.to_string(),
            exercises: exercises.iter().map(ExerciseLog::from).collect(),
            current_exercise_index: 0,
            start_time,
            end_time: None,
            date: start_time.date_naive(),
        }
    }

    pub fn current_exercise(&self) -> Option<&ExerciseLog> {
        self.exercises.get(self.current_exercise_index)
    }

    /// Completed sets and total sets across all exercises.
    pub fn progress(&self) -> (usize, usize) {
        self.exercises.iter().fold((0, 0), |(done, total), ex| {
            (done + ex.completed_sets(), total + ex.sets.len())
        })
    }

    /// Whole minutes between start and end, `None` while unfinished.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end_time.map(|end| {
            let millis = (end - self.start_time).num_milliseconds();
            (millis as f64 / 60_000.0).round() as i64
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct NutritionData {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl NutritionData {
    pub fn get(&self, macro_: Macro) -> f64 {
        match macro_ {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fats => self.fats,
        }
    }

    pub fn set(&mut self, macro_: Macro, value: f64) {
        match macro_ {
            Macro::Calories => self.calories = value,
            Macro::Protein => self.protein = value,
            Macro::Carbs => self.carbs = value,
            Macro::Fats => self.fats = value,
        }
    }
}

impl std::ops::Add for NutritionData {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fats: self.fats + rhs.fats,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Macro {
    Calories,
    Protein,
    Carbs,
    Fats,
}

pub type NutritionHistory = BTreeMap<NaiveDate, NutritionData>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub current_weight: f64,
    pub target_weight: f64,
    pub starting_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    pub nutrition_targets: NutritionData,
}

// Used until the first profile save.
impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: None,
            current_weight: 65.0,
            target_weight: 70.0,
            starting_weight: 65.0,
            start_date: None,
            nutrition_targets: NutritionData {
                calories: 2800.0,
                protein: 145.0,
                carbs: 350.0,
                fats: 80.0,
            },
        }
    }
}
