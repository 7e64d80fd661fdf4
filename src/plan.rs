// src/plan.rs
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::info;

use crate::model::{DayOfWeek, Exercise, WorkoutDay, WorkoutType};
use crate::storage::Storage;
use crate::store::KvStore;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("{day} has no exercise at position {index} (it has {len})")]
    ExerciseIndexOutOfRange {
        day: DayOfWeek,
        index: usize,
        len: usize,
    },
}

/// The weekly template. Every weekday is always present.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TrainingPlan {
    pub sunday: WorkoutDay,
    pub monday: WorkoutDay,
    pub tuesday: WorkoutDay,
    pub wednesday: WorkoutDay,
    pub thursday: WorkoutDay,
    pub friday: WorkoutDay,
    pub saturday: WorkoutDay,
}

impl TrainingPlan {
    pub fn day(&self, day: DayOfWeek) -> &WorkoutDay {
        match day {
            DayOfWeek::Sunday => &self.sunday,
            DayOfWeek::Monday => &self.monday,
            DayOfWeek::Tuesday => &self.tuesday,
            DayOfWeek::Wednesday => &self.wednesday,
            DayOfWeek::Thursday => &self.thursday,
            DayOfWeek::Friday => &self.friday,
            DayOfWeek::Saturday => &self.saturday,
        }
    }

    pub fn day_mut(&mut self, day: DayOfWeek) -> &mut WorkoutDay {
        match day {
            DayOfWeek::Sunday => &mut self.sunday,
            DayOfWeek::Monday => &mut self.monday,
            DayOfWeek::Tuesday => &mut self.tuesday,
            DayOfWeek::Wednesday => &mut self.wednesday,
            DayOfWeek::Thursday => &mut self.thursday,
            DayOfWeek::Friday => &mut self.friday,
            DayOfWeek::Saturday => &mut self.saturday,
        }
    }

    /// Days in week order, Sunday first.
    pub fn days(&self) -> impl Iterator<Item = (DayOfWeek, &WorkoutDay)> + '_ {
        DayOfWeek::iter().map(move |d| (d, self.day(d)))
    }
}

impl Default for TrainingPlan {
    fn default() -> Self {
        default_plan()
    }
}

fn rest_day(name: &str, duration: &str) -> WorkoutDay {
    WorkoutDay {
        name: name.to_string(),
        duration: duration.to_string(),
        type_: WorkoutType::Rest,
        exercises: Vec::new(),
    }
}

fn training_day(name: &str, duration: &str, type_: WorkoutType, exercises: &[(&str, u32, &str, u32)]) -> WorkoutDay {
    WorkoutDay {
        name: name.to_string(),
        duration: duration.to_string(),
        type_,
        exercises: exercises
            .iter()
            .map(|&(name, sets, reps, rest)| Exercise::new(name, sets, reps, rest))
            .collect(),
    }
}

/// Built-in weekly plan used until the user saves an override.
pub fn default_plan() -> TrainingPlan {
    TrainingPlan {
        sunday: training_day(
            "Upper Body (Strength)",
            "~60 min",
            WorkoutType::Strength,
            &[
                ("Barbell Bench Press", 5, "4-6", 180),
                ("Barbell Rows", 4, "5-7", 150),
                ("Weighted Pull-ups", 3, "5-8", 120),
                ("Overhead Press", 4, "5-7", 150),
                ("Barbell Curls", 3, "6-8", 90),
                ("Tricep Dips", 3, "6-10", 90),
            ],
        ),
        monday: training_day(
            "Lower Body (Strength)",
            "~60 min",
            WorkoutType::Strength,
            &[
                ("Back Squats", 5, "4-6", 180),
                ("Leg Press", 4, "6-8", 150),
                ("Leg Curls", 4, "8-10", 90),
                ("Standing Calf Raises", 4, "8-12", 90),
                ("Hanging Leg Raises", 3, "10-15", 60),
            ],
        ),
        tuesday: rest_day("Rest or Easy Swim", "0-30 min"),
        wednesday: rest_day("Rest or Easy Swim", "0-30 min"),
        thursday: training_day(
            "Upper Body (Hypertrophy)",
            "~50-60 min",
            WorkoutType::Hypertrophy,
            &[
                ("Incline Dumbbell Press", 4, "8-12", 90),
                ("Seated Cable Rows", 4, "10-12", 90),
                ("Dumbbell Shoulder Press", 3, "8-12", 90),
                ("Lat Pulldowns", 3, "10-15", 90),
                ("Lateral Raises", 3, "12-15", 60),
                ("Face Pulls", 3, "15-20", 60),
            ],
        ),
        friday: training_day(
            "Lower Body (Hypertrophy)",
            "~60 min",
            WorkoutType::Hypertrophy,
            &[
                ("Back Squats", 4, "8-12", 120),
                ("Leg Press", 3, "12-15", 90),
                ("Leg Curls", 4, "12-15", 60),
                ("Leg Extensions", 4, "12-15", 60),
                ("Seated Calf Raises", 4, "15-20", 60),
                ("Ab Wheel", 3, "10-12", 60),
            ],
        ),
        saturday: rest_day("Full Rest", "-"),
    }
}

// --- Pure plan edits: each returns a new plan and leaves the input untouched ---

pub fn swap_days(plan: &TrainingPlan, day_a: DayOfWeek, day_b: DayOfWeek) -> TrainingPlan {
    let mut updated = plan.clone();
    if day_a != day_b {
        let a = plan.day(day_a).clone();
        let b = plan.day(day_b).clone();
        *updated.day_mut(day_a) = b;
        *updated.day_mut(day_b) = a;
    }
    updated
}

fn check_index(plan: &TrainingPlan, day: DayOfWeek, index: usize) -> Result<(), PlanError> {
    let len = plan.day(day).exercises.len();
    if index < len {
        Ok(())
    } else {
        Err(PlanError::ExerciseIndexOutOfRange { day, index, len })
    }
}

/// Moves one exercise to another position, possibly on another day.
/// `to_index` is clamped to the destination length after removal.
/// # Errors
/// Returns `PlanError::ExerciseIndexOutOfRange` if `from_index` does not exist.
pub fn move_exercise(
    plan: &TrainingPlan,
    from_day: DayOfWeek,
    from_index: usize,
    to_day: DayOfWeek,
    to_index: usize,
) -> Result<TrainingPlan, PlanError> {
    check_index(plan, from_day, from_index)?;
    let mut updated = plan.clone();
    if from_day == to_day && from_index == to_index {
        return Ok(updated);
    }
    let exercise = updated.day_mut(from_day).exercises.remove(from_index);
    let destination = &mut updated.day_mut(to_day).exercises;
    let to_index = to_index.min(destination.len());
    destination.insert(to_index, exercise);
    Ok(updated)
}

/// # Errors
/// Returns `PlanError::ExerciseIndexOutOfRange` if `index` does not exist.
pub fn delete_exercise(plan: &TrainingPlan, day: DayOfWeek, index: usize) -> Result<TrainingPlan, PlanError> {
    check_index(plan, day, index)?;
    let mut updated = plan.clone();
    updated.day_mut(day).exercises.remove(index);
    Ok(updated)
}

/// Replaces the exercise at `index`. A set count of zero is raised to one.
/// # Errors
/// Returns `PlanError::ExerciseIndexOutOfRange` if `index` does not exist.
pub fn edit_exercise(
    plan: &TrainingPlan,
    day: DayOfWeek,
    index: usize,
    new_exercise: Exercise,
) -> Result<TrainingPlan, PlanError> {
    check_index(plan, day, index)?;
    let mut updated = plan.clone();
    updated.day_mut(day).exercises[index] = Exercise {
        sets: new_exercise.sets.max(1),
        ..new_exercise
    };
    Ok(updated)
}

pub fn add_exercise(plan: &TrainingPlan, day: DayOfWeek, exercise: Exercise) -> TrainingPlan {
    let mut updated = plan.clone();
    updated.day_mut(day).exercises.push(Exercise {
        sets: exercise.sets.max(1),
        ..exercise
    });
    updated
}

/// Partial edit of an exercise as entered by the user.
#[derive(Default, Debug, Clone)]
pub struct ExerciseEdit {
    pub name: Option<String>,
    pub sets: Option<i64>,
    pub reps: Option<String>,
    pub rest: Option<i64>,
}

impl ExerciseEdit {
    /// Applies the edit on top of `exercise`. Sets are kept at one or more and
    /// negative rest floors at zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn apply_to(&self, exercise: &Exercise) -> Exercise {
        Exercise {
            name: self
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map_or_else(|| exercise.name.clone(), str::to_string),
            sets: self
                .sets
                .map_or(exercise.sets, |s| s.clamp(1, i64::from(u32::MAX)) as u32),
            reps: self.reps.clone().unwrap_or_else(|| exercise.reps.clone()),
            rest: self
                .rest
                .map_or(exercise.rest, |r| r.clamp(0, i64::from(u32::MAX)) as u32),
        }
    }
}

/// Owns the in-memory plan and keeps it in sync with the stored override.
pub struct PlanManager<'s, S: KvStore> {
    storage: &'s Storage<S>,
    plan: TrainingPlan,
}

impl<'s, S: KvStore> PlanManager<'s, S> {
    /// Loads the stored override, or the built-in plan if there is none.
    pub fn load(storage: &'s Storage<S>) -> Self {
        let plan = storage.get_training_plan_override().unwrap_or_default();
        Self { storage, plan }
    }

    pub fn plan(&self) -> &TrainingPlan {
        &self.plan
    }

    /// Makes `plan` the current plan and persists it. The in-memory plan is
    /// updated even if the write is dropped.
    pub fn save(&mut self, plan: TrainingPlan) -> bool {
        self.plan = plan;
        self.storage.save_training_plan(&self.plan)
    }

    /// Applies a pure plan edit and saves the result.
    /// # Errors
    /// Propagates the edit's `PlanError`; nothing is saved in that case.
    pub fn apply<F>(&mut self, edit: F) -> Result<bool, PlanError>
    where
        F: FnOnce(&TrainingPlan) -> Result<TrainingPlan, PlanError>,
    {
        let updated = edit(&self.plan)?;
        Ok(self.save(updated))
    }

    pub fn reset_all(&mut self) -> bool {
        info!("Resetting training plan to defaults");
        self.save(default_plan())
    }

    pub fn reset_day(&mut self, day: DayOfWeek) -> bool {
        let mut updated = self.plan.clone();
        *updated.day_mut(day) = default_plan().day(day).clone();
        self.save(updated)
    }
}
