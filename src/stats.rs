// src/stats.rs
//! Read-only figures derived from the stored logs. Recomputed on every call.
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::model::{DayOfWeek, NutritionData, NutritionHistory, UserProfile, WeightEntry, WorkoutSession};
use crate::plan::TrainingPlan;

/// Training days in the built-in weekly template. Used as the weekly target
/// regardless of how many rest days a customised plan has.
pub const WEEKLY_TARGET_WORKOUTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyProgress {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkoutStats {
    pub total_workouts: usize,
    pub avg_duration_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightTrend {
    pub current_weight: f64,
    pub weight_change: f64,
    pub weight_to_target: f64,
}

/// Fraction of each daily target reached (1.0 == on target).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutritionProgress {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// The seven dates of the Sunday-started week containing `today`.
pub fn week_dates(today: NaiveDate) -> Vec<NaiveDate> {
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    (0..7).map(|i| week_start + Duration::days(i)).collect()
}

/// Counts this week's dates that have a history entry and are not rest days in `plan`.
pub fn weekly_completion(history: &[WorkoutSession], plan: &TrainingPlan, today: NaiveDate) -> WeeklyProgress {
    let completed = week_dates(today)
        .into_iter()
        .filter(|date| {
            history.iter().any(|s| s.date == *date)
                && !plan.day(DayOfWeek::from(date.weekday())).is_rest()
        })
        .count();
    WeeklyProgress {
        completed,
        total: WEEKLY_TARGET_WORKOUTS,
    }
}

pub fn nutrition_for(log: &NutritionHistory, date: NaiveDate) -> NutritionData {
    log.get(&date).copied().unwrap_or_default()
}

fn ratio(value: f64, target: f64) -> f64 {
    if target > 0.0 {
        value / target
    } else {
        0.0
    }
}

pub fn nutrition_progress(consumed: &NutritionData, targets: &NutritionData) -> NutritionProgress {
    NutritionProgress {
        calories: ratio(consumed.calories, targets.calories),
        protein: ratio(consumed.protein, targets.protein),
        carbs: ratio(consumed.carbs, targets.carbs),
        fats: ratio(consumed.fats, targets.fats),
    }
}

/// Latest logged weight by date, falling back to the profile's value.
pub fn current_weight(weight_log: &[WeightEntry], profile: &UserProfile) -> f64 {
    weight_log
        .iter()
        .max_by_key(|w| w.date)
        .map_or(profile.current_weight, |w| w.weight)
}

pub fn weight_trend(weight_log: &[WeightEntry], profile: &UserProfile) -> WeightTrend {
    let current_weight = current_weight(weight_log, profile);
    WeightTrend {
        current_weight,
        weight_change: current_weight - profile.starting_weight,
        weight_to_target: profile.target_weight - current_weight,
    }
}

/// Session count and mean duration in whole minutes. Sessions without an end
/// time add nothing to the total but still count in the denominator.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn workout_stats(history: &[WorkoutSession]) -> WorkoutStats {
    let total_workouts = history.len();
    if total_workouts == 0 {
        return WorkoutStats {
            total_workouts,
            avg_duration_minutes: 0,
        };
    }
    let total_millis: i64 = history
        .iter()
        .filter_map(|s| s.end_time.map(|end| (end - s.start_time).num_milliseconds()))
        .sum();
    let avg = total_millis as f64 / total_workouts as f64 / 60_000.0;
    WorkoutStats {
        total_workouts,
        avg_duration_minutes: avg.round() as i64,
    }
}

/// History newest first.
pub fn sorted_history(history: &[WorkoutSession]) -> Vec<WorkoutSession> {
    let mut sorted = history.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::default_plan;
    use chrono::{TimeZone, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(date: NaiveDate, minutes: Option<i64>) -> WorkoutSession {
        let start = Utc.from_utc_datetime(&date.and_hms_opt(18, 0, 0).unwrap());
        let mut s = WorkoutSession::new("Any", &[], start);
        s.end_time = minutes.map(|m| start + Duration::minutes(m));
        s
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-06-05 is a Wednesday
        let dates = week_dates(ymd(2024, 6, 5));
        assert_eq!(dates.first(), Some(&ymd(2024, 6, 2)));
        assert_eq!(dates.last(), Some(&ymd(2024, 6, 8)));
        assert_eq!(week_dates(ymd(2024, 6, 2))[0], ymd(2024, 6, 2));
    }

    #[test]
    fn weekly_completion_skips_rest_days_and_other_weeks() {
        let plan = default_plan();
        let history = vec![
            session(ymd(2024, 6, 2), Some(60)), // Sunday, strength
            session(ymd(2024, 6, 3), Some(55)), // Monday, strength
            session(ymd(2024, 6, 4), Some(20)), // Tuesday, rest
            session(ymd(2024, 6, 6), None),     // Thursday, hypertrophy
            session(ymd(2024, 5, 30), Some(50)), // previous week
        ];
        assert_eq!(
            weekly_completion(&history, &plan, ymd(2024, 6, 7)),
            WeeklyProgress {
                completed: 3,
                total: 6
            }
        );
    }

    #[test]
    fn average_duration_counts_unfinished_sessions() {
        let history = vec![
            session(ymd(2024, 6, 2), Some(60)),
            session(ymd(2024, 6, 3), Some(30)),
            session(ymd(2024, 6, 4), None),
        ];
        assert_eq!(
            workout_stats(&history),
            WorkoutStats {
                total_workouts: 3,
                avg_duration_minutes: 30
            }
        );
        assert_eq!(workout_stats(&[]).avg_duration_minutes, 0);
    }

    #[test]
    fn current_weight_prefers_latest_entry() {
        let profile = UserProfile::default();
        assert_eq!(current_weight(&[], &profile), 65.0);

        let log = vec![
            WeightEntry { date: ymd(2024, 6, 1), weight: 66.0 },
            WeightEntry { date: ymd(2024, 6, 9), weight: 67.5 },
            WeightEntry { date: ymd(2024, 6, 4), weight: 66.8 },
        ];
        let trend = weight_trend(&log, &profile);
        assert_eq!(trend.current_weight, 67.5);
        assert_eq!(trend.weight_change, 2.5);
        assert_eq!(trend.weight_to_target, 2.5);
    }

    #[test]
    fn nutrition_progress_handles_zero_targets() {
        let consumed = NutritionData { calories: 1400.0, protein: 145.0, carbs: 0.0, fats: 40.0 };
        let targets = NutritionData { calories: 2800.0, protein: 145.0, carbs: 350.0, fats: 0.0 };
        let progress = nutrition_progress(&consumed, &targets);
        assert_eq!(progress.calories, 0.5);
        assert_eq!(progress.protein, 1.0);
        assert_eq!(progress.carbs, 0.0);
        assert_eq!(progress.fats, 0.0);
    }
}
