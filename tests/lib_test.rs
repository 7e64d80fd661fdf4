use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use fitness_tracker_lib::{
    plan, AppService, Config, DayOfWeek, FixedClock, InputError, Macro, NutritionData, PlanError, SessionState,
    SetLog, SetUpdate, SqliteStore, Storage, Units, WorkoutSession,
};
use std::rc::Rc;

// 2024-06-02 is a Sunday
fn sunday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Helper function to create a test service with an in-memory store and a controllable clock
fn create_test_service() -> Result<(AppService, Rc<FixedClock>)> {
    let store = SqliteStore::open_in_memory()?;
    let clock = Rc::new(FixedClock::new(sunday_morning()));

    let config = Config {
        units: Units::Metric,
        ..Default::default()
    };

    let service = AppService {
        config,
        storage: Storage::new(store),
        store_path: ":memory:".into(),
        config_path: "test_config.toml".into(),
        clock: Box::new(Rc::clone(&clock)),
    };
    Ok((service, clock))
}

fn finished_session(name: &str, start: DateTime<Utc>, minutes: i64) -> WorkoutSession {
    let mut session = WorkoutSession::new(name, &[], start);
    session.end_time = Some(start + Duration::minutes(minutes));
    session
}

#[test]
fn test_start_today_builds_empty_set_logs() -> Result<()> {
    let (service, _clock) = create_test_service()?;
    let plan = service.training_plan();
    let mut engine = service.session_engine();

    let session = engine
        .start_for_day(&plan, service.today_day())
        .expect("Sunday is a training day")
        .clone();

    assert_eq!(session.workout_name, "Upper Body (Strength)");
    assert_eq!(session.exercises.len(), 6);
    assert_eq!(session.exercises[0].name, "Barbell Bench Press");
    assert_eq!(session.exercises[0].sets.len(), 5);
    assert!(session.exercises[0]
        .sets
        .iter()
        .all(|s| s.weight.is_empty() && s.reps.is_empty() && !s.completed));
    assert_eq!(session.current_exercise_index, 0);
    assert_eq!(session.date, ymd(2024, 6, 2));
    assert_eq!(service.storage.get_current_session(), Some(session));
    Ok(())
}

#[test]
fn test_restore_is_idempotent_and_survives_restart() -> Result<()> {
    let (service, clock) = create_test_service()?;
    let plan = service.training_plan();

    {
        let mut engine = service.session_engine();
        engine.start_for_day(&plan, DayOfWeek::Sunday);
        assert!(engine.update_set(
            1,
            2,
            SetUpdate {
                weight: Some("80".into()),
                reps: Some("6".into()),
                completed: Some(true),
            }
        ));
        assert!(engine.next_exercise());
    }

    // A new engine is a fresh process reading the same store
    clock.advance(Duration::minutes(30));
    let mut engine = service.session_engine();
    let first = engine.start_for_day(&plan, DayOfWeek::Sunday).cloned().unwrap();
    let second = engine.start_for_day(&plan, DayOfWeek::Sunday).cloned().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.start_time, sunday_morning());
    assert_eq!(first.current_exercise_index, 1);
    let set = &first.exercises[1].sets[2];
    assert_eq!((set.weight.as_str(), set.reps.as_str(), set.completed), ("80", "6", true));
    Ok(())
}

#[test]
fn test_partial_set_updates_merge_across_restart() -> Result<()> {
    let (service, _clock) = create_test_service()?;
    let plan = service.training_plan();

    {
        let mut engine = service.session_engine();
        engine.start_for_day(&plan, DayOfWeek::Sunday);
        assert!(engine.update_set(
            0,
            1,
            SetUpdate {
                weight: Some("60".into()),
                ..Default::default()
            }
        ));
        assert!(engine.update_set(
            0,
            2,
            SetUpdate {
                reps: Some("5".into()),
                completed: Some(true),
                ..Default::default()
            }
        ));
    }

    // Reps-only update after a restart merges onto the stored weight
    let mut engine = service.session_engine();
    assert!(engine.resume().is_some());
    assert!(engine.update_set(
        0,
        1,
        SetUpdate {
            reps: Some("6".into()),
            ..Default::default()
        }
    ));

    let restored = service.session_engine().resume().cloned().unwrap();
    let sets = &restored.exercises[0].sets;
    assert_eq!(
        sets[1],
        SetLog {
            weight: "60".into(),
            reps: "6".into(),
            completed: false
        }
    );
    assert_eq!(
        sets[2],
        SetLog {
            weight: String::new(),
            reps: "5".into(),
            completed: true
        }
    );
    assert_eq!(sets[0], SetLog::default());
    assert!(sets[3..].iter().all(|s| *s == SetLog::default()));
    assert!(restored.exercises[1..]
        .iter()
        .all(|ex| ex.sets.iter().all(|s| *s == SetLog::default())));
    Ok(())
}

#[test]
fn test_finish_archives_and_next_start_is_fresh() -> Result<()> {
    let (service, clock) = create_test_service()?;
    let plan = service.training_plan();
    let mut engine = service.session_engine();

    engine.start_for_day(&plan, DayOfWeek::Sunday);
    engine.complete_set(0, 0);
    clock.advance(Duration::minutes(55));
    let finished = engine.finish().expect("session was active");

    assert_eq!(engine.state(), SessionState::Finished);
    assert_eq!(finished.duration_minutes(), Some(55));
    assert!(service.storage.get_current_session().is_none());
    let history = service.workout_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], finished);

    let mut engine = service.session_engine();
    let fresh = engine.start_for_day(&plan, DayOfWeek::Sunday).cloned().unwrap();
    assert_eq!(fresh.progress(), (0, 22));
    assert!(fresh.end_time.is_none());
    Ok(())
}

#[test]
fn test_cancel_leaves_history_untouched() -> Result<()> {
    let (service, _clock) = create_test_service()?;
    let plan = service.training_plan();
    let mut engine = service.session_engine();

    engine.start_for_day(&plan, DayOfWeek::Monday);
    engine.complete_set(0, 0);
    assert!(engine.cancel());

    assert_eq!(engine.state(), SessionState::Cancelled);
    assert!(service.storage.get_current_session().is_none());
    assert!(service.workout_history().is_empty());
    Ok(())
}

#[test]
fn test_same_day_finish_replaces_history_entry() -> Result<()> {
    let (service, clock) = create_test_service()?;
    let plan = service.training_plan();

    let mut engine = service.session_engine();
    engine.start_for_day(&plan, DayOfWeek::Sunday);
    engine.finish();

    clock.advance(Duration::hours(2));
    let mut engine = service.session_engine();
    engine.start_for_day(&plan, DayOfWeek::Sunday);
    engine.complete_set(0, 0);
    let second = engine.finish().unwrap();

    let history = service.workout_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], second);
    assert_eq!(history[0].exercises[0].completed_sets(), 1);
    Ok(())
}

#[test]
fn test_stale_session_is_discarded_on_a_new_day() -> Result<()> {
    let (service, clock) = create_test_service()?;
    let plan = service.training_plan();
    service.session_engine().start_for_day(&plan, DayOfWeek::Sunday);

    clock.advance(Duration::days(1));
    let mut engine = service.session_engine();
    assert!(engine.resume().is_none());
    assert!(service.storage.get_current_session().is_none());

    // Monday's workout starts fresh
    let monday = engine.start_for_day(&plan, service.today_day()).cloned().unwrap();
    assert_eq!(monday.workout_name, "Lower Body (Strength)");
    assert_eq!(monday.date, ymd(2024, 6, 3));
    Ok(())
}

#[test]
fn test_session_for_another_workout_is_replaced() -> Result<()> {
    let (service, _clock) = create_test_service()?;
    let plan = service.training_plan();
    let mut engine = service.session_engine();

    engine.start_for_day(&plan, DayOfWeek::Sunday);
    engine.complete_set(0, 0);
    let other = engine.start_for_day(&plan, DayOfWeek::Thursday).cloned().unwrap();

    assert_eq!(other.workout_name, "Upper Body (Hypertrophy)");
    assert_eq!(other.progress().0, 0);
    assert_eq!(service.storage.get_current_session(), Some(other));
    Ok(())
}

#[test]
fn test_rest_day_has_nothing_to_start() -> Result<()> {
    let (service, _clock) = create_test_service()?;
    let plan = service.training_plan();
    let mut engine = service.session_engine();

    assert!(engine.start_for_day(&plan, DayOfWeek::Tuesday).is_none());
    assert!(engine.start_for_day(&plan, DayOfWeek::Saturday).is_none());
    assert_eq!(engine.state(), SessionState::Idle);
    assert!(service.storage.get_current_session().is_none());
    Ok(())
}

#[test]
fn test_weekly_progress_counts_training_days_only() -> Result<()> {
    let (service, _clock) = create_test_service()?;
    let history = vec![
        // Previous week
        finished_session("Full Rest", Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(), 30),
        finished_session("Upper", Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap(), 60),
        finished_session("Lower", Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(), 60),
        // Tuesday is a rest day in the default plan
        finished_session("Swim", Utc.with_ymd_and_hms(2024, 6, 4, 9, 0, 0).unwrap(), 20),
        finished_session("Upper", Utc.with_ymd_and_hms(2024, 6, 6, 9, 0, 0).unwrap(), 50),
    ];
    service.storage.save_workout_history(&history);

    let dashboard = service.dashboard(None);
    assert_eq!(dashboard.day, DayOfWeek::Sunday);
    assert_eq!(dashboard.weekly_progress.completed, 3);
    assert_eq!(dashboard.weekly_progress.total, 6);
    Ok(())
}

#[test]
fn test_dashboard_defaults_before_any_logging() -> Result<()> {
    let (service, _clock) = create_test_service()?;
    let dashboard = service.dashboard(Some(DayOfWeek::Saturday));

    assert_eq!(dashboard.workout.name, "Full Rest");
    assert_eq!(dashboard.weekly_progress.completed, 0);
    assert_eq!(dashboard.current_weight, 65.0);
    assert_eq!(dashboard.nutrition.calories, 0.0);
    assert_eq!(dashboard.nutrition_targets.calories, 2800.0);
    assert_eq!(dashboard.nutrition_progress.protein, 0.0);
    Ok(())
}

#[test]
fn test_plan_edits_persist_and_reset() -> Result<()> {
    let (service, _clock) = create_test_service()?;

    let mut manager = service.plan_manager();
    manager.apply(|p| plan::move_exercise(p, DayOfWeek::Sunday, 0, DayOfWeek::Monday, 2))?;
    manager.save(plan::swap_days(manager.plan(), DayOfWeek::Thursday, DayOfWeek::Saturday));

    // Reloading reads the stored override
    let reloaded = service.training_plan();
    assert_eq!(reloaded.sunday.exercises.len(), 5);
    assert_eq!(reloaded.monday.exercises[2].name, "Barbell Bench Press");
    assert_eq!(reloaded.thursday.name, "Full Rest");
    assert_eq!(reloaded.saturday.name, "Upper Body (Hypertrophy)");

    let mut manager = service.plan_manager();
    manager.reset_day(DayOfWeek::Monday);
    let after_day_reset = service.training_plan();
    assert_eq!(after_day_reset.monday, plan::default_plan().monday);
    assert_eq!(after_day_reset.sunday.exercises.len(), 5);

    manager.reset_all();
    assert_eq!(service.training_plan(), plan::default_plan());
    Ok(())
}

#[test]
fn test_invalid_plan_edit_saves_nothing() -> Result<()> {
    let (service, _clock) = create_test_service()?;
    let mut manager = service.plan_manager();

    let result = manager.apply(|p| plan::delete_exercise(p, DayOfWeek::Saturday, 0));
    assert_eq!(
        result,
        Err(PlanError::ExerciseIndexOutOfRange {
            day: DayOfWeek::Saturday,
            index: 0,
            len: 0
        })
    );
    assert!(service.storage.get_training_plan_override().is_none());
    Ok(())
}

#[test]
fn test_weight_log_upserts_by_date() -> Result<()> {
    let (service, clock) = create_test_service()?;

    service.log_weight(70.2)?;
    service.log_weight(70.6)?;
    assert_eq!(service.list_weights().len(), 1);
    assert_eq!(service.list_weights()[0].weight, 70.6);

    clock.advance(Duration::days(1));
    service.log_weight(70.9)?;
    let weights = service.list_weights();
    assert_eq!(weights.len(), 2);
    assert_eq!(weights[0].date, ymd(2024, 6, 3));

    let summary = service.progress_summary();
    assert_eq!(summary.weight.current_weight, 70.9);
    assert!((summary.weight.weight_change - 5.9).abs() < 1e-9);
    assert!((summary.weight.weight_to_target - (-0.9)).abs() < 1e-9);

    assert_eq!(service.log_weight(0.0), Err(InputError::InvalidWeight(0.0)));
    Ok(())
}

#[test]
fn test_profile_updates_keep_other_fields() -> Result<()> {
    let (service, _clock) = create_test_service()?;

    service.set_target_weight(75.0)?;
    service.set_starting_weight(68.0)?;
    let profile = service.user_profile();
    assert_eq!(profile.target_weight, 75.0);
    assert_eq!(profile.starting_weight, 68.0);
    assert_eq!(profile.current_weight, 65.0);
    assert_eq!(profile.nutrition_targets.protein, 145.0);

    assert!(service.set_target_weight(-1.0).is_err());
    assert_eq!(service.user_profile().target_weight, 75.0);
    Ok(())
}

#[test]
fn test_nutrition_is_tracked_per_day() -> Result<()> {
    let (service, clock) = create_test_service()?;

    service.add_quick_meal("Chicken Breast")?;
    service.add_quick_meal("rice (100g)")?;
    let today = service.today_nutrition();
    assert_eq!(today.calories, 361.0);
    assert!((today.protein - 45.7).abs() < 1e-9);

    service.set_macro(Macro::Fats, 20.0)?;
    assert_eq!(service.today_nutrition().fats, 20.0);
    assert!(matches!(
        service.set_macro(Macro::Carbs, -5.0),
        Err(InputError::InvalidMacroValue { .. })
    ));
    assert!(matches!(service.add_quick_meal("Pizza"), Err(InputError::UnknownMeal(_))));

    let bad = NutritionData {
        calories: -500.0,
        protein: f64::NAN,
        ..Default::default()
    };
    assert!(matches!(service.add_meal(bad), Err(InputError::InvalidMacroValue { .. })));
    assert_eq!(service.today_nutrition().calories, 361.0);

    clock.advance(Duration::days(1));
    assert_eq!(service.today_nutrition().calories, 0.0);

    clock.set(sunday_morning());
    service.reset_today_nutrition();
    assert_eq!(service.today_nutrition().calories, 0.0);
    Ok(())
}

#[test]
fn test_history_stats_and_delete() -> Result<()> {
    let (service, _clock) = create_test_service()?;
    let unfinished = WorkoutSession::new("Lower", &[], Utc.with_ymd_and_hms(2024, 5, 27, 9, 0, 0).unwrap());
    let history = vec![
        finished_session("Upper", Utc.with_ymd_and_hms(2024, 5, 26, 9, 0, 0).unwrap(), 60),
        unfinished,
        finished_session("Upper", Utc.with_ymd_and_hms(2024, 5, 30, 9, 0, 0).unwrap(), 45),
    ];
    service.storage.save_workout_history(&history);

    let sorted = service.workout_history();
    assert_eq!(sorted[0].date, ymd(2024, 5, 30));
    assert_eq!(sorted[2].date, ymd(2024, 5, 26));

    // (60 + 45) / 3 sessions
    let stats = service.progress_summary().workouts;
    assert_eq!(stats.total_workouts, 3);
    assert_eq!(stats.avg_duration_minutes, 35);

    assert!(service.delete_workout(ymd(2024, 5, 27)));
    assert!(!service.delete_workout(ymd(2024, 5, 27)));
    assert_eq!(service.workout_history().len(), 2);
    Ok(())
}
