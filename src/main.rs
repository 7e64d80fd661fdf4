//src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::fs::File;
use std::io::{self, stdout, Write};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use fitness_tracker_lib::{
    plan, timer, AppService, DayOfWeek, Exercise, ExerciseEdit, LogNotifier, Macro, NutritionData,
    RestTimer, SessionEngine, SetUpdate, SqliteStore, TickOutcome, Units, WorkoutSession,
};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli_args = cli::parse_args();

    // --- Completion generation does not need the store ---
    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();
        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    init_logging(cli_args.verbose);

    let mut service = AppService::initialize().context("Failed to initialize application service")?;
    let header_color = service.config.theme.table_header_color();

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Today { day } => {
            let day = day.as_deref().map(DayOfWeek::parse).transpose()?;
            print_dashboard(&service, day, header_color);
        }
        cli::Commands::Plan(command) => handle_plan(&service, command, header_color)?,
        cli::Commands::Workout(command) => handle_workout(&service, command, header_color)?,
        cli::Commands::Rest { seconds } => {
            let mut engine = service.session_engine();
            let current = engine.resume().and_then(WorkoutSession::current_exercise).cloned();
            let (name, rest) = match (seconds, current) {
                (Some(seconds), current) => (current.map_or_else(|| "your workout".to_string(), |ex| ex.name), seconds),
                (None, Some(ex)) => (ex.name, ex.rest),
                (None, None) => bail!("No workout in progress. Pass the number of seconds to rest."),
            };
            run_rest_timer(&name, rest, service.config.rest_notifications)?;
        }
        cli::Commands::Nutrition(command) => handle_nutrition(&service, command, header_color)?,
        cli::Commands::Weight(command) => match command {
            cli::WeightCommands::Log { weight } => {
                if !service.log_weight(weight)? {
                    bail!("Weight log could not be updated, entry not recorded");
                }
                println!(
                    "Logged {weight:.1} {} for {}.",
                    service.config.units.weight_label(),
                    service.today()
                );
            }
            cli::WeightCommands::Show { limit } => {
                let entries = service.list_weights();
                if entries.is_empty() {
                    println!("No weight entries yet.");
                } else {
                    print_weight_table(&entries[..entries.len().min(limit)], service.config.units, header_color);
                }
            }
        },
        cli::Commands::Profile(command) => match command {
            cli::ProfileCommands::Show => print_profile(&service, header_color),
            cli::ProfileCommands::SetTarget { weight } => {
                service.set_target_weight(weight)?;
                println!("Target weight set to {weight:.1} {}.", service.config.units.weight_label());
            }
            cli::ProfileCommands::SetStarting { weight } => {
                service.set_starting_weight(weight)?;
                println!("Starting weight set to {weight:.1} {}.", service.config.units.weight_label());
            }
        },
        cli::Commands::History(command) => handle_history(&service, command, header_color)?,
        cli::Commands::Stats { json } => {
            let summary = service.progress_summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let unit = service.config.units.weight_label();
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec![
                        Cell::new("Statistic").fg(header_color),
                        Cell::new("Value").fg(header_color),
                    ]);
                table.add_row(vec![
                    Cell::new("Total Workouts"),
                    Cell::new(summary.workouts.total_workouts),
                ]);
                table.add_row(vec![
                    Cell::new("Avg Duration"),
                    Cell::new(format!("{} min", summary.workouts.avg_duration_minutes)),
                ]);
                table.add_row(vec![
                    Cell::new("Current Weight"),
                    Cell::new(format!("{:.1} {unit}", summary.weight.current_weight)),
                ]);
                table.add_row(vec![
                    Cell::new("Change Since Start"),
                    Cell::new(format!("{:+.1} {unit}", summary.weight.weight_change)),
                ]);
                table.add_row(vec![
                    Cell::new("To Target"),
                    Cell::new(format!("{:.1} {unit}", summary.weight.weight_to_target)),
                ]);
                println!("{table}");
            }
        }
        cli::Commands::Config(command) => match command {
            cli::ConfigCommands::Show => {
                println!("Config file: {}", service.get_config_path().display());
                println!("Store file:  {}", service.get_store_path().display());
                println!("Units: {:?}", service.config.units);
                println!("Rest notifications: {}", service.config.rest_notifications);
                println!("Header color: {}", service.config.theme.header_color);
            }
            cli::ConfigCommands::SetUnits { units } => {
                let units = match units {
                    cli::UnitsCli::Metric => Units::Metric,
                    cli::UnitsCli::Imperial => Units::Imperial,
                };
                service.set_units(units)?;
                println!("Units set to {units:?}.");
            }
            cli::ConfigCommands::SetColor { color } => {
                service.set_header_color(&color)?;
                println!("Header color set to {}.", service.config.theme.header_color);
            }
            cli::ConfigCommands::SetNotifications { enabled } => {
                service.set_rest_notifications(enabled)?;
                println!("Rest notifications {}.", if enabled { "enabled" } else { "disabled" });
            }
        },
        cli::Commands::StorePath => {
            println!("{}", service.get_store_path().display());
        }
    }

    Ok(())
}

/// Converts a 1-based position from the command line to an index.
fn to_index(position: usize, what: &str) -> Result<usize> {
    match position.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("{what} positions start at 1"),
    }
}

fn parse_day(name: &str) -> Result<DayOfWeek> {
    Ok(DayOfWeek::parse(name)?)
}

// --- Plan ---

fn handle_plan(service: &AppService, command: cli::PlanCommands, header_color: Color) -> Result<()> {
    let mut manager = service.plan_manager();
    match command {
        cli::PlanCommands::Show { day } => match day {
            Some(day) => {
                let day = parse_day(&day)?;
                print_plan_day(day, manager.plan().day(day), header_color);
            }
            None => print_week_table(manager.plan(), service.today_day(), header_color),
        },
        cli::PlanCommands::Swap { day_a, day_b } => {
            let (a, b) = (parse_day(&day_a)?, parse_day(&day_b)?);
            manager.save(plan::swap_days(manager.plan(), a, b));
            println!("Swapped {a} and {b}.");
        }
        cli::PlanCommands::Move {
            from_day,
            from_position,
            to_day,
            to_position,
        } => {
            let (from, to) = (parse_day(&from_day)?, parse_day(&to_day)?);
            let from_index = to_index(from_position, "Exercise")?;
            let dest_index = to_index(to_position, "Exercise")?;
            manager.apply(|p| plan::move_exercise(p, from, from_index, to, dest_index))?;
            println!("Moved exercise {from_position} of {from} to position {to_position} of {to}.");
        }
        cli::PlanCommands::Delete { day, position } => {
            let day = parse_day(&day)?;
            let index = to_index(position, "Exercise")?;
            let name = manager.plan().day(day).exercises.get(index).map(|e| e.name.clone());
            manager.apply(|p| plan::delete_exercise(p, day, index))?;
            println!("Removed '{}' from {day}.", name.unwrap_or_default());
        }
        cli::PlanCommands::Edit { day, position, fields } => {
            let day = parse_day(&day)?;
            let index = to_index(position, "Exercise")?;
            let edit = ExerciseEdit {
                name: fields.name,
                sets: fields.sets,
                reps: fields.reps,
                rest: fields.rest,
            };
            manager.apply(|p| {
                let current = p.day(day).exercises.get(index).cloned().unwrap_or_else(|| Exercise::new("", 1, "", 0));
                plan::edit_exercise(p, day, index, edit.apply_to(&current))
            })?;
            print_plan_day(day, manager.plan().day(day), header_color);
        }
        cli::PlanCommands::Add {
            day,
            name,
            sets,
            reps,
            rest,
        } => {
            let day = parse_day(&day)?;
            let edit = ExerciseEdit {
                name: Some(name),
                sets: Some(sets),
                reps: Some(reps),
                rest: Some(rest),
            };
            let exercise = edit.apply_to(&Exercise::new("", 1, "", 0));
            if exercise.name.is_empty() {
                bail!("Exercise name cannot be empty");
            }
            manager.save(plan::add_exercise(manager.plan(), day, exercise));
            print_plan_day(day, manager.plan().day(day), header_color);
        }
        cli::PlanCommands::Reset { day } => match day {
            Some(day) => {
                let day = parse_day(&day)?;
                manager.reset_day(day);
                println!("{day} restored to the default plan.");
            }
            None => {
                manager.reset_all();
                println!("Training plan restored to defaults.");
            }
        },
    }
    Ok(())
}

// --- Workout ---

fn require_session<'a>(engine: &'a mut SessionEngine<'_, SqliteStore>) -> Result<&'a WorkoutSession> {
    engine
        .resume()
        .context("No workout in progress today. Start one with 'workout start'.")
}

fn handle_workout(service: &AppService, command: cli::WorkoutCommands, header_color: Color) -> Result<()> {
    let mut engine = service.session_engine();
    match command {
        cli::WorkoutCommands::Start { day } => {
            let day = match day {
                Some(day) => parse_day(&day)?,
                None => service.today_day(),
            };
            let plan = service.training_plan();
            match engine.start_for_day(&plan, day) {
                Some(session) => print_session(session, service.config.units, header_color),
                None => println!("{day} is a rest day ({}). Enjoy it.", plan.day(day).name),
            }
        }
        cli::WorkoutCommands::Status => {
            let session = require_session(&mut engine)?;
            print_session(session, service.config.units, header_color);
        }
        cli::WorkoutCommands::Set {
            exercise,
            set,
            weight,
            reps,
            done,
            undo,
        } => {
            let (exercise, set) = (to_index(exercise, "Exercise")?, to_index(set, "Set")?);
            let update = SetUpdate {
                weight,
                reps,
                completed: if done {
                    Some(true)
                } else if undo {
                    Some(false)
                } else {
                    None
                },
            };
            if update.is_empty() {
                bail!("Nothing to update. Pass --weight, --reps, --done or --undo.");
            }
            require_session(&mut engine)?;
            if !engine.update_set(exercise, set, update) {
                bail!("Set not updated. Check the positions and that weight/reps are numbers.");
            }
            print_current_exercise(&engine, service.config.units, header_color);
        }
        cli::WorkoutCommands::Complete { exercise, set } => {
            let (exercise, set) = (to_index(exercise, "Exercise")?, to_index(set, "Set")?);
            require_session(&mut engine)?;
            if !engine.complete_set(exercise, set) {
                bail!("No such set in the current workout.");
            }
            print_current_exercise(&engine, service.config.units, header_color);
            if let Some(ex) = engine.session().and_then(|s| s.exercises.get(exercise)) {
                println!("Rest {} before the next set ('rest' starts the timer).", timer::format_seconds(ex.rest));
            }
        }
        cli::WorkoutCommands::Goto { exercise } => {
            let index = to_index(exercise, "Exercise")?;
            require_session(&mut engine)?;
            engine.set_current_exercise(index);
            print_current_exercise(&engine, service.config.units, header_color);
        }
        cli::WorkoutCommands::Next => {
            require_session(&mut engine)?;
            if !engine.next_exercise() {
                println!("Already at the last exercise.");
            }
            print_current_exercise(&engine, service.config.units, header_color);
        }
        cli::WorkoutCommands::Prev => {
            require_session(&mut engine)?;
            if !engine.previous_exercise() {
                println!("Already at the first exercise.");
            }
            print_current_exercise(&engine, service.config.units, header_color);
        }
        cli::WorkoutCommands::Finish => {
            require_session(&mut engine)?;
            let session = engine
                .finish()
                .context("Workout history could not be updated. The workout is still in progress.")?;
            let (done, total) = session.progress();
            println!(
                "Workout '{}' saved: {done}/{total} sets in {} min.",
                session.workout_name,
                session.duration_minutes().unwrap_or(0)
            );
        }
        cli::WorkoutCommands::Cancel => {
            require_session(&mut engine)?;
            engine.cancel();
            println!("Workout cancelled. Nothing was saved to history.");
        }
    }
    Ok(())
}

fn run_rest_timer(exercise_name: &str, seconds: u32, ring_bell: bool) -> Result<()> {
    if seconds == 0 {
        println!("No rest needed.");
        return Ok(());
    }
    let notifier = LogNotifier;
    let mut rest = RestTimer::new(exercise_name, seconds, &notifier);
    rest.start();
    print!("Rest: {}", timer::format_seconds(rest.remaining()));
    stdout().flush()?;
    loop {
        thread::sleep(Duration::from_secs(1));
        match rest.tick() {
            TickOutcome::Running { remaining } => {
                print!("\rRest: {}  ", timer::format_seconds(remaining));
                stdout().flush()?;
            }
            TickOutcome::Completed => {
                let bell = if ring_bell { "\x07" } else { "" };
                println!("\r{bell}{} Time to continue with {exercise_name}", timer::REST_COMPLETE_TITLE);
                break;
            }
            TickOutcome::Idle => break,
        }
    }
    Ok(())
}

// --- Nutrition ---

fn handle_nutrition(service: &AppService, command: cli::NutritionCommands, header_color: Color) -> Result<()> {
    match command {
        cli::NutritionCommands::Show => {
            let dashboard = service.dashboard(None);
            print_nutrition(&dashboard.nutrition, &dashboard.nutrition_targets, header_color);
        }
        cli::NutritionCommands::Meals => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    Cell::new("Meal").fg(header_color),
                    Cell::new("Calories").fg(header_color),
                    Cell::new("Protein (g)").fg(header_color),
                    Cell::new("Carbs (g)").fg(header_color),
                    Cell::new("Fats (g)").fg(header_color),
                ]);
            for meal in &fitness_tracker_lib::nutrition::QUICK_MEALS {
                table.add_row(vec![
                    Cell::new(meal.name),
                    Cell::new(meal.macros.calories),
                    Cell::new(meal.macros.protein),
                    Cell::new(meal.macros.carbs),
                    Cell::new(meal.macros.fats),
                ]);
            }
            println!("{table}");
        }
        cli::NutritionCommands::Meal { name } => {
            let totals = service
                .add_quick_meal(&name)?
                .context("Nutrition log could not be updated, meal not recorded")?;
            println!("Added {}. Today: {:.0} kcal.", name.trim(), totals.calories);
        }
        cli::NutritionCommands::Add {
            calories,
            protein,
            carbs,
            fats,
        } => {
            let macros = NutritionData {
                calories,
                protein,
                carbs,
                fats,
            };
            let totals = service
                .add_meal(macros)?
                .context("Nutrition log could not be updated, meal not recorded")?;
            println!("Added. Today: {:.0} kcal.", totals.calories);
        }
        cli::NutritionCommands::Set { macro_, value } => {
            let macro_ = match macro_ {
                cli::MacroCli::Calories => Macro::Calories,
                cli::MacroCli::Protein => Macro::Protein,
                cli::MacroCli::Carbs => Macro::Carbs,
                cli::MacroCli::Fats => Macro::Fats,
            };
            service
                .set_macro(macro_, value)?
                .context("Nutrition log could not be updated")?;
            println!("Today's {macro_} set to {value}.");
        }
        cli::NutritionCommands::Reset => {
            if !service.reset_today_nutrition() {
                bail!("Nutrition log could not be updated");
            }
            println!("Today's nutrition reset.");
        }
    }
    Ok(())
}

// --- History ---

fn handle_history(service: &AppService, command: cli::HistoryCommands, header_color: Color) -> Result<()> {
    match command {
        cli::HistoryCommands::List { limit } => {
            let history = service.workout_history();
            if history.is_empty() {
                println!("No finished workouts yet.");
                return Ok(());
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    Cell::new("Date").fg(header_color),
                    Cell::new("Workout").fg(header_color),
                    Cell::new("Sets Done").fg(header_color),
                    Cell::new("Duration (min)").fg(header_color),
                ]);
            for session in history.iter().take(limit) {
                let (done, total) = session.progress();
                table.add_row(vec![
                    Cell::new(session.date),
                    Cell::new(&session.workout_name),
                    Cell::new(format!("{done}/{total}")),
                    Cell::new(session.duration_minutes().map_or("-".to_string(), |m| m.to_string())),
                ]);
            }
            println!("{table}");
        }
        cli::HistoryCommands::Show { date } => {
            let Some(session) = service.workout_history().into_iter().find(|s| s.date == date) else {
                bail!("No workout recorded on {date}");
            };
            print_session(&session, service.config.units, header_color);
        }
        cli::HistoryCommands::Delete { date } => {
            if service.delete_workout(date) {
                println!("Deleted the workout on {date}.");
            } else {
                bail!("No workout recorded on {date}");
            }
        }
        cli::HistoryCommands::Export { output } => {
            let history = service.workout_history();
            match output {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("Failed to create {path:?}"))?;
                    write_history_csv(file, &history, service.config.units)?;
                    println!("Exported {} workouts to {}.", history.len(), path.display());
                }
                None => write_history_csv(io::stdout(), &history, service.config.units)?,
            }
        }
    }
    Ok(())
}

fn write_history_csv<W: Write>(writer: W, history: &[WorkoutSession], units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let weight_header = format!("Weight_{}", units.weight_label());
    writer.write_record([
        "Date",
        "Workout",
        "Exercise",
        "Set",
        weight_header.as_str(),
        "Reps",
        "Completed",
    ])?;
    for session in history {
        for exercise in &session.exercises {
            for (i, set) in exercise.sets.iter().enumerate() {
                writer.write_record([
                    session.date.to_string(),
                    session.workout_name.clone(),
                    exercise.name.clone(),
                    (i + 1).to_string(),
                    set.weight.clone(),
                    set.reps.clone(),
                    set.completed.to_string(),
                ])?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

// --- Table Printing Functions ---

fn print_dashboard(service: &AppService, day: Option<DayOfWeek>, header_color: Color) {
    let dashboard = service.dashboard(day);
    let units = service.config.units;

    println!("{} ({})", dashboard.day, dashboard.date);
    print_plan_day(dashboard.day, &dashboard.workout, header_color);
    println!(
        "This week: {}/{} workouts",
        dashboard.weekly_progress.completed, dashboard.weekly_progress.total
    );
    print_nutrition(&dashboard.nutrition, &dashboard.nutrition_targets, header_color);
    println!("Current weight: {:.1} {}", dashboard.current_weight, units.weight_label());
}

fn print_week_table(plan: &fitness_tracker_lib::TrainingPlan, today: DayOfWeek, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Day").fg(header_color),
            Cell::new("Workout").fg(header_color),
            Cell::new("Type").fg(header_color),
            Cell::new("Duration").fg(header_color),
            Cell::new("Exercises").fg(header_color),
        ]);
    for (day, workout) in plan.days() {
        let day_cell = if day == today {
            Cell::new(day).add_attribute(Attribute::Bold)
        } else {
            Cell::new(day)
        };
        table.add_row(vec![
            day_cell,
            Cell::new(&workout.name),
            Cell::new(format!("{:?}", workout.type_)),
            Cell::new(&workout.duration),
            Cell::new(workout.exercises.len()),
        ]);
    }
    println!("{table}");
}

fn print_plan_day(day: DayOfWeek, workout: &fitness_tracker_lib::WorkoutDay, header_color: Color) {
    println!("{day}: {} ({})", workout.name, workout.duration);
    if workout.exercises.is_empty() {
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Sets").fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Rest").fg(header_color),
        ]);
    for (i, exercise) in workout.exercises.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&exercise.name),
            Cell::new(exercise.sets),
            Cell::new(&exercise.reps),
            Cell::new(timer::format_seconds(exercise.rest)),
        ]);
    }
    println!("{table}");
}

fn print_nutrition(consumed: &NutritionData, targets: &NutritionData, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Macro").fg(header_color),
            Cell::new("Consumed").fg(header_color),
            Cell::new("Target").fg(header_color),
        ]);
    for (label, macro_) in [
        ("Calories", Macro::Calories),
        ("Protein (g)", Macro::Protein),
        ("Carbs (g)", Macro::Carbs),
        ("Fats (g)", Macro::Fats),
    ] {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format!("{:.0}", consumed.get(macro_))),
            Cell::new(format!("{:.0}", targets.get(macro_))),
        ]);
    }
    println!("{table}");
}

fn print_weight_table(entries: &[fitness_tracker_lib::WeightEntry], units: Units, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Date").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_label())).fg(header_color),
        ]);
    for entry in entries {
        table.add_row(vec![Cell::new(entry.date), Cell::new(format!("{:.1}", entry.weight))]);
    }
    println!("{table}");
}

fn print_profile(service: &AppService, header_color: Color) {
    let profile = service.user_profile();
    let trend = service.progress_summary().weight;
    let unit = service.config.units.weight_label();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("Profile").fg(header_color), Cell::new("Value").fg(header_color)]);
    if let Some(name) = &profile.name {
        table.add_row(vec![Cell::new("Name"), Cell::new(name)]);
    }
    table.add_row(vec![Cell::new("Current Weight"), Cell::new(format!("{:.1} {unit}", trend.current_weight))]);
    table.add_row(vec![Cell::new("Starting Weight"), Cell::new(format!("{:.1} {unit}", profile.starting_weight))]);
    table.add_row(vec![Cell::new("Target Weight"), Cell::new(format!("{:.1} {unit}", profile.target_weight))]);
    table.add_row(vec![
        Cell::new("Daily Calories"),
        Cell::new(format!("{:.0}", profile.nutrition_targets.calories)),
    ]);
    println!("{table}");
}

fn print_session(session: &WorkoutSession, units: Units, header_color: Color) {
    let (done, total) = session.progress();
    println!("{} ({}): {done}/{total} sets done", session.workout_name, session.date);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Target").fg(header_color),
            Cell::new(format!("Sets ({} x reps)", units.weight_label())).fg(header_color),
        ]);
    for (i, exercise) in session.exercises.iter().enumerate() {
        let sets = exercise
            .sets
            .iter()
            .map(|s| {
                let mark = if s.completed { "✓" } else { "·" };
                if s.is_loggable() {
                    format!("{mark}{}x{}", s.weight, s.reps)
                } else {
                    mark.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        let number = if i == session.current_exercise_index {
            Cell::new(format!("> {}", i + 1)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(i + 1)
        };
        let name = if exercise.is_complete() {
            Cell::new(format!("{} ✓", exercise.name)).fg(Color::Green)
        } else {
            Cell::new(&exercise.name)
        };
        table.add_row(vec![
            number,
            name,
            Cell::new(format!("{} x {}", exercise.target_sets, exercise.target_reps)),
            Cell::new(sets),
        ]);
    }
    println!("{table}");
}

fn print_current_exercise(engine: &SessionEngine<'_, SqliteStore>, units: Units, header_color: Color) {
    let Some(session) = engine.session() else {
        return;
    };
    let Some(exercise) = session.current_exercise() else {
        println!("This workout has no exercises.");
        return;
    };
    println!(
        "Exercise {}/{}: {} ({} x {}, rest {})",
        session.current_exercise_index + 1,
        session.exercises.len(),
        exercise.name,
        exercise.target_sets,
        exercise.target_reps,
        timer::format_seconds(exercise.rest)
    );
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Set").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_label())).fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Done").fg(header_color),
        ]);
    for (i, set) in exercise.sets.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(if set.weight.is_empty() { "-" } else { set.weight.as_str() }),
            Cell::new(if set.reps.is_empty() { "-" } else { set.reps.as_str() }),
            Cell::new(if set.completed { "yes" } else { "" }),
        ]);
    }
    println!("{table}");
}
