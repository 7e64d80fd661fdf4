// src/cli.rs
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track your weekly training plan, workouts, nutrition and weight", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitsCli {
    Metric,
    Imperial,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MacroCli {
    Calories,
    Protein,
    Carbs,
    Fats,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Today's workout, weekly progress, nutrition and weight
    Today {
        /// Show another day of this week instead (e.g. "friday")
        day: Option<String>,
    },
    /// View and edit the weekly training plan
    #[command(subcommand)]
    Plan(PlanCommands),
    /// Run a workout session set by set
    #[command(subcommand)]
    Workout(WorkoutCommands),
    /// Count down a rest period
    Rest {
        /// Seconds to rest (defaults to the current exercise's rest time)
        seconds: Option<u32>,
    },
    /// Track daily calories and macros
    #[command(subcommand)]
    Nutrition(NutritionCommands),
    /// Log and list body weight
    #[command(subcommand)]
    Weight(WeightCommands),
    /// Target and starting weight
    #[command(subcommand)]
    Profile(ProfileCommands),
    /// Finished workouts
    #[command(subcommand)]
    History(HistoryCommands),
    /// Workout and weight statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Show the path to the data store file
    StorePath,
    /// Generate shell completion script
    #[command(name = "completion")]
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// Show the whole week or a single day
    Show { day: Option<String> },
    /// Exchange the workouts of two days
    Swap { day_a: String, day_b: String },
    /// Move an exercise (positions start at 1)
    Move {
        from_day: String,
        from_position: usize,
        to_day: String,
        to_position: usize,
    },
    /// Remove an exercise from a day
    Delete { day: String, position: usize },
    /// Change an exercise's name, sets, reps or rest
    Edit {
        day: String,
        position: usize,
        #[command(flatten)]
        fields: ExerciseFields,
    },
    /// Append an exercise to a day
    Add {
        day: String,
        name: String,
        #[arg(short, long, default_value_t = 3, allow_negative_numbers = true)]
        sets: i64,
        #[arg(short, long, default_value = "8-12")]
        reps: String,
        /// Rest between sets in seconds
        #[arg(long, default_value_t = 90, allow_negative_numbers = true)]
        rest: i64,
    },
    /// Restore the built-in plan (or just one day of it)
    Reset {
        #[arg(long)]
        day: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct ExerciseFields {
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long, allow_negative_numbers = true)]
    pub sets: Option<i64>,
    #[arg(short, long)]
    pub reps: Option<String>,
    /// Rest between sets in seconds
    #[arg(long, allow_negative_numbers = true)]
    pub rest: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum WorkoutCommands {
    /// Start today's workout (or resume it if already started)
    Start {
        /// Start another day's workout instead
        #[arg(long)]
        day: Option<String>,
    },
    /// Show the session in progress
    Status,
    /// Record weight/reps for a set (positions start at 1)
    Set {
        exercise: usize,
        set: usize,
        #[arg(short, long)]
        weight: Option<String>,
        #[arg(short, long)]
        reps: Option<String>,
        /// Mark the set as done
        #[arg(long, conflicts_with = "undo")]
        done: bool,
        /// Mark the set as not done
        #[arg(long)]
        undo: bool,
    },
    /// Mark a set as done
    Complete { exercise: usize, set: usize },
    /// Jump to an exercise
    Goto { exercise: usize },
    /// Go to the next exercise
    Next,
    /// Go to the previous exercise
    Prev,
    /// Finish and save the workout to history
    Finish,
    /// Discard the workout in progress
    Cancel,
}

#[derive(Subcommand, Debug)]
pub enum NutritionCommands {
    /// Today's totals against targets
    Show,
    /// List quick meals
    Meals,
    /// Add a quick meal by name (e.g. "Protein Shake")
    Meal { name: String },
    /// Add custom macros to today
    Add {
        #[arg(long, default_value_t = 0.0)]
        calories: f64,
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,
        #[arg(long, default_value_t = 0.0)]
        fats: f64,
    },
    /// Overwrite one of today's totals
    Set {
        #[arg(value_enum)]
        macro_: MacroCli,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Zero today's totals
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum WeightCommands {
    /// Record today's weight
    Log {
        #[arg(allow_negative_numbers = true)]
        weight: f64,
    },
    /// List logged weights, newest first
    Show {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    Show,
    SetTarget {
        #[arg(allow_negative_numbers = true)]
        weight: f64,
    },
    SetStarting {
        #[arg(allow_negative_numbers = true)]
        weight: f64,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List finished workouts, newest first
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Show every set of one workout
    Show { date: NaiveDate },
    /// Delete the workout on a date (YYYY-MM-DD)
    Delete { date: NaiveDate },
    /// Export every logged set as CSV
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Show,
    SetUnits {
        #[arg(value_enum)]
        units: UnitsCli,
    },
    SetColor { color: String },
    SetNotifications {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

// Used for completion generation
pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
