use clap::{Args, Parser, Subcommand, ValueEnum};

use gym_companion::clients::gym::ResourceKind;
use gym_companion::clients::models::requests::HealthPeriod;

/// Browse the gym catalogue and run timed workouts from the terminal.
#[derive(Parser, Debug)]
#[command(name = "gym-companion")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List categories, exercises or meals page by page
    Browse(BrowseArgs),
    /// Show a single category, exercise or meal
    Show {
        #[arg(value_enum)]
        resource: Resource,
        id: u64,
    },
    /// Run the countdown for an exercise and record it as a workout plan
    Train {
        exercise_id: u64,
    },
    /// Show the summary of a workout plan
    Result {
        workout_plan_id: u64,
    },
    /// Meals logged for a day
    Nutrition {
        #[command(subcommand)]
        command: NutritionCommand,
    },
    /// Daily health metrics
    Health {
        #[command(subcommand)]
        command: HealthCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum NutritionCommand {
    /// List the log with macro totals (defaults to today)
    List {
        #[arg(long)]
        date: Option<String>,
    },
    /// Log a meal
    Add {
        meal_id: u64,
        #[arg(long, default_value = "breakfast")]
        meal_type: String,
        #[arg(long, default_value = "08:00")]
        time: String,
        #[arg(long)]
        date: Option<String>,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum HealthCommand {
    /// Metrics for a period
    Show {
        #[arg(long, value_enum, default_value = "today")]
        period: Period,
        #[arg(long)]
        date: Option<String>,
    },
    /// Day by day metrics for the current week
    Week,
    /// Record today's metrics
    Add(HealthArgs),
    /// Overwrite today's metrics
    Update(HealthArgs),
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Steps walked
    #[arg(long)]
    pub walk: u32,
    #[arg(long)]
    pub calories: u32,
    #[arg(long)]
    pub heart_rate: u32,
    /// Sleep, e.g. "7h30"
    #[arg(long)]
    pub sleep: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Period {
    Today,
    Week,
    Month,
}

impl From<Period> for HealthPeriod {
    fn from(period: Period) -> Self {
        match period {
            Period::Today => HealthPeriod::Today,
            Period::Week => HealthPeriod::Week,
            Period::Month => HealthPeriod::Month,
        }
    }
}

#[derive(Args, Debug)]
pub struct BrowseArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    #[arg(short, long, default_value = "")]
    pub keyword: String,

    /// Only exercises of this category
    #[arg(long)]
    pub category_id: Option<u64>,

    #[arg(short, long, default_value_t = 6)]
    pub limit: u32,

    /// How many pages to load at most
    #[arg(short, long, default_value_t = 1)]
    pub pages: u32,

    /// Ask the server for the total count and stop paging at it
    #[arg(long)]
    pub with_total: bool,

    /// Jump straight to this page (0-based) instead of paging through
    #[arg(long, conflicts_with = "pages")]
    pub page: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Resource {
    Categories,
    Exercises,
    Meals,
}

impl From<Resource> for ResourceKind {
    fn from(resource: Resource) -> Self {
        match resource {
            Resource::Categories => ResourceKind::Categories,
            Resource::Exercises => ResourceKind::Exercises,
            Resource::Meals => ResourceKind::Meals,
        }
    }
}
