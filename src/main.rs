use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use gym_companion::clients::gym::{GymClient, ResourceKind};
use gym_companion::clients::models::requests::{CreateNutrition, HealthDataUpsert};
use gym_companion::clients::models::responses::{Category, Exercise, HealthData, Meal};
use gym_companion::clients::token::StaticToken;
use gym_companion::config::Config;
use gym_companion::services::media::youtube_embed_url;
use gym_companion::services::pagination::{LoadOutcome, PaginatedCollection};
use gym_companion::services::sources::{self, ResourceSource};
use gym_companion::services::summary::{NutritionTotals, WorkoutSummary, format_clock, week_dates};
use gym_companion::services::training::{TrainingSession, today};
use gym_companion::services::workout_session::{SessionState, WorkoutSession};

use crate::cli::{BrowseArgs, Cli, Commands, HealthArgs, HealthCommand, NutritionCommand};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from_env()?;
    let tokens = Arc::new(StaticToken::new(config.gym_api_token.clone()));
    let client = GymClient::new(&config, tokens)?;

    match cli.command {
        Commands::Browse(args) => browse(client, args).await,
        Commands::Show { resource, id } => show(&client, resource.into(), id).await,
        Commands::Train { exercise_id } => train(client, &config, exercise_id).await,
        Commands::Result { workout_plan_id } => show_result(&client, workout_plan_id).await,
        Commands::Nutrition { command } => nutrition(&client, &config, command).await,
        Commands::Health { command } => health(&client, &config, command).await,
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .compact()
        .init();
}

async fn browse(client: GymClient, args: BrowseArgs) -> anyhow::Result<()> {
    match ResourceKind::from(args.resource) {
        ResourceKind::Categories => {
            list_pages(sources::categories(client), &args, |c: &Category| {
                format!("#{} {}", c.id, c.name)
            })
            .await
        }
        ResourceKind::Exercises => {
            list_pages(sources::exercises(client), &args, |e: &Exercise| {
                format!(
                    "#{} {} ({} min, {} kcal, {})",
                    e.id,
                    e.name,
                    e.duration_minutes(),
                    e.calories.as_deref().unwrap_or("?"),
                    e.level.as_deref().unwrap_or("-")
                )
            })
            .await
        }
        ResourceKind::Meals => {
            list_pages(sources::meals(client), &args, |m: &Meal| {
                format!(
                    "#{} {} ({} kcal)",
                    m.id,
                    m.name,
                    m.calories.as_deref().unwrap_or("?")
                )
            })
            .await
        }
    }
}

async fn list_pages<T>(
    source: ResourceSource<T>,
    args: &BrowseArgs,
    describe: impl Fn(&T) -> String,
) -> anyhow::Result<()>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    let kind = source.kind();
    let collection = PaginatedCollection::new(source, args.limit);

    if args.with_total {
        match collection.source().client().count(kind).await {
            Ok(total) => collection.set_total(total),
            Err(e) => tracing::warn!(error = %e, "browse.count_failed"),
        }
    }

    collection
        .set_filter(args.keyword.clone(), args.category_id)
        .await;
    if let Some(page) = args.page.filter(|page| *page > 0) {
        if collection.load_page(page).await == LoadOutcome::Skipped {
            println!("Page {} is past the last page", page);
        }
    } else {
        for _ in 1..args.pages {
            if !collection.has_more() {
                break;
            }
            collection.load_next_page().await;
        }
    }

    let state = collection.snapshot();
    if let Some(error) = state.error {
        anyhow::bail!(error);
    }
    if state.items.is_empty() {
        println!("No {} available", kind.array_key());
        return Ok(());
    }
    for item in &state.items {
        println!("{}", describe(item));
    }
    if state.has_more {
        println!("... more available (page {} loaded)", state.current_page);
    }
    Ok(())
}

async fn train(client: GymClient, config: &Config, exercise_id: u64) -> anyhow::Result<()> {
    let exercise = client
        .get_exercise(exercise_id)
        .await
        .context("Error fetching exercise")?
        .context("No exercise data found")?;

    println!("{}", exercise.name);
    if let Some(description) = &exercise.description {
        println!("{}", description);
    }
    match exercise.video_url.as_deref().and_then(youtube_embed_url) {
        Some(embed) => println!("Video: {}", embed),
        None => println!("No video available"),
    }

    let (result_tx, mut result_rx) = tokio::sync::mpsc::unbounded_channel();
    let navigator = Arc::new(move |workout_plan_id: u64| {
        let _ = result_tx.send(workout_plan_id);
    });
    let training = TrainingSession::new(
        WorkoutSession::for_exercise(&exercise),
        Arc::new(client.clone()),
        navigator,
        config.user_id,
    );

    training.start().await?;
    match training.error() {
        Some(error) => println!("{}", error),
        None => println!("Workout plan added successfully! (p = pause, c = continue)"),
    }

    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut display = tokio::time::interval(Duration::from_secs(1));

    let workout_plan_id = loop {
        tokio::select! {
            Some(workout_plan_id) = result_rx.recv() => break workout_plan_id,
            Ok(Some(line)) = commands.next_line() => {
                let outcome = match line.trim() {
                    "p" | "pause" => training.pause(),
                    "c" | "continue" | "r" | "resume" => training.resume(),
                    _ => Ok(()),
                };
                if let Err(e) = outcome {
                    println!("{}", e);
                }
            }
            _ = display.tick() => {
                println!("{}", format_clock(training.remaining_seconds()));
                if training.state() == SessionState::Running
                    && training.remaining_seconds() == 0
                    && !training.is_ticking()
                {
                    training.teardown();
                    anyhow::bail!(training
                        .error()
                        .unwrap_or_else(|| "Failed to navigate to result screen".to_string()));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                training.teardown();
                println!("Workout abandoned");
                return Ok(());
            }
        }
    };

    show_result(&client, workout_plan_id).await?;
    client
        .complete_workout_plan(workout_plan_id)
        .await
        .context("Error saving workout")?;
    println!("Workout marked as completed!");
    Ok(())
}

async fn show_result(client: &GymClient, workout_plan_id: u64) -> anyhow::Result<()> {
    let detail = client
        .get_workout_plan(workout_plan_id)
        .await
        .context("Error fetching workout plan data")?
        .context("Failed to fetch workout plan data")?;

    println!("{}", WorkoutSummary::from_detail(&detail).render());
    Ok(())
}

async fn show(client: &GymClient, kind: ResourceKind, id: u64) -> anyhow::Result<()> {
    let line = match kind {
        ResourceKind::Categories => client
            .get_category(id)
            .await?
            .map(|c| format!("#{} {} {}", c.id, c.name, c.image_url.unwrap_or_default())),
        ResourceKind::Exercises => client.get_exercise(id).await?.map(|e| {
            format!(
                "#{} {} ({} min)\n{}",
                e.id,
                e.name,
                e.duration_minutes(),
                e.description.unwrap_or_default()
            )
        }),
        ResourceKind::Meals => client.get_meal(id).await?.map(|m| {
            format!(
                "#{} {} ({} kcal)\n{}",
                m.id,
                m.name,
                m.calories.as_deref().unwrap_or("?"),
                m.description.unwrap_or_default()
            )
        }),
    };

    match line {
        Some(line) => println!("{}", line),
        None => println!("No {} with id {}", kind.array_key(), id),
    }
    Ok(())
}

async fn nutrition(client: &GymClient, config: &Config, command: NutritionCommand) -> anyhow::Result<()> {
    match command {
        NutritionCommand::List { date } => {
            let date = date.unwrap_or_else(today);
            let entries = client
                .list_nutrition(config.user_id, &date)
                .await
                .context("Error fetching nutrition data")?;
            if entries.is_empty() {
                println!("No nutrition data found for {}", date);
                return Ok(());
            }
            for entry in &entries {
                let meal = entry.meal.as_ref();
                println!(
                    "#{} {} {} ({} kcal)",
                    entry.id,
                    entry.meal_type.as_deref().unwrap_or("-"),
                    meal.and_then(|m| m.name.as_deref()).unwrap_or("Unknown meal"),
                    meal.and_then(|m| m.calories).unwrap_or(0.0)
                );
            }
            println!("{}", NutritionTotals::from_entries(&entries).render());
        }
        NutritionCommand::Add {
            meal_id,
            meal_type,
            time,
            date,
        } => {
            client
                .create_nutrition(&CreateNutrition {
                    user_id: config.user_id,
                    meal_type: meal_type.to_lowercase(),
                    meal_id,
                    meal_time: time,
                    created_at: date.unwrap_or_else(today),
                })
                .await
                .context("Error creating nutrition plan")?;
            println!("Nutrition plan created successfully!");
        }
        NutritionCommand::Delete { id } => {
            client
                .delete_nutrition(id)
                .await
                .context("Failed to delete meal")?;
            println!("Meal removed from the log");
        }
    }
    Ok(())
}

async fn health(client: &GymClient, config: &Config, command: HealthCommand) -> anyhow::Result<()> {
    match command {
        HealthCommand::Show { period, date } => {
            let data = client
                .health_data(config.user_id, Some(period.into()), date.as_deref())
                .await
                .context("Failed to fetch health data")?;
            println!("{}", describe_health(data.as_ref()));
        }
        HealthCommand::Week => {
            let current = chrono::Utc::now().date_naive();
            for (label, date) in week_dates(current) {
                let data = client
                    .health_data(config.user_id, None, Some(&date))
                    .await
                    .with_context(|| format!("Failed to fetch health data for {}", date))?;
                println!("{} {}: {}", label, date, describe_health(data.as_ref()));
            }
        }
        HealthCommand::Add(args) => {
            client
                .add_health_data(&health_body(config, args, Some(today())))
                .await
                .context("Failed to add health data")?;
            println!("Health data added successfully!");
        }
        HealthCommand::Update(args) => {
            client
                .update_health_data(config.user_id, &health_body(config, args, None))
                .await
                .context("Failed to update health data")?;
            println!("Health data updated successfully!");
        }
    }
    Ok(())
}

fn health_body(config: &Config, args: HealthArgs, date: Option<String>) -> HealthDataUpsert {
    HealthDataUpsert {
        user_id: config.user_id,
        walk: args.walk,
        calories: args.calories,
        heart_rate: args.heart_rate,
        sleep: args.sleep,
        date,
    }
}

fn describe_health(data: Option<&HealthData>) -> String {
    match data {
        Some(data) => format!(
            "{} steps, {} kcal, {} bpm, sleep {}",
            data.walk.unwrap_or(0.0),
            data.calories.unwrap_or(0.0),
            data.heart_rate.unwrap_or(0.0),
            data.sleep.as_deref().unwrap_or("-")
        ),
        None => "no data".to_string(),
    }
}
