use chrono::{Datelike, Duration, NaiveDate};

use crate::clients::models::responses::{NutritionEntry, WorkoutPlanDetail};
use crate::services::training::today;

/// What the result view shows for a finished workout plan.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSummary {
    pub workout_plan_id: u64,
    pub exercise_name: String,
    pub total_minutes: f64,
    pub calories: f64,
    pub weight: f64,
    pub level: String,
    pub completed_date: String,
}

impl WorkoutSummary {
    pub fn from_detail(detail: &WorkoutPlanDetail) -> Self {
        let exercise = detail.exercise.as_ref();
        Self {
            workout_plan_id: detail.id,
            exercise_name: exercise
                .and_then(|e| e.name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Unknown Exercise".to_string()),
            total_minutes: detail.duration.unwrap_or(0.0),
            calories: exercise.and_then(|e| e.calories).unwrap_or(0.0),
            weight: detail.user.as_ref().and_then(|u| u.weight).unwrap_or(0.0),
            level: exercise
                .and_then(|e| e.level.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            completed_date: detail.date.clone().unwrap_or_else(today),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "RESULT\nWorkout: {}\nCompleted on {}\nTotal time: {} min\nTotal calories: {} kcal\nWeight: {} kg\nLevel: {}",
            self.exercise_name,
            self.completed_date,
            format_minutes(self.total_minutes),
            self.calories,
            self.weight,
            self.level,
        )
    }
}

/// Totals over one day's nutrition log.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub water_intake: f64,
}

impl NutritionTotals {
    pub fn from_entries(entries: &[NutritionEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut totals, entry| {
            if let Some(meal) = &entry.meal {
                totals.calories += meal.calories.unwrap_or(0.0);
                totals.protein += meal.protein.unwrap_or(0.0);
                totals.carbs += meal.carbs.unwrap_or(0.0);
                totals.fat += meal.fat.unwrap_or(0.0);
            }
            totals.water_intake += entry.water_intake.unwrap_or(0.0);
            totals
        })
    }

    pub fn render(&self) -> String {
        format!(
            "Calories: {} kcal | Protein: {} g | Carbs: {} g | Fat: {} g | Water: {} ml",
            self.calories, self.protein, self.carbs, self.fat, self.water_intake
        )
    }
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Monday to Sunday of the week containing `day`, as `(label, YYYY-MM-DD)`.
pub fn week_dates(day: NaiveDate) -> Vec<(&'static str, String)> {
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    WEEKDAYS
        .iter()
        .zip(0..)
        .map(|(label, offset)| {
            let date = monday + Duration::days(offset);
            (*label, date.format("%Y-%m-%d").to_string())
        })
        .collect()
}

/// Fractional minutes as `MM:SS`.
pub fn format_minutes(minutes: f64) -> String {
    let minutes = minutes.max(0.0);
    let whole = minutes.floor() as u64;
    let seconds = ((minutes - minutes.floor()) * 60.0).floor() as u64;
    format!("{:02}:{:02}", whole, seconds)
}

/// Countdown seconds as `MM:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
