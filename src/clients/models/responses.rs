use serde::{Deserialize, Serialize};

use crate::clients::models::common::{lenient_f64, lenient_string};

const DEFAULT_EXERCISE_MINUTES: u32 = 20;
// Largest length whose second count still fits in a u32
const MAX_EXERCISE_MINUTES: u32 = u32::MAX / 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    // Declared length in minutes, e.g. "20" or "15 min"
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub calories: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub level: Option<String>,
    #[serde(default)]
    pub category_id: Option<u64>,
}

impl Exercise {
    /// Leading integer of `time`; anything missing, unparsable or zero counts as 20 minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.time
            .as_deref()
            .and_then(leading_integer)
            .filter(|minutes| *minutes > 0)
            .map(|minutes| minutes.min(MAX_EXERCISE_MINUTES))
            .unwrap_or(DEFAULT_EXERCISE_MINUTES)
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes().saturating_mul(60)
    }
}

fn leading_integer(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub calories: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

// Returned by POST /api/v1/workout-plans
#[derive(Debug, Deserialize)]
pub struct WorkoutPlanCreated {
    pub id: u64,
}

// GET /api/v1/workout-plans/{id} expands the exercise and user references
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutPlanDetail {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default, rename = "exercise_id")]
    pub exercise: Option<PlanExercise>,
    #[serde(default, rename = "user_id")]
    pub user: Option<PlanUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanExercise {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanUser {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: Option<f64>,
}

// GET /api/v1/nutrition returns the day's entries as a bare array under `result`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NutritionEntry {
    pub id: u64,
    #[serde(default)]
    pub meal: Option<NutritionMeal>,
    #[serde(default, alias = "mealType", deserialize_with = "lenient_string")]
    pub meal_type: Option<String>,
    #[serde(default, alias = "waterIntake", deserialize_with = "lenient_f64")]
    pub water_intake: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NutritionMeal {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub carbs: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub protein: Option<f64>,
}

// GET /api/v1/health-data/period
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthData {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub walk: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sleep: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub heart_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub calories: Option<f64>,
}
