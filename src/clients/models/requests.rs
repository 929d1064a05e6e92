use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWorkoutPlan {
    pub user_id: u64,
    pub exercise_id: u64,
    // YYYY-MM-DD
    pub date: String,
    // Minutes
    pub duration: u32,
}

#[derive(Debug, Serialize)]
pub struct CompleteWorkoutPlan {
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryUpsert {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseUpsert {
    pub name: String,
    pub category_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealUpsert {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// POST /api/v1/nutrition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateNutrition {
    pub user_id: u64,
    // breakfast, lunch, dinner or snack
    pub meal_type: String,
    pub meal_id: u64,
    // HH:MM
    pub meal_time: String,
    // YYYY-MM-DD
    pub created_at: String,
}

/// Body for `POST /api/v1/health-data` and `PUT /api/v1/health-data/{user_id}`.
/// Updates leave `date` unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthDataUpsert {
    pub user_id: u64,
    pub walk: u32,
    pub calories: u32,
    pub heart_rate: u32,
    pub sleep: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthPeriod {
    Today,
    Day,
    Week,
    Month,
}

impl HealthPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthPeriod::Today => "today",
            HealthPeriod::Day => "day",
            HealthPeriod::Week => "week",
            HealthPeriod::Month => "month",
        }
    }
}
