use std::sync::Arc;

use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::models::common::{Envelope, PageOutcome, PageRequest, page_from_body};
use crate::clients::models::requests::{
    CompleteWorkoutPlan, CreateNutrition, CreateWorkoutPlan, HealthDataUpsert, HealthPeriod,
};
use crate::clients::models::responses::{
    Category, Exercise, HealthData, Meal, NutritionEntry, WorkoutPlanCreated, WorkoutPlanDetail,
};
use crate::clients::token::TokenProvider;
use crate::config::Config;
use crate::error::{GymError, Result};

const WORKOUT_PLANS_ENDPOINT: &str = "api/v1/workout-plans";
const NUTRITION_ENDPOINT: &str = "api/v1/nutrition";
const HEALTH_DATA_ENDPOINT: &str = "api/v1/health-data";

/// The list resources the API exposes with keyword search and paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Categories,
    Exercises,
    Meals,
}

impl ResourceKind {
    pub fn collection_path(self) -> &'static str {
        match self {
            ResourceKind::Categories => "api/v1/categories",
            ResourceKind::Exercises => "api/v1/exercises",
            ResourceKind::Meals => "api/v1/meals",
        }
    }

    fn search_path(self) -> &'static str {
        match self {
            ResourceKind::Categories => "api/v1/categories/search",
            other => other.collection_path(),
        }
    }

    /// Key of the item array inside `result`.
    pub fn array_key(self) -> &'static str {
        match self {
            ResourceKind::Categories => "categories",
            ResourceKind::Exercises => "exercises",
            ResourceKind::Meals => "meals",
        }
    }

    pub fn supports_category_filter(self) -> bool {
        matches!(self, ResourceKind::Exercises)
    }
}

#[derive(Clone)]
pub struct GymClient {
    http: Client,
    base: Url,
    accept_language: String,
    tokens: Arc<dyn TokenProvider>,
}

impl GymClient {
    pub fn new(config: &Config, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }

        let mut base = Url::parse(&config.gym_api_url)?;
        // Url::join drops the last segment unless the base ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http: builder.build()?,
            base,
            accept_language: config.accept_language.clone(),
            tokens,
        })
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.tokens.token().ok_or(GymError::AuthMissing)?;
        Ok(self
            .http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT_LANGUAGE, &self.accept_language))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(GymError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }

    /// Fetches one page of `kind`. Envelopes without the expected array come back
    /// as [`PageOutcome::Empty`] rather than an error.
    pub async fn search<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        page: &PageRequest,
    ) -> Result<PageOutcome<T>> {
        let mut url = self.base.join(kind.search_path())?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in page.query_pairs() {
                if key == "category_id" && !kind.supports_category_filter() {
                    continue;
                }
                query.append_pair(key, &value);
            }
        }

        tracing::debug!(
            resource = kind.array_key(),
            keyword = %page.keyword,
            page = page.page,
            limit = page.limit,
            category_id = ?page.category_id,
            "gym.search.request"
        );

        let body = self.execute(self.request(Method::GET, url)?).await?;
        Ok(page_from_body(&body, kind.array_key()))
    }

    /// Total number of records of `kind`, when the server reports one.
    pub async fn count(&self, kind: ResourceKind) -> Result<Option<u64>> {
        let url = self
            .base
            .join(&format!("{}/count", kind.collection_path()))?;
        let body = self.execute(self.request(Method::GET, url)?).await?;
        let envelope: Envelope<u64> = serde_json::from_str(&body)?;
        Ok(envelope.into_result())
    }

    async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.base.join(path)?;
        let body = self.execute(self.request(Method::GET, url)?).await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.into_result())
    }

    pub async fn get_category(&self, id: u64) -> Result<Option<Category>> {
        self.get_one(&format!("{}/{}", ResourceKind::Categories.collection_path(), id))
            .await
    }

    pub async fn get_exercise(&self, id: u64) -> Result<Option<Exercise>> {
        self.get_one(&format!("{}/{}", ResourceKind::Exercises.collection_path(), id))
            .await
    }

    pub async fn get_meal(&self, id: u64) -> Result<Option<Meal>> {
        self.get_one(&format!("{}/{}", ResourceKind::Meals.collection_path(), id))
            .await
    }

    async fn acknowledge(&self, request: RequestBuilder) -> Result<()> {
        let body = self.execute(request).await?;
        let envelope: Envelope<Value> = serde_json::from_str(&body)?;
        if envelope.code != 0 {
            return Err(GymError::Rejected {
                code: envelope.code,
            });
        }
        Ok(())
    }

    pub async fn create<B: Serialize>(&self, kind: ResourceKind, body: &B) -> Result<()> {
        let url = self.base.join(kind.collection_path())?;
        self.acknowledge(self.request(Method::POST, url)?.json(body))
            .await?;
        tracing::info!(resource = kind.array_key(), "gym.resource.created");
        Ok(())
    }

    pub async fn update<B: Serialize>(&self, kind: ResourceKind, id: u64, body: &B) -> Result<()> {
        let url = self
            .base
            .join(&format!("{}/{}", kind.collection_path(), id))?;
        self.acknowledge(self.request(Method::PUT, url)?.json(body))
            .await?;
        tracing::info!(resource = kind.array_key(), id, "gym.resource.updated");
        Ok(())
    }

    pub async fn delete(&self, kind: ResourceKind, id: u64) -> Result<()> {
        let url = self
            .base
            .join(&format!("{}/{}", kind.collection_path(), id))?;
        self.acknowledge(self.request(Method::DELETE, url)?).await?;
        tracing::info!(resource = kind.array_key(), id, "gym.resource.deleted");
        Ok(())
    }

    pub async fn create_workout_plan(&self, plan: &CreateWorkoutPlan) -> Result<u64> {
        let url = self.base.join(WORKOUT_PLANS_ENDPOINT)?;

        tracing::debug!(
            user_id = plan.user_id,
            exercise_id = plan.exercise_id,
            date = %plan.date,
            duration = plan.duration,
            "gym.create_workout_plan.request"
        );

        let body = self
            .execute(self.request(Method::POST, url)?.json(plan))
            .await?;
        let envelope: Envelope<WorkoutPlanCreated> = serde_json::from_str(&body)?;
        match (envelope.code, envelope.result) {
            (0, Some(created)) => Ok(created.id),
            (0, None) => Err(GymError::Decode {
                message: "workout plan response has no result".to_string(),
            }),
            (code, _) => Err(GymError::Rejected { code }),
        }
    }

    pub async fn get_workout_plan(&self, id: u64) -> Result<Option<WorkoutPlanDetail>> {
        self.get_one(&format!("{}/{}", WORKOUT_PLANS_ENDPOINT, id))
            .await
    }

    /// Marks the plan as done (`PUT {active: true}`).
    pub async fn complete_workout_plan(&self, id: u64) -> Result<()> {
        let url = self
            .base
            .join(&format!("{}/{}", WORKOUT_PLANS_ENDPOINT, id))?;
        self.acknowledge(
            self.request(Method::PUT, url)?
                .json(&CompleteWorkoutPlan { active: true }),
        )
        .await?;
        tracing::info!(workout_plan_id = id, "gym.workout_plan.completed");
        Ok(())
    }

    /// Meals logged by `user_id` on `date`. A rejected or empty answer is an empty log.
    pub async fn list_nutrition(&self, user_id: u64, date: &str) -> Result<Vec<NutritionEntry>> {
        let mut url = self.base.join(NUTRITION_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("user_id", &user_id.to_string())
            .append_pair("date", date);

        let body = self.execute(self.request(Method::GET, url)?).await?;
        let envelope: Envelope<Vec<NutritionEntry>> = serde_json::from_str(&body)?;
        Ok(envelope.into_result().unwrap_or_default())
    }

    pub async fn create_nutrition(&self, entry: &CreateNutrition) -> Result<()> {
        let url = self.base.join(NUTRITION_ENDPOINT)?;

        tracing::debug!(
            user_id = entry.user_id,
            meal_id = entry.meal_id,
            meal_type = %entry.meal_type,
            date = %entry.created_at,
            "gym.create_nutrition.request"
        );

        self.acknowledge(self.request(Method::POST, url)?.json(entry))
            .await?;
        tracing::info!(meal_id = entry.meal_id, "gym.nutrition.created");
        Ok(())
    }

    // The delete endpoint answers with an empty body, only the status matters
    pub async fn delete_nutrition(&self, id: u64) -> Result<()> {
        let url = self
            .base
            .join(&format!("{}/{}", NUTRITION_ENDPOINT, id))?;
        self.execute(self.request(Method::DELETE, url)?).await?;
        tracing::info!(id, "gym.nutrition.deleted");
        Ok(())
    }

    /// Health metrics for a period, or for the single `date` when `period` is `None`.
    pub async fn health_data(
        &self,
        user_id: u64,
        period: Option<HealthPeriod>,
        date: Option<&str>,
    ) -> Result<Option<HealthData>> {
        let mut url = self
            .base
            .join(&format!("{}/period", HEALTH_DATA_ENDPOINT))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("user_id", &user_id.to_string());
            if let Some(period) = period {
                query.append_pair("period", period.as_str());
            }
            if let Some(date) = date.filter(|date| !date.trim().is_empty()) {
                query.append_pair("date", date);
            }
        }

        tracing::debug!(
            user_id,
            period = ?period.map(|p| p.as_str()),
            date = ?date,
            "gym.health_data.request"
        );

        let body = self.execute(self.request(Method::GET, url)?).await?;
        let envelope: Envelope<HealthData> = serde_json::from_str(&body)?;
        Ok(envelope.into_result())
    }

    pub async fn add_health_data(&self, data: &HealthDataUpsert) -> Result<()> {
        let url = self.base.join(HEALTH_DATA_ENDPOINT)?;
        self.acknowledge(self.request(Method::POST, url)?.json(data))
            .await?;
        tracing::info!(user_id = data.user_id, "gym.health_data.added");
        Ok(())
    }

    /// Overwrites today's metrics; the server keys them by user.
    pub async fn update_health_data(&self, user_id: u64, data: &HealthDataUpsert) -> Result<()> {
        let url = self
            .base
            .join(&format!("{}/{}", HEALTH_DATA_ENDPOINT, user_id))?;
        self.acknowledge(self.request(Method::PUT, url)?.json(data))
            .await?;
        tracing::info!(user_id, "gym.health_data.updated");
        Ok(())
    }
}
