//! GymClient tests against a wiremock server standing in for the gym API.

use std::sync::Arc;

use gym_companion::GymError;
use gym_companion::clients::gym::{GymClient, ResourceKind};
use gym_companion::clients::models::common::{PageOutcome, PageRequest};
use gym_companion::clients::models::requests::{
    CategoryUpsert, CreateNutrition, CreateWorkoutPlan, HealthDataUpsert, HealthPeriod, MealUpsert,
};
use gym_companion::clients::models::responses::{Category, Exercise};
use gym_companion::clients::token::StaticToken;
use gym_companion::config::Config;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> GymClient {
    let config = Config::for_base_url(format!("{}/gym", server.uri()), token);
    let tokens = Arc::new(StaticToken::new(config.gym_api_token.clone()));
    GymClient::new(&config, tokens).unwrap()
}

#[tokio::test]
async fn test_search_categories_sends_filter_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/categories/search"))
        .and(query_param("keyword", "yoga"))
        .and(query_param("page", "0"))
        .and(query_param("limit", "6"))
        .and(header("authorization", "Bearer secret"))
        .and(header("accept-language", "vi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "result": {"categories": [
                {"id": 1, "name": "Yoga"},
                {"id": 2, "name": "Power yoga", "image_url": "yoga.png"}
            ]}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let outcome: PageOutcome<Category> = client
        .search(ResourceKind::Categories, &PageRequest::first("yoga", 6, Some(9)))
        .await
        .unwrap();

    let items = outcome.into_items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].image_url.as_deref(), Some("yoga.png"));

    // categories ignore the category filter
    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].url.query_pairs().any(|(key, _)| key == "category_id"));
}

#[tokio::test]
async fn test_search_exercises_forwards_category() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/exercises"))
        .and(query_param("category_id", "3"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "result": {"exercises": [{"id": 8, "name": "Lunge", "time": "15"}]}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let request = PageRequest::first("", 5, Some(3)).with_page(2);
    let outcome: PageOutcome<Exercise> = client
        .search(ResourceKind::Exercises, &request)
        .await
        .unwrap();

    let items = outcome.into_items();
    assert_eq!(items[0].duration_minutes(), 15);
}

#[tokio::test]
async fn test_search_non_zero_code_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/meals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 1})))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let outcome: PageOutcome<Category> = client
        .search(ResourceKind::Meals, &PageRequest::first("", 10, None))
        .await
        .unwrap();

    assert_eq!(outcome, PageOutcome::Empty);
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/meals"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let result = client
        .search::<Category>(ResourceKind::Meals, &PageRequest::first("", 10, None))
        .await;

    match result {
        Err(GymError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_token_never_hits_the_network() {
    let server = MockServer::start().await;
    let client = client_for(&server, None);

    let result = client
        .search::<Category>(ResourceKind::Categories, &PageRequest::first("", 6, None))
        .await;

    assert!(matches!(result, Err(GymError::AuthMissing)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_workout_plan_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gym/api/v1/workout-plans"))
        .and(body_json(json!({
            "user_id": 1,
            "exercise_id": 4,
            "date": "2025-05-05",
            "duration": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "result": {"id": 77}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let id = client
        .create_workout_plan(&CreateWorkoutPlan {
            user_id: 1,
            exercise_id: 4,
            date: "2025-05-05".to_string(),
            duration: 20,
        })
        .await
        .unwrap();

    assert_eq!(id, 77);
}

#[tokio::test]
async fn test_create_workout_plan_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gym/api/v1/workout-plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 1001})))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let result = client
        .create_workout_plan(&CreateWorkoutPlan {
            user_id: 1,
            exercise_id: 4,
            date: "2025-05-05".to_string(),
            duration: 20,
        })
        .await;

    assert!(matches!(result, Err(GymError::Rejected { code: 1001 })));
}

#[tokio::test]
async fn test_workout_plan_detail_and_completion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/workout-plans/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "result": {
                "id": 77,
                "duration": 20,
                "date": "2025-05-05",
                "exercise_id": {"name": "Rowing", "calories": "300", "level": "Easy"},
                "user_id": {"weight": 80}
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/gym/api/v1/workout-plans/77"))
        .and(body_json(json!({"active": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let detail = client.get_workout_plan(77).await.unwrap().unwrap();
    assert_eq!(detail.duration, Some(20.0));
    assert_eq!(detail.exercise.unwrap().calories, Some(300.0));

    client.complete_workout_plan(77).await.unwrap();
}

#[tokio::test]
async fn test_get_exercise_missing_result_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/exercises/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 404})))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    assert!(client.get_exercise(5).await.unwrap().is_none());
}

#[tokio::test]
async fn test_count_and_admin_writes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/categories/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "result": 14})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gym/api/v1/categories"))
        .and(body_json(json!({"name": "Cardio"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/gym/api/v1/meals/4"))
        .and(body_json(json!({"name": "Salad", "calories": "120"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/gym/api/v1/categories/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 2})))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    assert_eq!(client.count(ResourceKind::Categories).await.unwrap(), Some(14));

    client
        .create(
            ResourceKind::Categories,
            &CategoryUpsert {
                name: "Cardio".to_string(),
                image_url: None,
            },
        )
        .await
        .unwrap();

    client
        .update(
            ResourceKind::Meals,
            4,
            &MealUpsert {
                name: "Salad".to_string(),
                description: None,
                calories: Some("120".to_string()),
                image_url: None,
            },
        )
        .await
        .unwrap();

    let deleted = client.delete(ResourceKind::Categories, 3).await;
    assert!(matches!(deleted, Err(GymError::Rejected { code: 2 })));
}

#[tokio::test]
async fn test_get_category_and_meal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/categories/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "result": {"id": 2, "name": "Cardio", "image_url": "cardio.png"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/meals/6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "result": {"id": 6, "name": "Omelette", "calories": 210}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));

    let category = client.get_category(2).await.unwrap().unwrap();
    assert_eq!(category.name, "Cardio");
    assert_eq!(category.image_url.as_deref(), Some("cardio.png"));

    let meal = client.get_meal(6).await.unwrap().unwrap();
    assert_eq!(meal.name, "Omelette");
    assert_eq!(meal.calories.as_deref(), Some("210"));
}

#[tokio::test]
async fn test_nutrition_list_create_delete() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/nutrition"))
        .and(query_param("user_id", "1"))
        .and(query_param("date", "2025-04-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "result": [
                {"id": 3, "mealType": "lunch", "meal": {"name": "Pho", "calories": 450}},
                {"id": 4, "mealType": "dinner", "waterIntake": 300}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gym/api/v1/nutrition"))
        .and(body_json(json!({
            "user_id": 1,
            "meal_type": "lunch",
            "meal_id": 8,
            "meal_time": "12:30",
            "created_at": "2025-04-10"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/gym/api/v1/nutrition/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));

    let entries = client.list_nutrition(1, "2025-04-10").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].meal.as_ref().unwrap().calories, Some(450.0));
    assert_eq!(entries[1].water_intake, Some(300.0));

    client
        .create_nutrition(&CreateNutrition {
            user_id: 1,
            meal_type: "lunch".to_string(),
            meal_id: 8,
            meal_time: "12:30".to_string(),
            created_at: "2025-04-10".to_string(),
        })
        .await
        .unwrap();

    client.delete_nutrition(3).await.unwrap();
}

#[tokio::test]
async fn test_nutrition_rejected_code_is_an_empty_log() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/nutrition"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 5})))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    assert!(client.list_nutrition(1, "2025-04-10").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health_data_read_and_write() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/health-data/period"))
        .and(query_param("user_id", "1"))
        .and(query_param("period", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "result": {"walk": 42000, "sleep": "7h", "heart_rate": 72, "calories": "2100"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gym/api/v1/health-data"))
        .and(body_json(json!({
            "user_id": 1,
            "walk": 6000,
            "calories": 300,
            "heart_rate": 80,
            "sleep": "8h",
            "date": "2025-04-10"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/gym/api/v1/health-data/1"))
        .and(body_json(json!({
            "user_id": 1,
            "walk": 6500,
            "calories": 300,
            "heart_rate": 80,
            "sleep": "8h"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));

    let week = client
        .health_data(1, Some(HealthPeriod::Week), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(week.walk, Some(42000.0));
    assert_eq!(week.calories, Some(2100.0));
    assert_eq!(week.sleep.as_deref(), Some("7h"));

    let mut body = HealthDataUpsert {
        user_id: 1,
        walk: 6000,
        calories: 300,
        heart_rate: 80,
        sleep: "8h".to_string(),
        date: Some("2025-04-10".to_string()),
    };
    client.add_health_data(&body).await.unwrap();

    body.walk = 6500;
    body.date = None;
    client.update_health_data(1, &body).await.unwrap();
}

#[tokio::test]
async fn test_health_data_for_a_single_day_omits_period() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gym/api/v1/health-data/period"))
        .and(query_param("date", "2025-04-07"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let day = client.health_data(1, None, Some("2025-04-07")).await.unwrap();
    assert!(day.is_none());

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].url.query_pairs().any(|(key, _)| key == "period"));
}
