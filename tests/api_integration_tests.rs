//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use recipe_recommender::catalog::load_catalog;
use recipe_recommender::{create_router, AppState, Config};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

const CATALOG: &str = r#"{
    "recipes": [
        {"id": "R1", "name": "Đậu hũ sốt cà", "difficulty": "Dễ", "meal_time": "lunch",
         "estimated_calories": 300, "preparation_time_minutes": 20, "ingredient_count": 5,
         "estimated_price_vnd": 30000, "content_score": 0.2, "cf_score": 0.3, "avg_rating": 4.1},
        {"id": "R2", "name": "Bò lúc lắc", "difficulty": "Khó", "meal_time": "dinner",
         "estimated_calories": 650, "preparation_time_minutes": 45, "ingredient_count": 9,
         "estimated_price_vnd": 90000, "content_score": 0.5, "cf_score": 0.5, "avg_rating": 4.6},
        {"id": "R3", "name": "Canh rau chay", "difficulty": "easy", "meal_time": "dinner",
         "estimated_calories": 180, "preparation_time_minutes": 15, "ingredient_count": 6,
         "estimated_price_vnd": 25000, "content_score": 0.4, "cf_score": 0.4, "avg_rating": 3.9}
    ],
    "profiles": {
        "R1": {"is_vegetarian": true, "is_vegan": false, "is_buddhist_vegetarian": false,
               "contains_meat": false, "contains_seafood": false, "contains_dairy": false,
               "contains_eggs": true, "is_spicy": false, "is_sweet": false},
        "R2": {"is_vegetarian": false, "is_vegan": false, "is_buddhist_vegetarian": false,
               "contains_meat": true, "contains_seafood": false, "contains_dairy": false,
               "contains_eggs": false, "is_spicy": false, "is_sweet": false, "tags": ["beef"]},
        "R3": {"is_vegetarian": true, "is_vegan": true, "is_buddhist_vegetarian": true,
               "contains_meat": false, "contains_seafood": false, "contains_dairy": false,
               "contains_eggs": false, "is_spicy": false, "is_sweet": false}
    },
    "interactions": [
        {"customer_id": "C1", "recipe_id": "R2", "rating": 5.0}
    ]
}"#;

fn create_test_app() -> Router {
    let config = Config {
        cache_dir: None,
        ..Config::default()
    };
    let loaded = load_catalog(CATALOG.as_bytes()).unwrap();
    create_router(AppState::from_config(loaded, &config))
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn ids(json: &Value) -> Vec<String> {
    json["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["recipe_id"].as_str().unwrap().to_string())
        .collect()
}

// == Recommend Endpoint Tests ==

#[tokio::test]
async fn test_recommend_excludes_history() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/recommend?customer_id=C1&count=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["customer_id"], "C1");
    assert_eq!(json["cold_start"], false);
    assert_eq!(ids(&json), vec!["R3", "R1"]);
}

#[tokio::test]
async fn test_recommend_applies_dietary_restriction() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/recommend?customer_id=C1&dietary=vegan").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec!["R3"]);
}

#[tokio::test]
async fn test_recommend_unknown_customer_is_cold_start() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "GET",
        "/recommend?customer_id=NEW&dietary=vegetarian&count=5",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cold_start"], true);
    let items = ids(&json);
    assert!(!items.contains(&"R2".to_string()));
    assert!(json["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["cold_start"] == true));
}

#[tokio::test]
async fn test_recommend_meal_time_filter() {
    let app = create_test_app();

    let (_, json) = send(&app, "GET", "/recommend?customer_id=C1&meal_time=dinner").await;

    assert_eq!(ids(&json), vec!["R3"]);
}

#[tokio::test]
async fn test_recommend_age_reports_nutrition_focus() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/recommend?customer_id=C1&age=70").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["nutrition_focus"].is_string());
}

#[tokio::test]
async fn test_soft_filters_never_empty_result() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "GET",
        "/recommend?customer_id=C1&dietary=vegan,no_pork&meal_time=lunch&difficulty=hard",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // R3 survives the dietary stage; the soft stages never empty the set.
    assert_eq!(ids(&json), vec!["R3"]);
    assert!(json.get("empty_reason").is_none());

    let (_, json) = send(&app, "GET", "/popular?dietary=vegan&meal_time=lunch").await;
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn test_recommend_missing_customer_is_bad_request() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/recommend?count=3").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("customer_id"));
}

#[tokio::test]
async fn test_recommend_invalid_filter_is_bad_request() {
    let app = create_test_app();

    let (status, _) = send(&app, "GET", "/recommend?customer_id=C1&meal_time=brunch").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_seeded_randomized_requests_repeat() {
    let app = create_test_app();
    let uri = "/recommend?customer_id=C1&count=2&randomize=true&seed=42";

    let (_, first) = send(&app, "GET", uri).await;
    let (_, second) = send(&app, "GET", uri).await;

    assert_eq!(ids(&first), ids(&second));
}

// == Popular Endpoint Tests ==

#[tokio::test]
async fn test_popular_ranks_by_interactions() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/popular?count=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cold_start"], true);
    assert_eq!(ids(&json)[0], "R2");
    assert!(json.get("customer_id").is_none());
}

#[tokio::test]
async fn test_popular_zero_count_is_bad_request() {
    let app = create_test_app();

    let (status, _) = send(&app, "GET", "/popular?count=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_cache_stats_count_repeat_requests() {
    let app = create_test_app();

    send(&app, "GET", "/recommend?customer_id=C1&count=2").await;
    send(&app, "GET", "/recommend?customer_id=C1&count=2").await;
    let (status, json) = send(&app, "GET", "/cache/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
}

#[tokio::test]
async fn test_sweep_keeps_live_entries() {
    let app = create_test_app();

    send(&app, "GET", "/popular").await;
    let (status, json) = send(&app, "POST", "/cache/sweep").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 0);
    assert_eq!(json["remaining"], 1);
}

// == Monitoring Endpoint Tests ==

#[tokio::test]
async fn test_stats_track_requests_and_errors() {
    let app = create_test_app();

    send(&app, "GET", "/recommend?customer_id=C1").await;
    send(&app, "GET", "/popular?count=0").await;
    let (status, json) = send(&app, "GET", "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_requests"], 2);
    assert_eq!(json["total_errors"], 1);
    assert_eq!(json["success_rate"], 50.0);
    assert_eq!(json["health"], "critical");
}

#[tokio::test]
async fn test_health_reports_catalog_size() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["recipes"], 3);
    assert_eq!(json["customers"], 1);
    assert!(json["timestamp"].is_string());
}
