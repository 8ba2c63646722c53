// Integration tests for CityAssist ML: full HTTP round-trips

use actix_web::{http::StatusCode, test, web, App};
use cityassist_ml::core::AqiAdvisor;
use cityassist_ml::models::{Coordinate, RouteResponse};
use cityassist_ml::routes::{configure_routes, AppState};
use cityassist_ml::services::{CacheKey, KeyValueCache, MemoryCache, NoopCache};
use serde_json::{json, Value};
use std::sync::Arc;

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

fn uncached_state() -> AppState {
    AppState::with_cache(Arc::new(NoopCache))
}

fn nyc_route() -> Value {
    json!({
        "origin": {"lat": 40.7128, "lng": -74.0060},
        "destination": {"lat": 40.7589, "lng": -73.9851},
        "preferences": {}
    })
}

fn detail_fields(body: &Value) -> Vec<String> {
    body["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .filter_map(|d| d["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[actix_web::test]
async fn test_root() {
    let app = init_app!(uncached_state());
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["service"], "CityAssist ML Services");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_health_reports_cache_mode() {
    let app = init_app!(uncached_state());
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"], "degraded");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

    let app = init_app!(AppState::with_cache(Arc::new(MemoryCache::new(10))));
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["cache"], "connected");
}

#[actix_web::test]
async fn test_alert_preference() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/personalization/alert-preference")
        .set_json(json!({
            "age": 65,
            "medical_flags": ["Asthma"],
            "commute_patterns": ["Daily Commuter"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["alert_level"], "high");
    assert_eq!(body["recommendations"]["aqi_threshold"], 50);
    assert_eq!(body["recommendations"]["push_notifications"], true);
    assert_eq!(body["recommendations"]["email_notifications"], true);
    assert_eq!(body["explanation"], "Alert level set to high based on user profile");
}

#[actix_web::test]
async fn test_alert_preference_empty_profile() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/personalization/alert-preference")
        .set_json(json!({}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["alert_level"], "low");
    assert_eq!(body["recommendations"]["email_notifications"], false);
}

#[actix_web::test]
async fn test_alert_preference_negative_age_uses_flags() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/personalization/alert-preference")
        .set_json(json!({"age": -1, "medical_flags": ["Asthma"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["alert_level"], "medium");
}

#[actix_web::test]
async fn test_alert_preference_integral_float_age() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/personalization/alert-preference")
        .set_payload(r#"{"age": 70.0}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["alert_level"], "high");
}

#[actix_web::test]
async fn test_route_recommendation() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/routing/recommend")
        .set_json(nyc_route())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: RouteResponse = test::read_body_json(resp).await;
    assert_eq!(body.distance, 7.44);
    assert_eq!(body.duration, 14.87);
    assert!(body.alternate_routes.is_empty());
    assert_eq!(body.traffic_info["congestion_level"], "moderate");
}

#[actix_web::test]
async fn test_route_too_far_apart_is_rejected() {
    let cache = Arc::new(MemoryCache::new(100));
    let app = init_app!(AppState::with_cache(cache.clone()));
    let req = test::TestRequest::post()
        .uri("/routing/recommend")
        .set_payload(r#"{"origin":{"lat":1e308,"lng":0},"destination":{"lat":-1e308,"lng":0}}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(detail_fields(&body), vec!["destination"]);

    let key = CacheKey::route(&Coordinate::new(1e308, 0.0), &Coordinate::new(-1e308, 0.0));
    assert!(cache.get(&key).await.is_none());
}

#[actix_web::test]
async fn test_route_is_cached_between_calls() {
    let cache = Arc::new(MemoryCache::new(100));
    let app = init_app!(AppState::with_cache(cache.clone()));

    let first = test::call_and_read_body(
        &app,
        test::TestRequest::post().uri("/routing/recommend").set_json(nyc_route()).to_request(),
    )
    .await;

    let key = CacheKey::route(
        &Coordinate::new(40.7128, -74.0060),
        &Coordinate::new(40.7589, -73.9851),
    );
    assert!(cache.get(&key).await.is_some());

    let second = test::call_and_read_body(
        &app,
        test::TestRequest::post().uri("/routing/recommend").set_json(nyc_route()).to_request(),
    )
    .await;
    assert_eq!(first, second);
}

#[actix_web::test]
async fn test_route_served_from_cache() {
    let cache = Arc::new(MemoryCache::new(100));
    let key = CacheKey::route(
        &Coordinate::new(40.7128, -74.0060),
        &Coordinate::new(40.7589, -73.9851),
    );
    let cached = json!({
        "distance": 1.0,
        "duration": 2.0,
        "alternate_routes": [],
        "traffic_info": {},
        "explanation": "cached"
    });
    cache.set_with_expiry(&key, &cached.to_string(), 300).await;

    let app = init_app!(AppState::with_cache(cache));
    let req = test::TestRequest::post()
        .uri("/routing/recommend")
        .set_json(nyc_route())
        .to_request();
    let body: RouteResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.explanation, "cached");
    assert_eq!(body.distance, 1.0);
}

#[actix_web::test]
async fn test_route_missing_destination() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/routing/recommend")
        .set_json(json!({"origin": {"lat": 40.7128, "lng": -74.0060}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["status_code"], 422);
    assert_eq!(detail_fields(&body), vec!["destination"]);
    assert_eq!(body["details"][0]["kind"], "missing");
}

#[actix_web::test]
async fn test_route_wrong_coordinate_type() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/routing/recommend")
        .set_json(json!({
            "origin": {"lat": "north", "lng": -74.0060},
            "destination": {"lat": 40.7589}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(detail_fields(&body), vec!["origin.lat", "destination.lng"]);
}

#[actix_web::test]
async fn test_malformed_json_body() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/outage/estimate-eta")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"utility_type\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(detail_fields(&body), vec!["body"]);
}

#[actix_web::test]
async fn test_json_without_content_type() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/reports/classify-image")
        .set_payload(r#"{"image_url": "https://example.com/image.jpg"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_aqi_recommendation() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::get()
        .uri("/alerts/aqi-recommendation?lat=40.7128&lng=-74.0060")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["aqi_value"], 75);
    assert_eq!(body["severity"], "medium");
    assert_eq!(
        body["recommendation"],
        "Moderate air quality. Sensitive individuals should take precautions."
    );
}

#[actix_web::test]
async fn test_aqi_recommendation_with_profile() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::get()
        .uri("/alerts/aqi-recommendation?lat=40.7128&lng=-74.0060")
        .set_json(json!({"age": 70, "medical_flags": ["Asthma"]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let recommendation = body["recommendation"].as_str().unwrap();
    assert!(recommendation.ends_with(
        "(Elderly: Consider extra caution) (Asthma: Use mask if air quality is moderate or worse)"
    ));
    assert_eq!(body["explanation"], format!("Current AQI is 75. {}", recommendation));
}

#[actix_web::test]
async fn test_aqi_high_severity_source() {
    let mut state = uncached_state();
    state.air_quality = AqiAdvisor::fixed(101);
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/alerts/aqi-recommendation?lat=0&lng=0")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["severity"], "high");
    assert_eq!(body["aqi_value"], 101);
}

#[actix_web::test]
async fn test_aqi_missing_query_parameter() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::get()
        .uri("/alerts/aqi-recommendation?lat=40.7128")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(detail_fields(&body), vec!["lng"]);
}

#[actix_web::test]
async fn test_aqi_invalid_profile_body() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::get()
        .uri("/alerts/aqi-recommendation?lat=1&lng=2")
        .set_json(json!({"age": "old"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(detail_fields(&body), vec!["age"]);
}

#[actix_web::test]
async fn test_outage_eta() {
    let app = init_app!(uncached_state());
    let cases = [
        (json!({"utility_type": "power", "zone": "downtown", "weather_conditions": {}}), 6.0),
        (json!({"utility_type": "water", "zone": "north", "weather_conditions": {"severe_weather": true}}), 4.5),
        (json!({"utility_type": "gas", "zone": "east"}), 4.0),
    ];

    for (payload, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/outage/estimate-eta")
            .set_json(payload)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["estimated_hours"], expected);
        assert_eq!(body["confidence"], 0.75);
    }
}

#[actix_web::test]
async fn test_image_classification() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/reports/classify-image")
        .set_json(json!({"image_url": "https://example.com/image.jpg"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let categories = ["pothole", "garbage", "tree_fall", "streetlight", "water_leak", "other"];
    assert!(categories.contains(&body["category"].as_str().unwrap()));
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert_eq!(body["explanation"], "Image classified as pothole with 85.0% confidence.");
}

#[actix_web::test]
async fn test_image_classification_rejects_non_url() {
    let app = init_app!(uncached_state());
    let req = test::TestRequest::post()
        .uri("/reports/classify-image")
        .set_json(json!({"image_url": "not a url"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_unknown_route() {
    let app = init_app!(uncached_state());
    let resp = test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["status_code"], 404);
}
