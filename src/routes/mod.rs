// Route exports
pub mod alerts;
pub mod outage;
pub mod personalization;
pub mod reports;
pub mod routing;
pub mod service;

use crate::config::Settings;
use crate::core::{
    AqiAdvisor, HistoricalBaseline, ImageClassifier, OutagePredictor, PlaceholderClassifier,
    RouteRecommender,
};
use crate::error::{handle_json_payload_error, ApiError};
use crate::models::schema::{parse_value, Schema};
use crate::services::KeyValueCache;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub routes: RouteRecommender,
    pub air_quality: AqiAdvisor,
    pub outage: Arc<dyn OutagePredictor>,
    pub classifier: Arc<dyn ImageClassifier>,
    pub cache: Arc<dyn KeyValueCache>,
}

impl AppState {
    pub fn from_settings(settings: &Settings, cache: Arc<dyn KeyValueCache>) -> Self {
        Self {
            routes: RouteRecommender::new(cache.clone(), settings.routing.cache_ttl_secs),
            air_quality: AqiAdvisor::fixed(settings.air_quality.current_aqi),
            outage: Arc::new(HistoricalBaseline),
            classifier: Arc::new(PlaceholderClassifier::default()),
            cache,
        }
    }

    /// Default predictors around the given cache
    pub fn with_cache(cache: Arc<dyn KeyValueCache>) -> Self {
        Self::from_settings(&Settings::default(), cache)
    }
}

/// Register every endpoint plus the JSON and not-found handling
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(handle_json_payload_error),
    )
    .configure(service::configure)
    .configure(personalization::configure)
    .configure(routing::configure)
    .configure(alerts::configure)
    .configure(outage::configure)
    .configure(reports::configure)
    .default_service(web::route().to(not_found));
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(req.path().to_string()))
}

/// Run the schema layer over a JSON body
pub(crate) fn validated<T: Schema>(endpoint: &str, body: Value) -> Result<T, ApiError> {
    parse_value(body).map_err(|errors| {
        tracing::info!("Validation failed for {}: {}", endpoint, errors);
        ApiError::Validation(errors)
    })
}

/// Serialize a successful response
pub(crate) fn json_ok<T: Serialize>(value: &T) -> Result<HttpResponse, ApiError> {
    let body = serde_json::to_string(value)?;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}
