use crate::error::ApiError;
use crate::models::schema::parse_optional_slice;
use crate::models::{AqiQuery, UserProfile};
use crate::routes::{json_ok, AppState};
use actix_web::{web, HttpResponse};
use std::collections::HashMap;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/alerts/aqi-recommendation", web::get().to(aqi_recommendation));
}

/// AQI advisory endpoint
///
/// GET /alerts/aqi-recommendation?lat={lat}&lng={lng}
///
/// An optional `UserProfile` JSON body tailors the advice.
async fn aqi_recommendation(
    state: web::Data<AppState>,
    params: web::Query<HashMap<String, String>>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let query = AqiQuery::from_params(&params).map_err(|errors| {
        tracing::info!("Validation failed for aqi-recommendation query: {}", errors);
        ApiError::Validation(errors)
    })?;

    let profile: Option<UserProfile> = parse_optional_slice(&body).map_err(|errors| {
        tracing::info!("Validation failed for aqi-recommendation body: {}", errors);
        ApiError::Validation(errors)
    })?;

    let response = state
        .air_quality
        .recommend(&query.location(), profile.as_ref());

    json_ok(&response)
}
