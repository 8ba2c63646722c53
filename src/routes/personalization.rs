use crate::core::recommend_alert_preference;
use crate::error::ApiError;
use crate::models::UserProfile;
use crate::routes::{json_ok, validated};
use actix_web::{web, HttpResponse};
use serde_json::Value;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/personalization/alert-preference", web::post().to(alert_preference));
}

/// Alert preference endpoint
///
/// POST /personalization/alert-preference
///
/// Request body:
/// ```json
/// {
///   "age": 70,
///   "medical_flags": ["Asthma"],
///   "commute_patterns": ["Daily Commuter"]
/// }
/// ```
async fn alert_preference(body: web::Json<Value>) -> Result<HttpResponse, ApiError> {
    let profile: UserProfile = validated("alert-preference", body.into_inner())?;
    let response = recommend_alert_preference(&profile);

    tracing::debug!("Alert level {} for age {:?}", response.alert_level, profile.age);

    json_ok(&response)
}
