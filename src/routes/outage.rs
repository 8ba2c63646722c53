use crate::error::ApiError;
use crate::models::OutageEtaRequest;
use crate::routes::{json_ok, validated, AppState};
use actix_web::{web, HttpResponse};
use serde_json::Value;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/outage/estimate-eta", web::post().to(estimate_eta));
}

/// Outage restoration estimate endpoint
///
/// POST /outage/estimate-eta
///
/// Request body:
/// ```json
/// {
///   "utility_type": "power",
///   "zone": "downtown",
///   "weather_conditions": {"severe_weather": true}
/// }
/// ```
async fn estimate_eta(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let request: OutageEtaRequest = validated("outage/estimate-eta", body.into_inner())?;
    let response = state.outage.estimate(&request);

    tracing::debug!(
        "Outage ETA for {} in {}: {}h",
        request.utility_type,
        request.zone,
        response.estimated_hours
    );

    json_ok(&response)
}
