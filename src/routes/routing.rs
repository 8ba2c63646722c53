use crate::error::ApiError;
use crate::models::RouteRequest;
use crate::routes::{json_ok, validated, AppState};
use actix_web::{web, HttpResponse};
use serde_json::Value;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/routing/recommend", web::post().to(recommend_route));
}

/// Route recommendation endpoint
///
/// POST /routing/recommend
///
/// Request body:
/// ```json
/// {
///   "origin": {"lat": 40.7128, "lng": -74.0060},
///   "destination": {"lat": 40.7589, "lng": -73.9851},
///   "preferences": {}
/// }
/// ```
///
/// Identical origin/destination pairs are served from cache for the
/// configured TTL.
async fn recommend_route(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let request: RouteRequest = validated("routing/recommend", body.into_inner())?;
    let response = state.routes.recommend(&request).await;
    json_ok(&response)
}
