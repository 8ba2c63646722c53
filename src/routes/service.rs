use crate::models::{HealthResponse, ServiceInfoResponse};
use crate::routes::AppState;
use actix_web::{web, HttpResponse, Responder};

pub const SERVICE_NAME: &str = "CityAssist ML Services";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health_check));
}

/// Liveness endpoint
async fn root() -> impl Responder {
    HttpResponse::Ok().json(ServiceInfoResponse {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "healthy".to_string(),
    })
}

/// Health check endpoint. A degraded cache does not make the service unhealthy.
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let cache = if state.cache.is_available() { "connected" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        cache: cache.to_string(),
    })
}
