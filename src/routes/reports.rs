use crate::error::ApiError;
use crate::models::ImageClassificationRequest;
use crate::routes::{json_ok, validated, AppState};
use actix_web::{web, HttpResponse};
use serde_json::Value;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reports/classify-image", web::post().to(classify_image));
}

/// Report image classification endpoint
///
/// POST /reports/classify-image
///
/// The image is not downloaded; only the URL's syntax is checked.
async fn classify_image(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let request: ImageClassificationRequest = validated("reports/classify-image", body.into_inner())?;
    json_ok(&state.classifier.classify(&request))
}
