use crate::models::{ErrorResponse, FieldError, FieldErrorKind, SchemaError};
use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] SchemaError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The cause is logged, never returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        let status_code = self.status_code().as_u16();
        match self {
            ApiError::Validation(schema) => ErrorResponse {
                error: self.code().to_string(),
                message: "Request validation failed".to_string(),
                status_code,
                details: schema.errors.clone(),
            },
            ApiError::BadRequest(message) => ErrorResponse {
                error: self.code().to_string(),
                message: message.clone(),
                status_code,
                details: vec![],
            },
            ApiError::NotFound(path) => ErrorResponse {
                error: self.code().to_string(),
                message: format!("No route for {}", path),
                status_code,
                details: vec![],
            },
            ApiError::Internal(_) => ErrorResponse {
                error: self.code().to_string(),
                message: "An unexpected error occurred".to_string(),
                status_code,
                details: vec![],
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(cause) = self {
            tracing::error!("Internal error: {}", cause);
        }
        HttpResponse::build(self.status_code()).json(self.to_response_body())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    match err {
        error::JsonPayloadError::Deserialize(e) => ApiError::Validation(SchemaError::single(
            FieldError::new("body", FieldErrorKind::InvalidJson, format!("invalid JSON: {}", e)),
        ))
        .into(),
        other => ApiError::BadRequest(format!("Invalid request body: {}", other)).into(),
    }
}
