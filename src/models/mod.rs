// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod schema;

pub use domain::{AlertLevel, Coordinate, ImageCategory, Severity, UserProfile, UtilityType};
pub use requests::{AqiQuery, ImageClassificationRequest, OutageEtaRequest, RouteRequest};
pub use responses::{
    AlertPreferenceResponse, AlertRecommendations, AqiRecommendation, ErrorResponse,
    HealthResponse, ImageClassificationResponse, OutageEtaResponse, RouteResponse,
    ServiceInfoResponse,
};
pub use schema::{FieldError, FieldErrorKind, Schema, SchemaError};
