use crate::models::domain::{AlertLevel, ImageCategory, Severity};
use crate::models::schema::FieldError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Route recommendation. This is also the cached representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Kilometres
    pub distance: f64,
    /// Minutes
    pub duration: f64,
    #[serde(default)]
    pub alternate_routes: Vec<Map<String, Value>>,
    #[serde(default)]
    pub traffic_info: Map<String, Value>,
    pub explanation: String,
}

/// Notification settings derived from an alert level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecommendations {
    pub aqi_threshold: u32,
    pub push_notifications: bool,
    pub email_notifications: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPreferenceResponse {
    pub alert_level: AlertLevel,
    pub recommendations: AlertRecommendations,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiRecommendation {
    pub aqi_value: u32,
    pub recommendation: String,
    pub severity: Severity,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutageEtaResponse {
    pub estimated_hours: f64,
    /// In `[0, 1]`
    pub confidence: f64,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageClassificationResponse {
    pub category: ImageCategory,
    /// In `[0, 1]`
    pub confidence: f64,
    pub explanation: String,
}

/// Liveness response for `/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub version: String,
    pub status: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cache: String,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}
