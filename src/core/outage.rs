use crate::core::round_to;
use crate::models::{OutageEtaRequest, OutageEtaResponse, UtilityType};
use serde_json::Value;

/// Confidence reported by the baseline estimator
pub const BASELINE_CONFIDENCE: f64 = 0.75;

/// Multiplier applied when `severe_weather` is set
pub const SEVERE_WEATHER_FACTOR: f64 = 1.5;

/// Predicts time-to-restore for a utility outage
pub trait OutagePredictor: Send + Sync {
    fn estimate(&self, request: &OutageEtaRequest) -> OutageEtaResponse;
}

/// Per-utility historical averages with a weather adjustment.
/// The zone is not used.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoricalBaseline;

impl HistoricalBaseline {
    pub fn base_hours(utility: UtilityType) -> f64 {
        match utility {
            UtilityType::Water => 3.0,
            UtilityType::Power => 6.0,
            UtilityType::Other => 4.0,
        }
    }
}

impl OutagePredictor for HistoricalBaseline {
    fn estimate(&self, request: &OutageEtaRequest) -> OutageEtaResponse {
        let mut hours = Self::base_hours(UtilityType::parse(&request.utility_type));

        if request
            .weather_conditions
            .get("severe_weather")
            .is_some_and(is_truthy)
        {
            hours *= SEVERE_WEATHER_FACTOR;
        }

        let estimated_hours = round_to(hours, 1);
        OutageEtaResponse {
            estimated_hours,
            confidence: BASELINE_CONFIDENCE,
            explanation: format!(
                "Estimated restoration time: {:.1} hours based on historical patterns and current conditions.",
                estimated_hours
            ),
        }
    }
}

/// Loose truthiness for free-form condition flags: `null`, `false`, zero,
/// and empty strings, arrays or objects are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
