use crate::models::{AqiRecommendation, Coordinate, Severity, UserProfile};
use std::sync::Arc;

const ELDERLY_CLAUSE: &str = " (Elderly: Consider extra caution)";
const ASTHMA_CLAUSE: &str = " (Asthma: Use mask if air quality is moderate or worse)";

/// Source of the current AQI at a location
pub trait AqiSource: Send + Sync {
    fn current_aqi(&self, location: &Coordinate) -> u32;
}

/// Reports the same AQI everywhere
#[derive(Debug, Clone, Copy)]
pub struct FixedAqiSource {
    value: u32,
}

impl FixedAqiSource {
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl AqiSource for FixedAqiSource {
    fn current_aqi(&self, _location: &Coordinate) -> u32 {
        self.value
    }
}

/// Severity band and base advice. Thresholds are strict: 50 is low, 101 is high.
pub fn classify_aqi(aqi_value: u32) -> (Severity, &'static str) {
    if aqi_value > 100 {
        (
            Severity::High,
            "Avoid outdoor activities. Wear N95 mask if going outside.",
        )
    } else if aqi_value > 50 {
        (
            Severity::Medium,
            "Moderate air quality. Sensitive individuals should take precautions.",
        )
    } else {
        (
            Severity::Low,
            "Good air quality. Safe for outdoor activities.",
        )
    }
}

/// Build the advisory for an AQI value, tailored to an optional profile
pub fn build_recommendation(aqi_value: u32, profile: Option<&UserProfile>) -> AqiRecommendation {
    let (severity, base) = classify_aqi(aqi_value);

    let mut recommendation = base.to_string();
    if let Some(profile) = profile {
        if profile.is_elderly() {
            recommendation.push_str(ELDERLY_CLAUSE);
        }
        if profile.has_asthma() {
            recommendation.push_str(ASTHMA_CLAUSE);
        }
    }

    AqiRecommendation {
        aqi_value,
        explanation: format!("Current AQI is {}. {}", aqi_value, recommendation),
        recommendation,
        severity,
    }
}

/// Air quality advisory backed by a pluggable AQI source
#[derive(Clone)]
pub struct AqiAdvisor {
    source: Arc<dyn AqiSource>,
}

impl AqiAdvisor {
    pub fn new(source: Arc<dyn AqiSource>) -> Self {
        Self { source }
    }

    pub fn fixed(value: u32) -> Self {
        Self::new(Arc::new(FixedAqiSource::new(value)))
    }

    pub fn recommend(&self, location: &Coordinate, profile: Option<&UserProfile>) -> AqiRecommendation {
        let aqi_value = self.source.current_aqi(location);
        build_recommendation(aqi_value, profile)
    }
}
