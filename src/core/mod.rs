// Decision handler exports
pub mod air_quality;
pub mod classification;
pub mod outage;
pub mod personalization;
pub mod routing;

pub use air_quality::{build_recommendation, classify_aqi, AqiAdvisor, AqiSource, FixedAqiSource};
pub use classification::{ImageClassifier, PlaceholderClassifier};
pub use outage::{HistoricalBaseline, OutagePredictor};
pub use personalization::{alert_level_for, recommend_alert_preference};
pub use routing::{compute_route, is_measurable, RouteRecommender};

/// Round half away from zero to `decimals` places
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
