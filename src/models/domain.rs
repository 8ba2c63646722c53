use crate::models::schema::{null_as_default, optional_integral};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// A point on the map. No geographic bounds are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Descriptive user profile used for personalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "optional_integral")]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medical_flags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub commute_patterns: Vec<String>,
}

/// Age at which a user is treated as elderly
pub const ELDERLY_AGE: i32 = 65;

/// Medical flag that triggers respiratory advice
pub const ASTHMA_FLAG: &str = "Asthma";

impl UserProfile {
    pub fn is_elderly(&self) -> bool {
        self.age.is_some_and(|age| age >= ELDERLY_AGE)
    }

    pub fn has_asthma(&self) -> bool {
        self.medical_flags.iter().any(|flag| flag == ASTHMA_FLAG)
    }
}

/// Personalized alert intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Low,
    Medium,
    High,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Low => "low",
            AlertLevel::Medium => "medium",
            AlertLevel::High => "high",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Air quality severity band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Closed set of categories a civic report image can fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageCategory {
    Pothole,
    Garbage,
    TreeFall,
    Streetlight,
    WaterLeak,
    Other,
}

impl ImageCategory {
    pub const ALL: [ImageCategory; 6] = [
        ImageCategory::Pothole,
        ImageCategory::Garbage,
        ImageCategory::TreeFall,
        ImageCategory::Streetlight,
        ImageCategory::WaterLeak,
        ImageCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageCategory::Pothole => "pothole",
            ImageCategory::Garbage => "garbage",
            ImageCategory::TreeFall => "tree_fall",
            ImageCategory::Streetlight => "streetlight",
            ImageCategory::WaterLeak => "water_leak",
            ImageCategory::Other => "other",
        }
    }
}

impl fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Utility kinds with a known restoration baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityType {
    Water,
    Power,
    Other,
}

impl UtilityType {
    /// Case-insensitive; anything unrecognized maps to `Other`
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "water" => UtilityType::Water,
            "power" => UtilityType::Power,
            _ => UtilityType::Other,
        }
    }
}
