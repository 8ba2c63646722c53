use crate::core::is_measurable;
use crate::models::domain::{Coordinate, UserProfile};
use crate::models::schema::{
    null_as_default, required_query_number, FieldKind, FieldSpec, Schema, SchemaError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use validator::{Validate, ValidationError, ValidationErrors};

impl Schema for UserProfile {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("age", FieldKind::Integer),
        FieldSpec::optional("medical_flags", FieldKind::StringList),
        FieldSpec::optional("commute_patterns", FieldKind::StringList),
    ];
}

/// Request for a route between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferences: Map<String, Value>,
}

impl RouteRequest {
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            preferences: Map::new(),
        }
    }
}

impl Schema for RouteRequest {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("origin", FieldKind::Object),
        FieldSpec::required("origin.lat", FieldKind::Number),
        FieldSpec::required("origin.lng", FieldKind::Number),
        FieldSpec::required("destination", FieldKind::Object),
        FieldSpec::required("destination.lat", FieldKind::Number),
        FieldSpec::required("destination.lng", FieldKind::Number),
        FieldSpec::optional("preferences", FieldKind::Object),
    ];
}

fn check_finite(errors: &mut ValidationErrors, field: &'static str, value: f64) {
    if !value.is_finite() {
        let mut error = ValidationError::new("finite");
        error.message = Some("must be a finite number".into());
        errors.add(field, error);
    }
}

impl Validate for RouteRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_finite(&mut errors, "origin.lat", self.origin.lat);
        check_finite(&mut errors, "origin.lng", self.origin.lng);
        check_finite(&mut errors, "destination.lat", self.destination.lat);
        check_finite(&mut errors, "destination.lng", self.destination.lng);

        if errors.field_errors().is_empty() && !is_measurable(&self.origin, &self.destination) {
            let mut error = ValidationError::new("range");
            error.message = Some("too far from origin for a finite distance".into());
            errors.add("destination", error);
        }

        if errors.field_errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Request for an outage restoration estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OutageEtaRequest {
    pub utility_type: String,
    /// Accepted for future zone-aware predictors; unused by the baseline
    pub zone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather_conditions: Map<String, Value>,
}

impl Schema for OutageEtaRequest {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("utility_type", FieldKind::String),
        FieldSpec::required("zone", FieldKind::String),
        FieldSpec::optional("weather_conditions", FieldKind::Object),
    ];
}

/// Request to classify a civic report image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ImageClassificationRequest {
    #[validate(url(message = "must be a valid URL"))]
    pub image_url: String,
}

impl Schema for ImageClassificationRequest {
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("image_url", FieldKind::String)];
}

/// Location query of the AQI endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AqiQuery {
    pub lat: f64,
    pub lng: f64,
}

impl AqiQuery {
    /// Both parameters are checked so the caller sees every problem at once
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, SchemaError> {
        let lat = required_query_number(params, "lat");
        let lng = required_query_number(params, "lng");
        match (lat, lng) {
            (Ok(lat), Ok(lng)) => Ok(Self { lat, lng }),
            (lat, lng) => Err(SchemaError::new(
                [lat.err(), lng.err()].into_iter().flatten().collect(),
            )),
        }
    }

    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}
