//! CityAssist ML - prediction services for the CityAssist platform
//!
//! Exposes route recommendation, air-quality advice, outage ETA estimates,
//! report image classification and alert personalization over HTTP. Each
//! decision is a deterministic function of its request; only route
//! recommendations are cached.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{compute_route, recommend_alert_preference, RouteRecommender};
pub use error::ApiError;
pub use models::{RouteRequest, RouteResponse, UserProfile};
pub use routes::{configure_routes, AppState};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    #[test]
    fn test_library_exports() {
        let here = Coordinate::new(40.7128, -74.0060);
        let response = compute_route(&RouteRequest::new(here, here));
        assert_eq!(response.distance, 0.0);
    }
}
