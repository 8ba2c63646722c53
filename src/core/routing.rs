use crate::core::round_to;
use crate::models::{Coordinate, RouteRequest, RouteResponse};
use crate::services::cache::{get_json, set_json, CacheKey, KeyValueCache, NoopCache};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Kilometres per degree, applied to both axes
pub const KM_PER_DEGREE: f64 = 111.0;

/// Assumed average city speed in km/h
pub const AVERAGE_SPEED_KMH: f64 = 30.0;

/// How long a computed route is served from cache
pub const DEFAULT_ROUTE_TTL_SECS: u64 = 300;

const ROUTE_EXPLANATION: &str =
    "Route calculated based on current traffic conditions. Moderate congestion expected.";

/// Compute a route without touching the cache
///
/// Distance is the Manhattan distance in degrees scaled to kilometres;
/// duration assumes [`AVERAGE_SPEED_KMH`]. Both are rounded to 2 decimals,
/// each from the unrounded distance.
pub fn compute_route(request: &RouteRequest) -> RouteResponse {
    let (distance_km, duration_minutes) = route_metrics(&request.origin, &request.destination);

    RouteResponse {
        distance: round_to(distance_km, 2),
        duration: round_to(duration_minutes, 2),
        alternate_routes: Vec::new(),
        traffic_info: traffic_info(),
        explanation: ROUTE_EXPLANATION.to_string(),
    }
}

/// Unrounded distance in km and duration in minutes
fn route_metrics(origin: &Coordinate, destination: &Coordinate) -> (f64, f64) {
    let degrees = (origin.lat - destination.lat).abs() + (origin.lng - destination.lng).abs();
    let distance_km = degrees * KM_PER_DEGREE;
    (distance_km, (distance_km / AVERAGE_SPEED_KMH) * 60.0)
}

/// `false` when the points are too far apart for distance and duration to
/// be finite floats
pub fn is_measurable(origin: &Coordinate, destination: &Coordinate) -> bool {
    let (distance_km, duration_minutes) = route_metrics(origin, destination);
    distance_km.is_finite() && duration_minutes.is_finite()
}

fn traffic_info() -> Map<String, Value> {
    let mut info = Map::new();
    info.insert("congestion_level".to_string(), json!("moderate"));
    info.insert("incidents".to_string(), json!([]));
    info
}

/// Route recommendation with read-through / write-through caching
#[derive(Clone)]
pub struct RouteRecommender {
    cache: Arc<dyn KeyValueCache>,
    ttl_secs: u64,
}

impl RouteRecommender {
    pub fn new(cache: Arc<dyn KeyValueCache>, ttl_secs: u64) -> Self {
        Self { cache, ttl_secs }
    }

    pub fn uncached() -> Self {
        Self::new(Arc::new(NoopCache), DEFAULT_ROUTE_TTL_SECS)
    }

    /// Serve from cache when possible, otherwise compute and store
    pub async fn recommend(&self, request: &RouteRequest) -> RouteResponse {
        let key = CacheKey::route(&request.origin, &request.destination);

        match get_json::<RouteResponse>(self.cache.as_ref(), &key).await {
            Ok(Some(cached)) => {
                tracing::debug!("Route served from cache: {}", key);
                return cached;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Discarding unreadable cached route {}: {}", key, e),
        }

        let response = compute_route(request);

        if let Err(e) = set_json(self.cache.as_ref(), &key, &response, self.ttl_secs).await {
            tracing::warn!("Failed to cache route {}: {}", key, e);
        }

        response
    }
}
