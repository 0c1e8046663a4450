use crate::duration::{minutes_rounded, seconds_to_human};
use crate::haversine::Estimate;
use crate::provider::DrivingRoute;
use utility::geo::{km_to_miles, round1};

/// The values the engine persists for a pair: either a full routing result or
/// a bare straight-line estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMetrics {
    pub km: f64,
    pub miles: f64,
    pub duration_text: Option<String>,
    pub duration_minutes: Option<i32>,
    pub route_coords: Vec<[f64; 2]>,
}

impl RouteMetrics {
    pub fn from_driving_route(route: &DrivingRoute) -> Self {
        let km = route.distance_meters / 1000.0;
        Self {
            km: round1(km),
            miles: round1(km_to_miles(km)),
            duration_text: Some(seconds_to_human(route.duration_seconds)),
            duration_minutes: Some(minutes_rounded(route.duration_seconds) as i32),
            route_coords: route.geometry.clone(),
        }
    }

    pub fn from_estimate(estimate: Estimate) -> Self {
        Self {
            km: estimate.km,
            miles: estimate.miles,
            duration_text: None,
            duration_minutes: None,
            route_coords: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_from_route_round_to_one_decimal() {
        let route = DrivingRoute {
            distance_meters: 32467.0,
            duration_seconds: 1825.0,
            geometry: vec![[-89.65, 39.78], [-89.60, 39.80]],
        };
        let metrics = RouteMetrics::from_driving_route(&route);
        assert_eq!(metrics.km, 32.5);
        // miles derive from the unrounded km: 32.467 * 0.621371 = 20.174...
        assert_eq!(metrics.miles, 20.2);
        assert_eq!(metrics.duration_text.as_deref(), Some("30 min"));
        assert_eq!(metrics.duration_minutes, Some(30));
        assert_eq!(metrics.route_coords.len(), 2);
    }

    #[test]
    fn metrics_from_estimate_have_no_duration_or_geometry() {
        let metrics = RouteMetrics::from_estimate(Estimate {
            km: 12.3,
            miles: 7.6,
        });
        assert_eq!(metrics.duration_text, None);
        assert_eq!(metrics.duration_minutes, None);
        assert!(metrics.route_coords.is_empty());
    }
}
