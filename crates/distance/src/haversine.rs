use model::Coordinate;
use utility::geo::{haversine_distance, km_to_miles, round1};

/// A straight-line distance estimate. No duration and no geometry; those
/// require a routing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub km: f64,
    pub miles: f64,
}

/// Great-circle estimate between two coordinates, rounded to one decimal.
/// Miles are derived from the unrounded kilometers.
pub fn estimate(a: Coordinate, b: Coordinate) -> Estimate {
    let km = haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude);
    Estimate {
        km: round1(km),
        miles: round1(km_to_miles(km)),
    }
}
