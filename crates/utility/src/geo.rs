pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Statute miles per kilometer.
pub const MILES_PER_KM: f64 = 0.621371;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Great-circle distance between two coordinates in kilometers.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round to exactly one decimal place. Distances are reported with this
/// precision everywhere.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}
