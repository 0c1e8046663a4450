use chrono::{DateTime, Utc};
use model::Coordinate;

/// A cached geocoding result.
/// Table: `geocode_cache`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GeocodeRow {
    pub address_hash: String,
    pub latitude: f64,
    pub longitude: f64,
    pub expires_at: DateTime<Utc>,
}

impl GeocodeRow {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}
