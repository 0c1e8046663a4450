use chrono::{DateTime, Utc};
use model::DistanceRecord;
use sqlx::types::Json;

/// A cached pair distance as stored.
/// Table: `location_distances`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DistanceRow {
    pub from_location_id: i64,
    pub to_location_id: i64,
    pub distance_km: f64,
    pub distance_miles: f64,
    pub duration_text: Option<String>,
    pub duration_minutes: Option<i32>,
    pub route_coords: Json<Vec<[f64; 2]>>,
    pub calculated_at: DateTime<Utc>,
}

impl From<DistanceRow> for DistanceRecord {
    fn from(row: DistanceRow) -> Self {
        DistanceRecord {
            from_location_id: row.from_location_id,
            to_location_id: row.to_location_id,
            distance_km: row.distance_km,
            distance_miles: row.distance_miles,
            duration_text: row.duration_text,
            duration_minutes: row.duration_minutes,
            route_coords: row.route_coords.0,
            calculated_at: row.calculated_at,
        }
    }
}
