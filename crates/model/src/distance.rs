use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Distances older than this many days count as outdated for reporting.
pub const OUTDATED_AFTER_DAYS: i64 = 30;

/// Canonical key for an unordered location pair. The smaller id is always
/// stored first so that (a, b) and (b, a) address the same record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PairKey {
    from_location_id: i64,
    to_location_id: i64,
}

impl PairKey {
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            from_location_id: a.min(b),
            to_location_id: a.max(b),
        }
    }

    pub fn from_location_id(&self) -> i64 {
        self.from_location_id
    }

    pub fn to_location_id(&self) -> i64 {
        self.to_location_id
    }
}

/// Cached driving distance between two locations. Derived data, owned by the
/// distance engine; never hand-edited.
/// Table: `location_distances`
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistanceRecord {
    pub from_location_id: i64,
    pub to_location_id: i64,
    pub distance_km: f64,
    pub distance_miles: f64,
    /// Absent when the distance is a straight-line estimate.
    pub duration_text: Option<String>,
    pub duration_minutes: Option<i32>,
    /// Ordered `[lng, lat]` points; empty for straight-line estimates.
    pub route_coords: Vec<[f64; 2]>,
    pub calculated_at: DateTime<Utc>,
}

impl DistanceRecord {
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.from_location_id, self.to_location_id)
    }

    pub fn is_outdated(&self, threshold_days: i64) -> bool {
        self.calculated_at < Utc::now() - Duration::days(threshold_days)
    }

    pub fn distance_display(&self) -> String {
        format!("{} km ({} mi)", self.distance_km, self.distance_miles)
    }

    pub fn duration_display(&self) -> String {
        self.duration_text.clone().unwrap_or_else(|| "—".to_owned())
    }
}

/// Whether a distance lookup was answered from the cache table or computed
/// fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Cached,
    Calculated,
}

/// A continuous route over an ordered sequence of stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRoute {
    pub total_km: f64,
    pub total_miles: f64,
    pub duration_text: String,
    pub duration_minutes: i64,
    pub route_coords: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_order_insensitive() {
        assert_eq!(PairKey::new(9, 4), PairKey::new(4, 9));
        assert_eq!(PairKey::new(4, 9).from_location_id(), 4);
        assert_eq!(PairKey::new(4, 9).to_location_id(), 9);
    }

    #[test]
    fn outdated_threshold() {
        let mut record = record();
        record.calculated_at = Utc::now() - Duration::days(31);
        assert!(record.is_outdated(OUTDATED_AFTER_DAYS));

        record.calculated_at = Utc::now() - Duration::days(2);
        assert!(!record.is_outdated(OUTDATED_AFTER_DAYS));
    }

    #[test]
    fn display_helpers() {
        let record = record();
        assert_eq!(record.distance_display(), "42.2 km (26.2 mi)");
        assert_eq!(record.duration_display(), "—");
    }

    fn record() -> DistanceRecord {
        DistanceRecord {
            from_location_id: 1,
            to_location_id: 2,
            distance_km: 42.2,
            distance_miles: 26.2,
            duration_text: None,
            duration_minutes: None,
            route_coords: Vec::new(),
            calculated_at: Utc::now(),
        }
    }
}
