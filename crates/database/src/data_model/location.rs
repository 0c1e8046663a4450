use chrono::{DateTime, Utc};
use distance::StoreError;
use model::{Location, LocationType};
use uuid::Uuid;

/// A location as stored.
/// Table: `locations`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocationRow {
    pub id: i64,
    pub guid: Uuid,
    pub short_code: String,
    pub name: Option<String>,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: String,
    pub location_type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub recycling_location_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<LocationRow> for Location {
    type Error = StoreError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        // The CHECK constraint keeps this total; an unknown tag means schema
        // drift and is surfaced instead of guessed at.
        let location_type = LocationType::parse(&row.location_type).ok_or_else(|| {
            StoreError::Other(
                format!("unknown location type {:?}", row.location_type).into(),
            )
        })?;

        Ok(Location {
            id: row.id,
            guid: row.guid,
            short_code: row.short_code,
            name: row.name,
            address: row.address,
            city: row.city,
            state: row.state,
            zip: row.zip,
            country: row.country,
            location_type,
            latitude: row.latitude,
            longitude: row.longitude,
            recycling_location_id: row.recycling_location_id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn into_locations(rows: Vec<LocationRow>) -> Result<Vec<Location>, StoreError> {
    rows.into_iter().map(Location::try_from).collect()
}
