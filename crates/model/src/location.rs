use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ExampleData;

/// A geographic point. Serialized as latitude/longitude; the `[lng, lat]`
/// ordering used by route polylines is produced via [`Coordinate::lng_lat`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Pickup,
    DistributionCenter,
    Recycling,
    Other,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::DistributionCenter => "distribution_center",
            Self::Recycling => "recycling",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pickup" => Some(Self::Pickup),
            "distribution_center" => Some(Self::DistributionCenter),
            "recycling" => Some(Self::Recycling),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical site known to the back office: a pickup point, a distribution
/// center, a recycling site, or something else entirely.
/// Table: `locations`
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub guid: Uuid,
    pub short_code: String,
    pub name: Option<String>,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: String,
    pub location_type: LocationType,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Self reference; only valid on distribution centers.
    pub recycling_location_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Location {
    pub fn is_pickup(&self) -> bool {
        self.location_type == LocationType::Pickup
    }

    pub fn is_distribution_center(&self) -> bool {
        self.location_type == LocationType::DistributionCenter
    }

    pub fn is_recycling(&self) -> bool {
        self.location_type == LocationType::Recycling
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                Some(Coordinate::new(latitude, longitude))
            }
            _ => None,
        }
    }

    /// Comma-joined postal address, empty parts omitted. State and zip are
    /// rendered as a single "ST 62704" segment.
    pub fn full_address(&self) -> String {
        let state_zip = self.state.as_ref().map(|state| match &self.zip {
            Some(zip) => format!("{} {}", state, zip),
            None => state.clone(),
        });

        [
            Some(self.address.clone()),
            self.city.clone(),
            state_zip,
            Some(self.country.clone()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Validation failure for the recycling pairing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingViolation;

impl fmt::Display for PairingViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "only distribution centers can be assigned a recycling location"
        )
    }
}

impl std::error::Error for PairingViolation {}

/// The writable subset of a location, used for create and update requests.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDraft {
    pub short_code: String,
    pub name: Option<String>,
    #[serde(default)]
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
    pub location_type: LocationType,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub recycling_location_id: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_country() -> String {
    "US".to_owned()
}

fn default_true() -> bool {
    true
}

impl LocationDraft {
    /// A recycling pairing on anything but a distribution center blocks the
    /// write.
    pub fn validate_pairing(&self) -> Result<(), PairingViolation> {
        if self.recycling_location_id.is_some()
            && self.location_type != LocationType::DistributionCenter
        {
            return Err(PairingViolation);
        }
        Ok(())
    }

    /// True when any postal address field differs from the stored location.
    pub fn address_differs_from(&self, location: &Location) -> bool {
        self.address != location.address
            || self.city != location.city
            || self.state != location.state
            || self.zip != location.zip
            || self.country != location.country
    }
}

impl ExampleData for Location {
    fn example_data() -> Self {
        Location {
            id: 1,
            guid: Uuid::nil(),
            short_code: "DC-SPI".to_owned(),
            name: Some("Springfield Distribution Center".to_owned()),
            address: "100 Main St".to_owned(),
            city: Some("Springfield".to_owned()),
            state: Some("IL".to_owned()),
            zip: Some("62701".to_owned()),
            country: "US".to_owned(),
            location_type: LocationType::DistributionCenter,
            latitude: Some(39.7990),
            longitude: Some(-89.6440),
            recycling_location_id: None,
            is_active: true,
            created_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> Location {
        Location::example_data()
    }

    #[test]
    fn full_address_joins_all_parts() {
        let loc = location();
        assert_eq!(loc.full_address(), "100 Main St, Springfield, IL 62701, US");
    }

    #[test]
    fn full_address_skips_empty_parts() {
        let mut loc = location();
        loc.city = None;
        loc.zip = None;
        assert_eq!(loc.full_address(), "100 Main St, IL, US");
    }

    #[test]
    fn full_address_without_state_drops_zip_segment() {
        let mut loc = location();
        loc.state = None;
        assert_eq!(loc.full_address(), "100 Main St, Springfield, US");
    }

    #[test]
    fn pairing_rejected_for_non_distribution_center() {
        let draft = LocationDraft {
            location_type: LocationType::Recycling,
            recycling_location_id: Some(7),
            ..draft()
        };
        assert_eq!(draft.validate_pairing(), Err(PairingViolation));
    }

    #[test]
    fn pairing_allowed_for_distribution_center() {
        let draft = LocationDraft {
            location_type: LocationType::DistributionCenter,
            recycling_location_id: Some(7),
            ..draft()
        };
        assert!(draft.validate_pairing().is_ok());
    }

    #[test]
    fn address_change_detection() {
        let loc = location();
        let mut draft = draft();
        assert!(!draft.address_differs_from(&loc));
        draft.city = Some("Chatham".to_owned());
        assert!(draft.address_differs_from(&loc));
    }

    fn draft() -> LocationDraft {
        let loc = location();
        LocationDraft {
            short_code: loc.short_code,
            name: loc.name,
            address: loc.address,
            city: loc.city,
            state: loc.state,
            zip: loc.zip,
            country: loc.country,
            location_type: loc.location_type,
            latitude: loc.latitude,
            longitude: loc.longitude,
            recycling_location_id: loc.recycling_location_id,
            is_active: loc.is_active,
        }
    }
}
