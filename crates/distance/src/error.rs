use std::{error, fmt};

use crate::provider::ProviderError;
use crate::store::StoreError;

/// Failures of the distance engine. All of these are returned to the caller
/// as values; batch callers are expected to skip-and-log, interactive callers
/// to degrade.
#[derive(Debug)]
pub enum DistanceError {
    /// One of the referenced location ids does not exist.
    LocationNotFound(i64),
    /// The address lookup service returned no usable match.
    GeocodeNotFound(String),
    /// The directions service returned no route between the endpoints.
    RouteNotFound,
    /// No routing credentials are configured.
    MissingConfiguration,
    /// A multi-waypoint request requires coordinates on every stop.
    MissingCoordinates(i64),
    /// A route needs at least two stops.
    InsufficientWaypoints(usize),
    Store(StoreError),
    Provider(ProviderError),
}

impl fmt::Display for DistanceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::LocationNotFound(id) => write!(f, "location {} does not exist", id),
            Self::GeocodeNotFound(address) => {
                write!(f, "could not geocode address: {}", address)
            }
            Self::RouteNotFound => write!(f, "no driving route found"),
            Self::MissingConfiguration => {
                write!(f, "routing service credentials are not configured")
            }
            Self::MissingCoordinates(id) => {
                write!(f, "location {} has no coordinates", id)
            }
            Self::InsufficientWaypoints(count) => {
                write!(f, "a route needs at least 2 stops, got {}", count)
            }
            Self::Store(why) => write!(f, "store error: {}", why),
            Self::Provider(why) => write!(f, "routing service error: {}", why),
        }
    }
}

impl error::Error for DistanceError {}

impl From<StoreError> for DistanceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ProviderError> for DistanceError {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::MissingConfiguration => Self::MissingConfiguration,
            ProviderError::NoRoute => Self::RouteNotFound,
            other => Self::Provider(other),
        }
    }
}
