use std::{error, fmt};

use async_trait::async_trait;
use model::Coordinate;

/// A raw driving route as reported by the directions service.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingRoute {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Full-resolution geometry, ordered `[lng, lat]` points.
    pub geometry: Vec<[f64; 2]>,
}

#[derive(Debug)]
pub enum ProviderError {
    /// No credentials configured; the client is constructible without them so
    /// that callers get a typed error instead of a startup failure.
    MissingConfiguration,
    /// The geocoder returned zero matches.
    NoMatch,
    /// The directions service returned zero routes.
    NoRoute,
    RateLimitReached,
    InvalidResponse {
        status: u16,
        url: String,
        body: Option<String>,
    },
    Transport(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingConfiguration => write!(f, "credentials not configured"),
            Self::NoMatch => write!(f, "no geocoding match"),
            Self::NoRoute => write!(f, "no route"),
            Self::RateLimitReached => write!(f, "rate limit reached"),
            Self::InvalidResponse { status, url, body } => match body {
                Some(text) => {
                    write!(f, "invalid response ({}) from {}: {}", status, url, text)
                }
                None => write!(f, "invalid response ({}) from {}", status, url),
            },
            Self::Transport(why) => write!(f, "transport error: {}", why),
        }
    }
}

impl error::Error for ProviderError {}

/// External geocoding and driving-directions services, injected into the
/// engine at construction so tests can substitute doubles.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Best-match coordinate for a free-text address, constrained to
    /// address-type results within the given country.
    async fn geocode(
        &self,
        address: &str,
        country: &str,
    ) -> Result<Coordinate, ProviderError>;

    /// Driving route through two or more waypoints with full-resolution
    /// geometry.
    async fn directions(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<DrivingRoute, ProviderError>;
}
