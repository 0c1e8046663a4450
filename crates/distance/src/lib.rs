pub mod batch;
pub mod duration;
pub mod error;
pub mod geocode;
pub mod haversine;
pub mod provider;
pub mod route;
pub mod service;
pub mod stitch;
pub mod store;
pub mod trigger;

pub use batch::BatchSummary;
pub use error::DistanceError;
pub use provider::{DrivingRoute, ProviderError, RouteProvider};
pub use service::{DistanceOutcome, DistanceService};
pub use store::{Store, StoreError};
pub use trigger::{RecalcEvent, RecalcQueue};

pub type Result<T> = std::result::Result<T, DistanceError>;

#[cfg(test)]
pub(crate) mod test_support;
