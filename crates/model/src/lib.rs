pub mod distance;
pub mod location;
pub mod shipment;

pub use distance::{AggregateRoute, DistanceRecord, DistanceSource, PairKey};
pub use location::{Coordinate, Location, LocationDraft, LocationType, PairingViolation};
pub use shipment::Shipment;

pub trait ExampleData {
    fn example_data() -> Self;
}
