use std::{error, fmt, result};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{Coordinate, DistanceRecord, Location, LocationDraft, PairKey, Shipment};

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    /// A uniqueness constraint rejected the write (e.g. duplicate short code).
    Conflict(String),
    Other(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Conflict(what) => write!(f, "conflict: {}", what),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl error::Error for StoreError {}

pub type Result<T> = result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 15,
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.per_page
    }
}

#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Paged<T> {
    pub fn total_pages(&self) -> usize {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page)
    }
}

/// Filter for listing distribution centers by their recycling pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingFilter {
    /// DCs without any recycling partner.
    Unpaired,
    /// DCs paired to the given recycling site.
    PairedTo(i64),
}

#[async_trait]
pub trait LocationStore {
    async fn location(&self, id: i64) -> Result<Option<Location>>;

    /// Locations for the given ids; missing ids are simply absent from the
    /// result.
    async fn locations_by_ids(&self, ids: &[i64]) -> Result<Vec<Location>>;

    async fn list_locations(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Paged<Location>>;

    async fn insert_location(&self, draft: &LocationDraft) -> Result<Location>;

    async fn update_location(&self, id: i64, draft: &LocationDraft)
        -> Result<Location>;

    async fn delete_location(&self, id: i64) -> Result<()>;

    /// All distribution centers currently paired to the given recycling site.
    async fn distribution_centers_paired_to(
        &self,
        recycling_id: i64,
    ) -> Result<Vec<Location>>;

    /// All distribution centers that have a recycling partner.
    async fn paired_distribution_centers(&self) -> Result<Vec<Location>>;

    async fn distribution_centers_page(
        &self,
        filter: Option<PairingFilter>,
        page: PageRequest,
    ) -> Result<Paged<Location>>;

    /// Recycling sites ordered by short code, for filter dropdowns.
    async fn recycling_sites(&self) -> Result<Vec<Location>>;
}

#[async_trait]
pub trait DistanceStore {
    async fn distance(&self, key: PairKey) -> Result<Option<DistanceRecord>>;

    /// Insert or overwrite the record for its normalized pair. Concurrent
    /// writers race; last writer wins, which is acceptable for derived data.
    async fn upsert_distance(&self, record: &DistanceRecord)
        -> Result<DistanceRecord>;

    /// Returns whether a record existed.
    async fn delete_distance(&self, key: PairKey) -> Result<bool>;
}

#[async_trait]
pub trait GeocodeStore {
    /// Cached coordinate for an address hash. Expired entries are misses.
    async fn cached_coordinate(&self, address_hash: &str)
        -> Result<Option<Coordinate>>;

    async fn store_coordinate(
        &self,
        address_hash: &str,
        coordinate: Coordinate,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;
}

#[async_trait]
pub trait ShipmentStore {
    /// Shipments with both a pickup and a DC location assigned, i.e. the ones
    /// whose pair can be routed.
    async fn routable_shipments(&self) -> Result<Vec<Shipment>>;
}

/// Everything the engine needs from persistence.
pub trait Store:
    LocationStore + DistanceStore + GeocodeStore + ShipmentStore + Clone + Send + Sync
{
}

impl<T> Store for T where
    T: LocationStore
        + DistanceStore
        + GeocodeStore
        + ShipmentStore
        + Clone
        + Send
        + Sync
{
}
