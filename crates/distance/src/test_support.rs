//! In-memory store and scripted provider used by the engine's tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{
    Coordinate, DistanceRecord, Location, LocationDraft, LocationType, PairKey,
    Shipment,
};
use uuid::Uuid;

use crate::provider::{DrivingRoute, ProviderError, RouteProvider};
use crate::store::{
    DistanceStore, GeocodeStore, LocationStore, PageRequest, Paged, PairingFilter,
    Result, ShipmentStore, StoreError,
};

#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    locations: HashMap<i64, Location>,
    distances: HashMap<PairKey, DistanceRecord>,
    geocodes: HashMap<String, (Coordinate, DateTime<Utc>)>,
    shipments: Vec<Shipment>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_location<F>(
        &self,
        short_code: &str,
        location_type: LocationType,
        customize: F,
    ) -> Location
    where
        F: FnOnce(&mut Location),
    {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let mut location = Location {
            id: inner.next_id,
            guid: Uuid::new_v4(),
            short_code: short_code.to_owned(),
            name: None,
            address: String::new(),
            city: None,
            state: None,
            zip: None,
            country: "US".to_owned(),
            location_type,
            latitude: None,
            longitude: None,
            recycling_location_id: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        customize(&mut location);
        inner.locations.insert(location.id, location.clone());
        location
    }

    pub fn update_address(&self, id: i64, address: &str) -> Location {
        let mut inner = self.inner.lock().unwrap();
        let location = inner.locations.get_mut(&id).expect("unknown location");
        location.address = address.to_owned();
        location.updated_at = Utc::now();
        location.clone()
    }

    pub fn clear_pairing(&self, id: i64) {
        let mut inner = self.inner.lock().unwrap();
        let location = inner.locations.get_mut(&id).expect("unknown location");
        location.recycling_location_id = None;
    }

    pub fn add_shipment(&self, reference: &str, pickup_id: i64, dc_id: i64) {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.shipments.len() as i64 + 1;
        inner.shipments.push(Shipment {
            id,
            reference: reference.to_owned(),
            pickup_location_id: Some(pickup_id),
            dc_location_id: Some(dc_id),
            created_at: Utc::now(),
        });
    }

    pub fn distance_record(&self, key: PairKey) -> Option<DistanceRecord> {
        self.inner.lock().unwrap().distances.get(&key).cloned()
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn location(&self, id: i64) -> Result<Option<Location>> {
        Ok(self.inner.lock().unwrap().locations.get(&id).cloned())
    }

    async fn locations_by_ids(&self, ids: &[i64]) -> Result<Vec<Location>> {
        let inner = self.inner.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| inner.locations.get(id).cloned())
            .collect())
    }

    async fn list_locations(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Paged<Location>> {
        let inner = self.inner.lock().unwrap();
        let needle = search.map(str::to_lowercase);
        let mut items: Vec<Location> = inner
            .locations
            .values()
            .filter(|loc| match &needle {
                Some(needle) => {
                    loc.short_code.to_lowercase().contains(needle)
                        || loc.address.to_lowercase().contains(needle)
                }
                None => true,
            })
            .cloned()
            .collect();
        items.sort_by_key(|loc| loc.id);
        let total = items.len();
        let items = items
            .into_iter()
            .skip(page.offset())
            .take(page.per_page)
            .collect();
        Ok(Paged {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn insert_location(&self, draft: &LocationDraft) -> Result<Location> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .locations
            .values()
            .any(|loc| loc.short_code == draft.short_code)
        {
            return Err(StoreError::Conflict(draft.short_code.clone()));
        }
        inner.next_id += 1;
        let location = Location {
            id: inner.next_id,
            guid: Uuid::new_v4(),
            short_code: draft.short_code.clone(),
            name: draft.name.clone(),
            address: draft.address.clone(),
            city: draft.city.clone(),
            state: draft.state.clone(),
            zip: draft.zip.clone(),
            country: draft.country.clone(),
            location_type: draft.location_type,
            latitude: draft.latitude,
            longitude: draft.longitude,
            recycling_location_id: draft.recycling_location_id,
            is_active: draft.is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        inner.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn update_location(
        &self,
        id: i64,
        draft: &LocationDraft,
    ) -> Result<Location> {
        let mut inner = self.inner.lock().unwrap();
        let location = inner.locations.get_mut(&id).ok_or(StoreError::NotFound)?;
        location.short_code = draft.short_code.clone();
        location.name = draft.name.clone();
        location.address = draft.address.clone();
        location.city = draft.city.clone();
        location.state = draft.state.clone();
        location.zip = draft.zip.clone();
        location.country = draft.country.clone();
        location.location_type = draft.location_type;
        location.latitude = draft.latitude;
        location.longitude = draft.longitude;
        location.recycling_location_id = draft.recycling_location_id;
        location.is_active = draft.is_active;
        location.updated_at = Utc::now();
        Ok(location.clone())
    }

    async fn delete_location(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .locations
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn distribution_centers_paired_to(
        &self,
        recycling_id: i64,
    ) -> Result<Vec<Location>> {
        let inner = self.inner.lock().unwrap();
        let mut linked: Vec<Location> = inner
            .locations
            .values()
            .filter(|loc| {
                loc.is_distribution_center()
                    && loc.recycling_location_id == Some(recycling_id)
            })
            .cloned()
            .collect();
        linked.sort_by_key(|loc| loc.id);
        Ok(linked)
    }

    async fn paired_distribution_centers(&self) -> Result<Vec<Location>> {
        let inner = self.inner.lock().unwrap();
        let mut linked: Vec<Location> = inner
            .locations
            .values()
            .filter(|loc| {
                loc.is_distribution_center() && loc.recycling_location_id.is_some()
            })
            .cloned()
            .collect();
        linked.sort_by_key(|loc| loc.id);
        Ok(linked)
    }

    async fn distribution_centers_page(
        &self,
        filter: Option<PairingFilter>,
        page: PageRequest,
    ) -> Result<Paged<Location>> {
        let inner = self.inner.lock().unwrap();
        let mut items: Vec<Location> = inner
            .locations
            .values()
            .filter(|loc| loc.is_distribution_center())
            .filter(|loc| match filter {
                Some(PairingFilter::Unpaired) => loc.recycling_location_id.is_none(),
                Some(PairingFilter::PairedTo(id)) => {
                    loc.recycling_location_id == Some(id)
                }
                None => true,
            })
            .cloned()
            .collect();
        items.sort_by_key(|loc| loc.id);
        let total = items.len();
        let items = items
            .into_iter()
            .skip(page.offset())
            .take(page.per_page)
            .collect();
        Ok(Paged {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn recycling_sites(&self) -> Result<Vec<Location>> {
        let inner = self.inner.lock().unwrap();
        let mut sites: Vec<Location> = inner
            .locations
            .values()
            .filter(|loc| loc.is_recycling())
            .cloned()
            .collect();
        sites.sort_by(|a, b| a.short_code.cmp(&b.short_code));
        Ok(sites)
    }
}

#[async_trait]
impl DistanceStore for MemoryStore {
    async fn distance(&self, key: PairKey) -> Result<Option<DistanceRecord>> {
        Ok(self.inner.lock().unwrap().distances.get(&key).cloned())
    }

    async fn upsert_distance(
        &self,
        record: &DistanceRecord,
    ) -> Result<DistanceRecord> {
        self.inner
            .lock()
            .unwrap()
            .distances
            .insert(record.pair_key(), record.clone());
        Ok(record.clone())
    }

    async fn delete_distance(&self, key: PairKey) -> Result<bool> {
        Ok(self.inner.lock().unwrap().distances.remove(&key).is_some())
    }
}

#[async_trait]
impl GeocodeStore for MemoryStore {
    async fn cached_coordinate(
        &self,
        address_hash: &str,
    ) -> Result<Option<Coordinate>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .geocodes
            .get(address_hash)
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .map(|(coordinate, _)| *coordinate))
    }

    async fn store_coordinate(
        &self,
        address_hash: &str,
        coordinate: Coordinate,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .geocodes
            .insert(address_hash.to_owned(), (coordinate, expires_at));
        Ok(())
    }
}

#[async_trait]
impl ShipmentStore for MemoryStore {
    async fn routable_shipments(&self) -> Result<Vec<Shipment>> {
        Ok(self.inner.lock().unwrap().shipments.clone())
    }
}

/// Provider double. Geocodes resolve to a single catch-all coordinate;
/// directions are consumed from a queue, one route per call.
pub struct ScriptedProvider {
    configured: AtomicBool,
    catch_all: Mutex<Option<Coordinate>>,
    routes: Mutex<VecDeque<DrivingRoute>>,
    geocode_calls: AtomicUsize,
    directions_calls: AtomicUsize,
    last_waypoint_count: AtomicUsize,
}

impl ScriptedProvider {
    pub fn configured() -> Self {
        Self {
            configured: AtomicBool::new(true),
            catch_all: Mutex::new(None),
            routes: Mutex::new(VecDeque::new()),
            geocode_calls: AtomicUsize::new(0),
            directions_calls: AtomicUsize::new(0),
            last_waypoint_count: AtomicUsize::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        let provider = Self::configured();
        provider.configured.store(false, Ordering::SeqCst);
        provider
    }

    pub fn configure(&self) {
        self.configured.store(true, Ordering::SeqCst);
    }

    pub fn geocode_everything(&self, coordinate: Coordinate) {
        *self.catch_all.lock().unwrap() = Some(coordinate);
    }

    pub fn push_route(&self, route: DrivingRoute) {
        self.routes.lock().unwrap().push_back(route);
    }

    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn directions_calls(&self) -> usize {
        self.directions_calls.load(Ordering::SeqCst)
    }

    pub fn last_waypoint_count(&self) -> usize {
        self.last_waypoint_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteProvider for ScriptedProvider {
    async fn geocode(
        &self,
        _address: &str,
        _country: &str,
    ) -> std::result::Result<Coordinate, ProviderError> {
        if !self.configured.load(Ordering::SeqCst) {
            return Err(ProviderError::MissingConfiguration);
        }
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        (*self.catch_all.lock().unwrap()).ok_or(ProviderError::NoMatch)
    }

    async fn directions(
        &self,
        waypoints: &[Coordinate],
    ) -> std::result::Result<DrivingRoute, ProviderError> {
        if !self.configured.load(Ordering::SeqCst) {
            return Err(ProviderError::MissingConfiguration);
        }
        self.directions_calls.fetch_add(1, Ordering::SeqCst);
        self.last_waypoint_count
            .store(waypoints.len(), Ordering::SeqCst);
        self.routes
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(ProviderError::NoRoute)
    }
}
