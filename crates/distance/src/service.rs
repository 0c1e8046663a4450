use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use itertools::Itertools;
use model::{
    AggregateRoute, Coordinate, DistanceRecord, DistanceSource, Location, PairKey,
};
use tokio::sync::RwLock;
use utility::geo::{km_to_miles, round1};
use xxhash_rust::xxh3::xxh3_64;

use crate::duration::seconds_to_human;
use crate::error::DistanceError;
use crate::geocode::{address_hash, GEOCODE_TTL_DAYS};
use crate::haversine;
use crate::provider::{ProviderError, RouteProvider};
use crate::route::RouteMetrics;
use crate::store::Store;
use crate::Result;

/// Multi-stop results are kept in process memory for a week.
pub const ROUTE_CACHE_TTL_DAYS: i64 = 7;

/// A distance lookup result, tagged with whether it came from the cache table
/// or was computed on this call.
#[derive(Debug, Clone)]
pub struct DistanceOutcome {
    pub record: DistanceRecord,
    pub source: DistanceSource,
}

struct CachedAggregate {
    computed_at: DateTime<Utc>,
    route: AggregateRoute,
}

/// The distance engine. Owns the persistent pair cache, the geocode cache,
/// and the external routing client; everything else in the application talks
/// to distances exclusively through this service.
pub struct DistanceService<S, P> {
    store: S,
    pub(crate) provider: Arc<P>,
    route_cache: Arc<RwLock<HashMap<u64, CachedAggregate>>>,
}

impl<S: Clone, P> Clone for DistanceService<S, P> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            provider: self.provider.clone(),
            route_cache: self.route_cache.clone(),
        }
    }
}

impl<S, P> DistanceService<S, P>
where
    S: Store,
    P: RouteProvider,
{
    pub fn new(store: S, provider: Arc<P>) -> Self {
        Self {
            store,
            provider,
            route_cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Direct access to persistence for the CRUD surface around the engine.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The stored record for a pair, if any. Never computes.
    pub async fn cached_distance(
        &self,
        a: i64,
        b: i64,
    ) -> Result<Option<DistanceRecord>> {
        Ok(self.store.distance(PairKey::new(a, b)).await?)
    }

    /// Distance between two locations. Answers from the pair cache unless
    /// `force` is set; a fresh computation overwrites the stored record.
    /// Computation failures leave any stale record untouched.
    pub async fn distance_between(
        &self,
        a: i64,
        b: i64,
        force: bool,
    ) -> Result<DistanceOutcome> {
        let key = PairKey::new(a, b);

        if !force {
            if let Some(record) = self.store.distance(key).await? {
                log::debug!("distance cache hit for pair {:?}", key);
                return Ok(DistanceOutcome {
                    record,
                    source: DistanceSource::Cached,
                });
            }
        }

        let origin = self.location(a).await?;
        let destination = self.location(b).await?;
        let metrics = self.compute_pair(&origin, &destination).await?;

        let record = DistanceRecord {
            from_location_id: key.from_location_id(),
            to_location_id: key.to_location_id(),
            distance_km: metrics.km,
            distance_miles: metrics.miles,
            duration_text: metrics.duration_text,
            duration_minutes: metrics.duration_minutes,
            route_coords: metrics.route_coords,
            calculated_at: Utc::now(),
        };
        let record = self.store.upsert_distance(&record).await?;

        Ok(DistanceOutcome {
            record,
            source: DistanceSource::Calculated,
        })
    }

    /// Geocode a free-text address through the persistent cache.
    pub async fn geocode(&self, address: &str, country: &str) -> Result<Coordinate> {
        let address = address.trim();
        if address.is_empty() {
            return Err(DistanceError::GeocodeNotFound(address.to_owned()));
        }

        let hash = address_hash(address, country);
        if let Some(coordinate) = self.store.cached_coordinate(&hash).await? {
            log::debug!("geocode cache hit for {}", address);
            return Ok(coordinate);
        }

        let coordinate = match self.provider.geocode(address, country).await {
            Ok(coordinate) => coordinate,
            Err(ProviderError::NoMatch) => {
                return Err(DistanceError::GeocodeNotFound(address.to_owned()))
            }
            Err(why) => return Err(why.into()),
        };

        let expires_at = Utc::now() + Duration::days(GEOCODE_TTL_DAYS);
        self.store
            .store_coordinate(&hash, coordinate, expires_at)
            .await?;
        Ok(coordinate)
    }

    /// Continuous route over 2+ stops, stitched from per-pair segments.
    /// Results are cached in process for [`ROUTE_CACHE_TTL_DAYS`].
    pub async fn aggregate(&self, ids: &[i64], force: bool) -> Result<AggregateRoute> {
        if ids.len() < 2 {
            return Err(DistanceError::InsufficientWaypoints(ids.len()));
        }

        let cache_key = route_cache_key(ids);
        if !force {
            let cache = self.route_cache.read().await;
            if let Some(entry) = cache.get(&cache_key) {
                if entry.computed_at
                    > Utc::now() - Duration::days(ROUTE_CACHE_TTL_DAYS)
                {
                    log::debug!("multi-route cache hit for {:?}", ids);
                    return Ok(entry.route.clone());
                }
            }
        }

        let mut total_km = 0.0;
        let mut total_minutes: i64 = 0;
        let mut segments: Vec<Vec<[f64; 2]>> = Vec::new();

        for (from, to) in ids.iter().tuple_windows() {
            // Any failed segment aborts the whole route.
            let outcome = self.distance_between(*from, *to, false).await?;
            total_km += outcome.record.distance_km;
            total_minutes += i64::from(outcome.record.duration_minutes.unwrap_or(0));
            segments.push(outcome.record.route_coords);
        }

        let route = AggregateRoute {
            total_km: round1(total_km),
            total_miles: round1(km_to_miles(total_km)),
            duration_text: seconds_to_human((total_minutes * 60) as f64),
            duration_minutes: total_minutes,
            route_coords: crate::stitch::stitch_segments(&segments),
        };

        self.route_cache.write().await.insert(
            cache_key,
            CachedAggregate {
                computed_at: Utc::now(),
                route: route.clone(),
            },
        );

        Ok(route)
    }

    /// Single multi-waypoint directions request. Avoids stitching artifacts
    /// but requires coordinates on every stop.
    pub async fn aggregate_direct(&self, ids: &[i64]) -> Result<AggregateRoute> {
        if ids.len() < 2 {
            return Err(DistanceError::InsufficientWaypoints(ids.len()));
        }

        let mut waypoints = Vec::with_capacity(ids.len());
        for id in ids {
            let location = self.location(*id).await?;
            let coordinate = location
                .coordinate()
                .ok_or(DistanceError::MissingCoordinates(*id))?;
            waypoints.push(coordinate);
        }

        let route = self.provider.directions(&waypoints).await?;
        let metrics = RouteMetrics::from_driving_route(&route);

        Ok(AggregateRoute {
            total_km: metrics.km,
            total_miles: metrics.miles,
            duration_text: seconds_to_human(route.duration_seconds),
            duration_minutes: crate::duration::minutes_rounded(route.duration_seconds),
            route_coords: metrics.route_coords,
        })
    }

    pub(crate) async fn location(&self, id: i64) -> Result<Location> {
        self.store
            .location(id)
            .await?
            .ok_or(DistanceError::LocationNotFound(id))
    }

    /// Fresh metrics for a pair: straight-line when both ends carry
    /// coordinates, otherwise a geocoded routing lookup.
    async fn compute_pair(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<RouteMetrics> {
        if let (Some(a), Some(b)) = (origin.coordinate(), destination.coordinate()) {
            log::debug!(
                "straight-line estimate for {} -> {}",
                origin.short_code,
                destination.short_code
            );
            return Ok(RouteMetrics::from_estimate(haversine::estimate(a, b)));
        }

        let from = self.routable_coordinate(origin).await?;
        let to = self.routable_coordinate(destination).await?;

        let route = self.provider.directions(&[from, to]).await?;
        Ok(RouteMetrics::from_driving_route(&route))
    }

    async fn routable_coordinate(&self, location: &Location) -> Result<Coordinate> {
        if let Some(coordinate) = location.coordinate() {
            return Ok(coordinate);
        }
        self.geocode(&location.full_address(), &location.country.to_lowercase())
            .await
    }
}

fn route_cache_key(ids: &[i64]) -> u64 {
    let raw = ids.iter().map(i64::to_string).join("|");
    xxh3_64(raw.as_bytes())
}
