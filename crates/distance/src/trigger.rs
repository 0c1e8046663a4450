use model::{Location, PairKey};
use tokio::sync::mpsc;

use crate::provider::RouteProvider;
use crate::service::DistanceService;
use crate::store::Store;
use crate::Result;

/// A location mutation that invalidates cached distances. Emitted by the
/// location write path and consumed either inline or by a worker task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecalcEvent {
    /// A distribution center's address or recycling pairing changed. The
    /// previous partner id is carried along so a cleared pairing can delete
    /// exactly the record it owned.
    DistributionCenterChanged {
        dc_id: i64,
        previous_recycling_id: Option<i64>,
    },
    /// A recycling site's address changed; every DC paired to it is affected.
    RecyclingSiteMoved { recycling_id: i64 },
}

impl RecalcEvent {
    /// Compare a location before and after a save and decide whether cached
    /// distances are affected.
    pub fn detect(before: &Location, after: &Location) -> Option<Self> {
        let address_changed = before.address != after.address
            || before.city != after.city
            || before.state != after.state
            || before.zip != after.zip
            || before.country != after.country;

        if after.is_distribution_center() {
            let pairing_changed =
                before.recycling_location_id != after.recycling_location_id;
            if pairing_changed || address_changed {
                return Some(Self::DistributionCenterChanged {
                    dc_id: after.id,
                    previous_recycling_id: before.recycling_location_id,
                });
            }
        } else if after.is_recycling() && address_changed {
            return Some(Self::RecyclingSiteMoved {
                recycling_id: after.id,
            });
        }

        None
    }
}

impl<S, P> DistanceService<S, P>
where
    S: Store,
    P: RouteProvider,
{
    /// Apply a recalculation event. Per-pair computation failures are logged
    /// and skipped so a batch of affected pairs always runs to completion;
    /// only store failures abort.
    pub async fn recalc(&self, event: RecalcEvent) -> Result<()> {
        match event {
            RecalcEvent::DistributionCenterChanged {
                dc_id,
                previous_recycling_id,
            } => {
                let dc = self.location(dc_id).await?;
                match dc.recycling_location_id {
                    Some(recycling_id) => {
                        if let Err(why) =
                            self.distance_between(dc_id, recycling_id, true).await
                        {
                            log::warn!(
                                "distance recompute failed for DC {} -> recycling {}: {}",
                                dc_id,
                                recycling_id,
                                why
                            );
                        }
                    }
                    None => {
                        if let Some(previous) = previous_recycling_id {
                            self.store()
                                .delete_distance(PairKey::new(dc_id, previous))
                                .await?;
                            log::info!(
                                "removed cached distance for DC {} after pairing was cleared",
                                dc_id
                            );
                        }
                    }
                }
            }
            RecalcEvent::RecyclingSiteMoved { recycling_id } => {
                let linked = self
                    .store()
                    .distribution_centers_paired_to(recycling_id)
                    .await?;
                for dc in linked {
                    if let Err(why) =
                        self.distance_between(dc.id, recycling_id, true).await
                    {
                        log::warn!(
                            "distance recompute failed for DC {} -> recycling {}: {}",
                            dc.id,
                            recycling_id,
                            why
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

/// Handle for pushing recalculation events to a background worker.
#[derive(Clone)]
pub struct RecalcQueue(mpsc::Sender<RecalcEvent>);

impl RecalcQueue {
    /// Returns false when the worker has shut down.
    pub async fn push(&self, event: RecalcEvent) -> bool {
        self.0.send(event).await.is_ok()
    }
}

/// Spawn a worker task consuming recalculation events, for deployments that
/// want the location write path decoupled from routing-service latency.
pub fn spawn_worker<S, P>(service: DistanceService<S, P>) -> RecalcQueue
where
    S: Store + 'static,
    P: RouteProvider + 'static,
{
    let (sender, mut receiver) = mpsc::channel::<RecalcEvent>(64);
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            if let Err(why) = service.recalc(event).await {
                log::warn!("recalculation worker: {}", why);
            }
        }
    });
    RecalcQueue(sender)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::provider::DrivingRoute;
    use crate::test_support::{MemoryStore, ScriptedProvider};
    use model::{Coordinate, LocationType};

    fn route() -> DrivingRoute {
        DrivingRoute {
            distance_meters: 12000.0,
            duration_seconds: 900.0,
            geometry: vec![[-89.65, 39.78], [-89.6, 39.8]],
        }
    }

    fn service(
        store: MemoryStore,
        provider: ScriptedProvider,
    ) -> DistanceService<MemoryStore, ScriptedProvider> {
        DistanceService::new(store, Arc::new(provider))
    }

    #[tokio::test]
    async fn address_change_forces_recompute_despite_fresh_cache() {
        let store = MemoryStore::new();
        let rec = store.add_location("REC", LocationType::Recycling, |loc| {
            loc.address = "200 Oak Ave".to_owned();
        });
        let dc = store.add_location("DC", LocationType::DistributionCenter, |loc| {
            loc.address = "100 Main St".to_owned();
            loc.recycling_location_id = Some(rec.id);
        });

        let provider = ScriptedProvider::configured();
        provider.geocode_everything(Coordinate::new(39.78, -89.65));
        provider.push_route(route());
        provider.push_route(route());

        let service = service(store.clone(), provider);
        service.distance_between(dc.id, rec.id, false).await.unwrap();
        assert_eq!(service.provider.directions_calls(), 1);

        let before = dc.clone();
        let after = store.update_address(dc.id, "300 Elm St");
        let event = RecalcEvent::detect(&before, &after).unwrap();
        assert!(matches!(
            event,
            RecalcEvent::DistributionCenterChanged { .. }
        ));

        service.recalc(event).await.unwrap();
        assert_eq!(service.provider.directions_calls(), 2);
    }

    #[tokio::test]
    async fn cleared_pairing_deletes_the_cached_record() {
        let store = MemoryStore::new();
        let rec = store.add_location("REC", LocationType::Recycling, |loc| {
            loc.address = "200 Oak Ave".to_owned();
        });
        let dc = store.add_location("DC", LocationType::DistributionCenter, |loc| {
            loc.address = "100 Main St".to_owned();
            loc.recycling_location_id = Some(rec.id);
        });

        let provider = ScriptedProvider::configured();
        provider.geocode_everything(Coordinate::new(39.78, -89.65));
        provider.push_route(route());

        let service = service(store.clone(), provider);
        service.distance_between(dc.id, rec.id, false).await.unwrap();
        assert!(store.distance_record(PairKey::new(dc.id, rec.id)).is_some());

        store.clear_pairing(dc.id);
        service
            .recalc(RecalcEvent::DistributionCenterChanged {
                dc_id: dc.id,
                previous_recycling_id: Some(rec.id),
            })
            .await
            .unwrap();

        assert!(store.distance_record(PairKey::new(dc.id, rec.id)).is_none());
    }

    #[tokio::test]
    async fn recycling_move_recomputes_every_paired_dc() {
        let store = MemoryStore::new();
        let rec = store.add_location("REC", LocationType::Recycling, |loc| {
            loc.address = "200 Oak Ave".to_owned();
        });
        let dc_a = store.add_location("DC-A", LocationType::DistributionCenter, |loc| {
            loc.address = "100 Main St".to_owned();
            loc.recycling_location_id = Some(rec.id);
        });
        let dc_b = store.add_location("DC-B", LocationType::DistributionCenter, |loc| {
            loc.address = "500 Pine Rd".to_owned();
            loc.recycling_location_id = Some(rec.id);
        });

        let provider = ScriptedProvider::configured();
        provider.geocode_everything(Coordinate::new(39.78, -89.65));
        provider.push_route(route());
        provider.push_route(route());

        let service = service(store.clone(), provider);
        service
            .recalc(RecalcEvent::RecyclingSiteMoved { recycling_id: rec.id })
            .await
            .unwrap();

        assert!(store.distance_record(PairKey::new(dc_a.id, rec.id)).is_some());
        assert!(store.distance_record(PairKey::new(dc_b.id, rec.id)).is_some());
        assert_eq!(service.provider.directions_calls(), 2);
    }

    #[tokio::test]
    async fn recompute_failures_do_not_abort_the_event() {
        let store = MemoryStore::new();
        let rec = store.add_location("REC", LocationType::Recycling, |loc| {
            loc.address = "200 Oak Ave".to_owned();
        });
        let dc = store.add_location("DC", LocationType::DistributionCenter, |loc| {
            loc.address = "100 Main St".to_owned();
            loc.recycling_location_id = Some(rec.id);
        });

        // Unconfigured provider: the recompute fails, the event still
        // completes.
        let service = service(store.clone(), ScriptedProvider::unconfigured());
        let result = service
            .recalc(RecalcEvent::DistributionCenterChanged {
                dc_id: dc.id,
                previous_recycling_id: Some(rec.id),
            })
            .await;
        assert!(result.is_ok());
        assert!(store.distance_record(PairKey::new(dc.id, rec.id)).is_none());
    }

    #[tokio::test]
    async fn no_event_for_unrelated_changes() {
        let store = MemoryStore::new();
        let pickup = store.add_location("PU", LocationType::Pickup, |loc| {
            loc.address = "1 First St".to_owned();
        });
        let before = pickup.clone();
        let after = store.update_address(pickup.id, "9 Ninth St");
        assert_eq!(RecalcEvent::detect(&before, &after), None);

        let rec = store.add_location("REC", LocationType::Recycling, |loc| {
            loc.address = "200 Oak Ave".to_owned();
        });
        let mut renamed = rec.clone();
        renamed.name = Some("North Yard".to_owned());
        assert_eq!(RecalcEvent::detect(&rec, &renamed), None);
    }

    #[tokio::test]
    async fn worker_consumes_queued_events() {
        let store = MemoryStore::new();
        let rec = store.add_location("REC", LocationType::Recycling, |loc| {
            loc.address = "200 Oak Ave".to_owned();
        });
        let dc = store.add_location("DC", LocationType::DistributionCenter, |loc| {
            loc.address = "100 Main St".to_owned();
            loc.recycling_location_id = Some(rec.id);
        });

        let provider = ScriptedProvider::configured();
        provider.geocode_everything(Coordinate::new(39.78, -89.65));
        provider.push_route(route());

        let service = service(store.clone(), provider);
        let queue = spawn_worker(service);
        assert!(
            queue
                .push(RecalcEvent::DistributionCenterChanged {
                    dc_id: dc.id,
                    previous_recycling_id: Some(rec.id),
                })
                .await
        );

        // Wait for the worker to drain the event.
        for _ in 0..50 {
            if store.distance_record(PairKey::new(dc.id, rec.id)).is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(store.distance_record(PairKey::new(dc.id, rec.id)).is_some());
    }
}
