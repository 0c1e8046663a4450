use crate::provider::RouteProvider;
use crate::service::DistanceService;
use crate::store::Store;
use crate::Result;

/// Outcome counters for a batch population run. No transaction wraps a
/// batch; partial completion is expected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl<S, P> DistanceService<S, P>
where
    S: Store,
    P: RouteProvider,
{
    /// Compute (or with `force` recompute) the distance for every DC that has
    /// a recycling partner. Pairs are processed one at a time; individual
    /// failures are logged and skipped.
    pub async fn populate_recycling_distances(
        &self,
        force: bool,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for dc in self.store().paired_distribution_centers().await? {
            let Some(recycling_id) = dc.recycling_location_id else {
                continue;
            };

            if !force
                && self.cached_distance(dc.id, recycling_id).await?.is_some()
            {
                summary.skipped += 1;
                continue;
            }

            match self.distance_between(dc.id, recycling_id, force).await {
                Ok(_) => {
                    log::info!(
                        "processed DC {} -> recycling {}",
                        dc.short_code,
                        recycling_id
                    );
                    summary.processed += 1;
                }
                Err(why) => {
                    log::warn!(
                        "failed DC {} -> recycling {}: {}",
                        dc.short_code,
                        recycling_id,
                        why
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Compute the pickup -> DC distance for every routable shipment.
    pub async fn populate_shipment_distances(
        &self,
        force: bool,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for shipment in self.store().routable_shipments().await? {
            let Some((pickup_id, dc_id)) = shipment.location_pair() else {
                summary.skipped += 1;
                continue;
            };

            if !force && self.cached_distance(pickup_id, dc_id).await?.is_some() {
                summary.skipped += 1;
                continue;
            }

            match self.distance_between(pickup_id, dc_id, force).await {
                Ok(_) => {
                    log::info!(
                        "processed shipment {}: {} -> {}",
                        shipment.reference,
                        pickup_id,
                        dc_id
                    );
                    summary.processed += 1;
                }
                Err(why) => {
                    log::warn!(
                        "failed shipment {} ({} -> {}): {}",
                        shipment.reference,
                        pickup_id,
                        dc_id,
                        why
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
