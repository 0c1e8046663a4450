use distance::store::Result;
use model::Shipment;
use sqlx::{Executor, Postgres};

use crate::data_model::shipment::ShipmentRow;

use super::convert_error;

pub async fn routable<'c, E>(executor: E) -> Result<Vec<Shipment>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<ShipmentRow> = sqlx::query_as(
        "
        SELECT id, reference, pickup_location_id, dc_location_id, created_at
        FROM shipments
        WHERE pickup_location_id IS NOT NULL AND dc_location_id IS NOT NULL
        ORDER BY id;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;

    Ok(rows.into_iter().map(Shipment::from).collect())
}
