use chrono::{DateTime, Utc};
use model::Shipment;

/// A shipment as stored. Only the location ends matter to this service.
/// Table: `shipments`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShipmentRow {
    pub id: i64,
    pub reference: String,
    pub pickup_location_id: Option<i64>,
    pub dc_location_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<ShipmentRow> for Shipment {
    fn from(row: ShipmentRow) -> Self {
        Shipment {
            id: row.id,
            reference: row.reference,
            pickup_location_id: row.pickup_location_id,
            dc_location_id: row.dc_location_id,
            created_at: row.created_at,
        }
    }
}
