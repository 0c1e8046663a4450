use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimal shipment view. The engine only cares about the pickup → DC pair;
/// everything else about shipments lives outside this service.
/// Table: `shipments`
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: i64,
    pub reference: String,
    pub pickup_location_id: Option<i64>,
    pub dc_location_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Shipment {
    /// The pickup → DC pair, when both ends are set.
    pub fn location_pair(&self) -> Option<(i64, i64)> {
        self.pickup_location_id.zip(self.dc_location_id)
    }
}
