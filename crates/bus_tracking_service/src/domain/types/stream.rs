use serde::{Deserialize, Serialize};

/// Subscription control message. Both identifiers arrive as raw strings,
/// malformed values are dropped without an error.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub connection_id: String,
    pub vehicle_id: String,
}
