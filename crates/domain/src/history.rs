use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::EndpointType;

/// One delivery attempt through an integration.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    /// Stable identifier.
    pub id: Uuid,
    /// Integration the attempt went through.
    pub endpoint_id: Uuid,
    /// Time spent on the delivery, in milliseconds.
    pub invocation_time_ms: i64,
    /// Whether the delivery succeeded.
    pub invocation_result: bool,
    /// Delivery status reported by the connector.
    pub status: String,
    /// Integration type at delivery time.
    pub endpoint_type: EndpointType,
    /// Integration sub type at delivery time.
    pub endpoint_sub_type: Option<String>,
    /// When the attempt was recorded.
    pub created: DateTime<Utc>,
    /// Connector-specific details; only loaded on request.
    pub details: Option<Value>,
}

impl HistoryRecord {
    /// Returns a copy with the detail payload removed.
    #[must_use]
    pub fn without_details(mut self) -> Self {
        self.details = None;
        self
    }
}
