use chrono::{DateTime, Utc};
use integrations_domain::{Endpoint, HistoryRecord};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// API representation of an integration.
#[derive(Debug, Serialize)]
pub struct EndpointResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub endpoint_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    pub enabled: bool,
    pub status: &'static str,
    pub server_errors: i32,
    pub created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

impl From<Endpoint> for EndpointResponse {
    fn from(value: Endpoint) -> Self {
        Self {
            id: value.id(),
            name: value.name().to_owned(),
            description: value.description().to_owned(),
            endpoint_type: value.endpoint_type().as_str(),
            sub_type: value.sub_type().map(ToOwned::to_owned),
            enabled: value.enabled(),
            status: value.status().as_str(),
            server_errors: value.server_errors(),
            created: value.created(),
            updated: value.updated(),
            properties: value.properties().cloned(),
        }
    }
}

/// API representation of one delivery attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub id: Uuid,
    pub endpoint_id: Uuid,
    pub invocation_time: i64,
    pub invocation_result: bool,
    pub status: String,
    pub endpoint_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_sub_type: Option<String>,
    pub created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<HistoryRecord> for HistoryResponse {
    fn from(value: HistoryRecord) -> Self {
        Self {
            id: value.id,
            endpoint_id: value.endpoint_id,
            invocation_time: value.invocation_time_ms,
            invocation_result: value.invocation_result,
            status: value.status,
            endpoint_type: value.endpoint_type.as_str(),
            endpoint_sub_type: value.endpoint_sub_type,
            created: value.created,
            details: value.details,
        }
    }
}
