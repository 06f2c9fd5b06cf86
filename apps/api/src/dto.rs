mod common;
mod endpoints;

pub use common::{HealthResponse, PageResponse, StorageHealth};
pub use endpoints::{EndpointResponse, HistoryResponse};
