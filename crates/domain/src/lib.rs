//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod authorized;
mod endpoint;
mod history;
mod permission;

pub use authorized::AuthorizedIdSet;
pub use endpoint::{Endpoint, EndpointInput, EndpointStatus, EndpointType, EndpointTypeFilter};
pub use history::HistoryRecord;
pub use permission::IntegrationPermission;
