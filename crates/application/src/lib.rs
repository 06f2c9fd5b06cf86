//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_ports;
mod authorization_service;
mod endpoint_ports;
mod endpoint_service;
mod pagination;

pub use authorization_ports::{
    IntegrationBatch, IntegrationBatchStream, IntegrationDescriptor, LegacyRoleResolver,
    PermissionOracle, WorkspaceResolver,
};
pub use authorization_service::{
    AuthorizationMode, AuthorizationModeConfig, AuthorizationRouter, AuthorizedIdCollector,
    EndpointGate, EndpointScope, LegacyRoleGate, RelationGate, ResolvedGate,
};
pub use endpoint_ports::{
    EndpointListQuery, EndpointListing, EndpointRepository, EndpointSortField, HistoryQuery,
    HistorySortField, NotificationHistoryRepository,
};
pub use endpoint_service::{EndpointService, ResultAssembler};
pub use pagination::{
    MAX_NOTIFICATION_HISTORY_RESULTS, Page, PageLinks, PageMeta, PageRequest, SortBy,
    SortDirection,
};
