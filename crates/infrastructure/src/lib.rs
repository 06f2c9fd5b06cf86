//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_kessel_client;
mod http_support;
mod http_workspace_resolver;
mod in_memory_endpoint_repository;
mod postgres_endpoint_repository;
mod postgres_notification_history_repository;
mod rbac_role_resolver;

pub use http_kessel_client::HttpKesselClient;
pub use http_workspace_resolver::HttpWorkspaceResolver;
pub use in_memory_endpoint_repository::InMemoryEndpointRepository;
pub use postgres_endpoint_repository::PostgresEndpointRepository;
pub use postgres_notification_history_repository::PostgresNotificationHistoryRepository;
pub use rbac_role_resolver::{HttpRbacRoleResolver, StaticRoleResolver};
