use std::sync::Arc;

use integrations_application::{EndpointRepository, NotificationHistoryRepository};
use integrations_infrastructure::{
    InMemoryEndpointRepository, PostgresEndpointRepository, PostgresNotificationHistoryRepository,
};
use sqlx::PgPool;

pub(super) struct RepositorySet {
    pub(super) endpoint_repository: Arc<dyn EndpointRepository>,
    pub(super) history_repository: Arc<dyn NotificationHistoryRepository>,
}

/// Postgres repositories when a pool is available, otherwise one shared in-memory store.
pub(super) fn build_repository_set(pool: Option<&PgPool>) -> RepositorySet {
    match pool {
        Some(pool) => RepositorySet {
            endpoint_repository: Arc::new(PostgresEndpointRepository::new(pool.clone())),
            history_repository: Arc::new(PostgresNotificationHistoryRepository::new(pool.clone())),
        },
        None => {
            let store = Arc::new(InMemoryEndpointRepository::new());
            RepositorySet {
                endpoint_repository: store.clone(),
                history_repository: store,
            }
        }
    }
}
