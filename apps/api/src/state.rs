use std::sync::Arc;

use integrations_application::{EndpointService, LegacyRoleResolver};
use sqlx::PgPool;

use crate::api_config::StorageBackend;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub endpoint_service: EndpointService,
    pub role_resolver: Arc<dyn LegacyRoleResolver>,
    pub storage: StorageBackend,
    pub postgres_pool: Option<PgPool>,
    pub max_page_size: u64,
}
