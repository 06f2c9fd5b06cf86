use std::sync::Arc;

use integrations_core::{AppError, AppResult, Principal};
use integrations_domain::{AuthorizedIdSet, Endpoint, HistoryRecord, IntegrationPermission};
use tracing::info;
use uuid::Uuid;

use crate::{
    AuthorizationRouter, EndpointListQuery, EndpointRepository, EndpointScope, HistoryQuery,
    MAX_NOTIFICATION_HISTORY_RESULTS, NotificationHistoryRepository, Page, PageLinks,
};

mod assembler;
mod read;
mod write;

pub use assembler::ResultAssembler;

/// Application service for the integrations resource.
///
/// Every operation selects its authorization gate once, authorizes before
/// touching storage, and only then checks existence and ownership.
#[derive(Clone)]
pub struct EndpointService {
    router: AuthorizationRouter,
    endpoint_repository: Arc<dyn EndpointRepository>,
    history_repository: Arc<dyn NotificationHistoryRepository>,
    assembler: ResultAssembler,
}

impl EndpointService {
    /// Creates a new endpoint service.
    #[must_use]
    pub fn new(
        router: AuthorizationRouter,
        endpoint_repository: Arc<dyn EndpointRepository>,
        history_repository: Arc<dyn NotificationHistoryRepository>,
    ) -> Self {
        Self {
            router,
            assembler: ResultAssembler::new(endpoint_repository.clone()),
            endpoint_repository,
            history_repository,
        }
    }

    async fn require_existing(&self, principal: &Principal, endpoint_id: Uuid) -> AppResult<()> {
        let exists = self
            .endpoint_repository
            .exists_by_id_and_org(principal.org_id(), endpoint_id)
            .await?;

        if !exists {
            return Err(endpoint_not_found(endpoint_id));
        }

        Ok(())
    }
}

fn endpoint_not_found(endpoint_id: Uuid) -> AppError {
    AppError::NotFound(format!("endpoint '{endpoint_id}' not found"))
}
