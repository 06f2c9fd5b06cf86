use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use integrations_application::{
    EndpointListQuery, EndpointListing, EndpointRepository, EndpointSortField, HistoryQuery,
    HistorySortField, NotificationHistoryRepository, SortDirection,
};
use integrations_core::{AppError, AppResult, OrgId};
use integrations_domain::{AuthorizedIdSet, Endpoint, HistoryRecord};
use tokio::sync::RwLock;
use uuid::Uuid;


/// In-memory endpoint and history store.
#[derive(Debug, Default)]
pub struct InMemoryEndpointRepository {
    endpoints: RwLock<HashMap<Uuid, Endpoint>>,
    history: RwLock<Vec<(OrgId, HistoryRecord)>>,
}

impl InMemoryEndpointRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new endpoint.
    pub async fn insert_endpoint(&self, endpoint: Endpoint) -> AppResult<()> {
        let mut endpoints = self.endpoints.write().await;

        if endpoints.contains_key(&endpoint.id()) {
            return Err(AppError::Conflict(format!(
                "endpoint '{}' already exists",
                endpoint.id()
            )));
        }

        endpoints.insert(endpoint.id(), endpoint);
        Ok(())
    }

    /// Stores a delivery record for an endpoint of the organization.
    pub async fn insert_history(&self, org_id: OrgId, record: HistoryRecord) -> AppResult<()> {
        let owned = self
            .endpoints
            .read()
            .await
            .get(&record.endpoint_id)
            .is_some_and(|endpoint| endpoint.org_id() == &org_id);

        if !owned {
            return Err(AppError::NotFound(format!(
                "endpoint '{}' not found in org '{org_id}'",
                record.endpoint_id
            )));
        }

        self.history.write().await.push((org_id, record));
        Ok(())
    }
}

fn compare_endpoints(left: &Endpoint, right: &Endpoint, field: EndpointSortField) -> Ordering {
    match field {
        EndpointSortField::Name => left.name().cmp(right.name()),
        EndpointSortField::Type => left
            .endpoint_type()
            .as_str()
            .cmp(right.endpoint_type().as_str())
            .then_with(|| left.sub_type().cmp(&right.sub_type())),
        EndpointSortField::Enabled => left.enabled().cmp(&right.enabled()),
        EndpointSortField::Created => left.created().cmp(&right.created()),
    }
}

fn compare_history(left: &HistoryRecord, right: &HistoryRecord, field: HistorySortField) -> Ordering {
    match field {
        HistorySortField::Created => left.created.cmp(&right.created),
        HistorySortField::InvocationResult => left.invocation_result.cmp(&right.invocation_result),
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn window<T>(values: Vec<T>, offset: u64, limit: Option<u64>) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = limit
        .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
        .unwrap_or(usize::MAX);

    values.into_iter().skip(offset).take(limit).collect()
}

#[async_trait]
impl EndpointRepository for InMemoryEndpointRepository {
    async fn exists_by_id_and_org(&self, org_id: &OrgId, endpoint_id: Uuid) -> AppResult<bool> {
        Ok(self
            .endpoints
            .read()
            .await
            .get(&endpoint_id)
            .is_some_and(|endpoint| endpoint.org_id() == org_id))
    }

    async fn find_endpoint(
        &self,
        org_id: &OrgId,
        endpoint_id: Uuid,
    ) -> AppResult<Option<Endpoint>> {
        Ok(self
            .endpoints
            .read()
            .await
            .get(&endpoint_id)
            .filter(|endpoint| endpoint.org_id() == org_id)
            .cloned())
    }

    async fn list_endpoints(
        &self,
        org_id: &OrgId,
        query: &EndpointListQuery,
        authorized: Option<&AuthorizedIdSet>,
    ) -> AppResult<EndpointListing> {
        let mut matching: Vec<Endpoint> = self
            .endpoints
            .read()
            .await
            .values()
            .filter(|endpoint| endpoint.org_id() == org_id)
            .filter(|endpoint| authorized.is_none_or(|set| set.contains(&endpoint.id())))
            .filter(|endpoint| query.matches(endpoint))
            .cloned()
            .collect();

        matching.sort_by(|left, right| {
            directed(
                compare_endpoints(left, right, query.sort.field),
                query.sort.direction,
            )
            .then_with(|| left.id().cmp(&right.id()))
        });

        let total = matching.len() as u64;
        Ok(EndpointListing {
            endpoints: window(matching, query.page.offset(), query.page.limit()),
            total,
        })
    }

    async fn set_enabled(
        &self,
        org_id: &OrgId,
        endpoint_id: Uuid,
        enabled: bool,
    ) -> AppResult<bool> {
        let mut endpoints = self.endpoints.write().await;
        let Some(endpoint) = endpoints
            .get(&endpoint_id)
            .filter(|endpoint| endpoint.org_id() == org_id)
            .cloned()
        else {
            return Ok(false);
        };

        endpoints.insert(endpoint_id, endpoint.with_enabled(enabled, Utc::now()));
        Ok(true)
    }

    async fn delete_endpoint(&self, org_id: &OrgId, endpoint_id: Uuid) -> AppResult<bool> {
        let mut endpoints = self.endpoints.write().await;
        let owned = endpoints
            .get(&endpoint_id)
            .is_some_and(|endpoint| endpoint.org_id() == org_id);
        if !owned {
            return Ok(false);
        }

        endpoints.remove(&endpoint_id);
        self.history
            .write()
            .await
            .retain(|(_, record)| record.endpoint_id != endpoint_id);
        Ok(true)
    }
}

#[async_trait]
impl NotificationHistoryRepository for InMemoryEndpointRepository {
    async fn list_history(
        &self,
        org_id: &OrgId,
        endpoint_id: Uuid,
        query: &HistoryQuery,
        authorized: Option<&AuthorizedIdSet>,
    ) -> AppResult<Vec<HistoryRecord>> {
        if authorized.is_some_and(|set| !set.contains(&endpoint_id)) {
            return Ok(Vec::new());
        }

        let mut records: Vec<HistoryRecord> = self
            .history
            .read()
            .await
            .iter()
            .filter(|(owner, record)| owner == org_id && record.endpoint_id == endpoint_id)
            .map(|(_, record)| {
                if query.include_detail {
                    record.clone()
                } else {
                    record.clone().without_details()
                }
            })
            .collect();

        records.sort_by(|left, right| {
            directed(
                compare_history(left, right, query.sort.field),
                query.sort.direction,
            )
            .then_with(|| left.id.cmp(&right.id))
        });

        Ok(window(records, query.page.offset(), query.page.limit()))
    }

    async fn count_history(&self, endpoint_id: Uuid, org_id: &OrgId) -> AppResult<u64> {
        Ok(self
            .history
            .read()
            .await
            .iter()
            .filter(|(owner, record)| owner == org_id && record.endpoint_id == endpoint_id)
            .count() as u64)
    }
}
