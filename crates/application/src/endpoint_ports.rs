use std::str::FromStr;

use async_trait::async_trait;
use integrations_core::{AppError, AppResult, OrgId};
use integrations_domain::{AuthorizedIdSet, Endpoint, EndpointTypeFilter, HistoryRecord};
use uuid::Uuid;

use crate::{PageRequest, SortBy, SortDirection};

/// Sortable endpoint columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSortField {
    /// Display name.
    Name,
    /// Endpoint type, then sub type.
    Type,
    /// Enabled flag.
    Enabled,
    /// Creation time.
    Created,
}

impl FromStr for EndpointSortField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "type" => Ok(Self::Type),
            "enabled" => Ok(Self::Enabled),
            "created" => Ok(Self::Created),
            other => Err(AppError::Validation(format!(
                "unknown endpoint sort field '{other}'"
            ))),
        }
    }
}

/// Sortable history columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySortField {
    /// Creation time.
    Created,
    /// Delivery outcome.
    InvocationResult,
}

impl FromStr for HistorySortField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "invocation_result" | "invocationresult" => Ok(Self::InvocationResult),
            other => Err(AppError::Validation(format!(
                "unknown history sort field '{other}'"
            ))),
        }
    }
}

/// Filters and window of an endpoint listing.
#[derive(Debug, Clone)]
pub struct EndpointListQuery {
    /// Page window.
    pub page: PageRequest,
    /// Ordering; ties are broken by endpoint id.
    pub sort: SortBy<EndpointSortField>,
    /// Accepted types. Empty means any type.
    pub type_filters: Vec<EndpointTypeFilter>,
    /// When set, only endpoints with this enabled flag.
    pub active: Option<bool>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
}

impl EndpointListQuery {
    /// Default ordering for endpoint listings.
    pub const DEFAULT_SORT: SortBy<EndpointSortField> = SortBy {
        field: EndpointSortField::Created,
        direction: SortDirection::Asc,
    };

    /// Returns whether the endpoint matches every filter, ignoring the window.
    #[must_use]
    pub fn matches(&self, endpoint: &Endpoint) -> bool {
        let type_matches = self.type_filters.is_empty()
            || self
                .type_filters
                .iter()
                .any(|filter| filter.matches(endpoint));
        let active_matches = self
            .active
            .is_none_or(|active| endpoint.enabled() == active);
        let name_matches = self.name.as_deref().is_none_or(|name| {
            endpoint
                .name()
                .to_lowercase()
                .contains(name.to_lowercase().as_str())
        });

        type_matches && active_matches && name_matches
    }
}

/// Window and options of a history listing.
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    /// Page window.
    pub page: PageRequest,
    /// Ordering; ties are broken by record id.
    pub sort: SortBy<HistorySortField>,
    /// Whether the detail payload is loaded.
    pub include_detail: bool,
}

impl HistoryQuery {
    /// Default ordering for history listings.
    pub const DEFAULT_SORT: SortBy<HistorySortField> = SortBy {
        field: HistorySortField::Created,
        direction: SortDirection::Desc,
    };
}

/// One window of endpoints plus the size of the whole filtered result.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointListing {
    /// Endpoints in the window, in query order.
    pub endpoints: Vec<Endpoint>,
    /// Number of endpoints matching every filter, including the id filter.
    pub total: u64,
}

/// Repository port for integration records.
#[async_trait]
pub trait EndpointRepository: Send + Sync {
    /// Returns whether the endpoint exists and belongs to the organization.
    async fn exists_by_id_and_org(&self, org_id: &OrgId, endpoint_id: Uuid) -> AppResult<bool>;

    /// Finds an endpoint owned by the organization.
    async fn find_endpoint(&self, org_id: &OrgId, endpoint_id: Uuid)
    -> AppResult<Option<Endpoint>>;

    /// Lists endpoints of the organization. When `authorized` is set, only ids
    /// in the set are considered, for both the window and the total.
    async fn list_endpoints(
        &self,
        org_id: &OrgId,
        query: &EndpointListQuery,
        authorized: Option<&AuthorizedIdSet>,
    ) -> AppResult<EndpointListing>;

    /// Sets the enabled flag. Returns `false` when no endpoint was updated.
    async fn set_enabled(&self, org_id: &OrgId, endpoint_id: Uuid, enabled: bool)
    -> AppResult<bool>;

    /// Deletes the endpoint and its history. Returns `false` when nothing was deleted.
    async fn delete_endpoint(&self, org_id: &OrgId, endpoint_id: Uuid) -> AppResult<bool>;
}

/// Repository port for delivery history.
#[async_trait]
pub trait NotificationHistoryRepository: Send + Sync {
    /// Lists history of one endpoint owned by the organization.
    async fn list_history(
        &self,
        org_id: &OrgId,
        endpoint_id: Uuid,
        query: &HistoryQuery,
        authorized: Option<&AuthorizedIdSet>,
    ) -> AppResult<Vec<HistoryRecord>>;

    /// Counts history of one endpoint owned by the organization.
    async fn count_history(&self, endpoint_id: Uuid, org_id: &OrgId) -> AppResult<u64>;
}
