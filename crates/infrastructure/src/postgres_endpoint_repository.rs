use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use integrations_application::{
    EndpointListQuery, EndpointListing, EndpointRepository, EndpointSortField,
};
use integrations_core::{AppError, AppResult, OrgId};
use integrations_domain::{AuthorizedIdSet, Endpoint, EndpointInput, EndpointStatus, EndpointType};
use serde_json::Value;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

mod query;

use query::{push_endpoint_filters, push_endpoint_order, push_window};

const ENDPOINT_COLUMNS: &str = "id, org_id, name, description, endpoint_type, endpoint_sub_type, \
     enabled, status, server_errors, properties, created, updated";

/// PostgreSQL-backed endpoint repository.
#[derive(Clone)]
pub struct PostgresEndpointRepository {
    pool: PgPool,
}

impl PostgresEndpointRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EndpointRow {
    id: Uuid,
    org_id: String,
    name: String,
    description: String,
    endpoint_type: String,
    endpoint_sub_type: Option<String>,
    enabled: bool,
    status: String,
    server_errors: i32,
    properties: Option<Value>,
    created: DateTime<Utc>,
    updated: Option<DateTime<Utc>>,
}

fn endpoint_from_row(row: EndpointRow) -> AppResult<Endpoint> {
    let endpoint_type = EndpointType::from_str(row.endpoint_type.as_str()).map_err(|error| {
        AppError::Internal(format!("endpoint '{}' has invalid stored type: {error}", row.id))
    })?;
    let status = EndpointStatus::from_str(row.status.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "endpoint '{}' has invalid stored status: {error}",
            row.id
        ))
    })?;

    Endpoint::new(EndpointInput {
        id: row.id,
        org_id: OrgId::new(row.org_id)?,
        name: row.name,
        description: row.description,
        endpoint_type,
        sub_type: row.endpoint_sub_type,
        enabled: row.enabled,
        status,
        server_errors: row.server_errors,
        properties: row.properties,
        created: row.created,
        updated: row.updated,
    })
}

#[async_trait]
impl EndpointRepository for PostgresEndpointRepository {
    async fn exists_by_id_and_org(&self, org_id: &OrgId, endpoint_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM endpoints WHERE id = $1 AND org_id = $2
            )
            "#,
        )
        .bind(endpoint_id)
        .bind(org_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to check endpoint '{endpoint_id}' in org '{org_id}': {error}"
            ))
        })
    }

    async fn find_endpoint(
        &self,
        org_id: &OrgId,
        endpoint_id: Uuid,
    ) -> AppResult<Option<Endpoint>> {
        let row = sqlx::query_as::<_, EndpointRow>(&format!(
            "SELECT {ENDPOINT_COLUMNS} FROM endpoints WHERE id = $1 AND org_id = $2"
        ))
        .bind(endpoint_id)
        .bind(org_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find endpoint '{endpoint_id}' in org '{org_id}': {error}"
            ))
        })?;

        row.map(endpoint_from_row).transpose()
    }

    async fn list_endpoints(
        &self,
        org_id: &OrgId,
        query: &EndpointListQuery,
        authorized: Option<&AuthorizedIdSet>,
    ) -> AppResult<EndpointListing> {
        let mut select: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {ENDPOINT_COLUMNS} FROM endpoints"));
        push_endpoint_filters(&mut select, org_id, query, authorized);
        push_endpoint_order(&mut select, query.sort.field, query.sort.direction);
        push_window(&mut select, &query.page)?;

        let rows = select
            .build_query_as::<EndpointRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list endpoints for org '{org_id}': {error}"
                ))
            })?;

        let mut count: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM endpoints");
        push_endpoint_filters(&mut count, org_id, query, authorized);

        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to count endpoints for org '{org_id}': {error}"
                ))
            })?;

        Ok(EndpointListing {
            endpoints: rows
                .into_iter()
                .map(endpoint_from_row)
                .collect::<AppResult<Vec<_>>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn set_enabled(
        &self,
        org_id: &OrgId,
        endpoint_id: Uuid,
        enabled: bool,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE endpoints
            SET enabled = $3,
                server_errors = CASE WHEN $3 THEN 0 ELSE server_errors END,
                updated = now()
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(endpoint_id)
        .bind(org_id.as_str())
        .bind(enabled)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update endpoint '{endpoint_id}' in org '{org_id}': {error}"
            ))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_endpoint(&self, org_id: &OrgId, endpoint_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM endpoints WHERE id = $1 AND org_id = $2")
            .bind(endpoint_id)
            .bind(org_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to delete endpoint '{endpoint_id}' in org '{org_id}': {error}"
                ))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

fn sort_columns(field: EndpointSortField) -> &'static [&'static str] {
    match field {
        EndpointSortField::Name => &["name"],
        EndpointSortField::Type => &["endpoint_type", "endpoint_sub_type"],
        EndpointSortField::Enabled => &["enabled"],
        EndpointSortField::Created => &["created"],
    }
}
