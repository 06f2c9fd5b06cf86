use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use integrations_application::{HistoryQuery, HistorySortField, NotificationHistoryRepository};
use integrations_core::{AppError, AppResult, OrgId};
use integrations_domain::{AuthorizedIdSet, EndpointType, HistoryRecord};
use serde_json::Value;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;


/// PostgreSQL-backed repository for delivery history.
#[derive(Clone)]
pub struct PostgresNotificationHistoryRepository {
    pool: PgPool,
}

impl PostgresNotificationHistoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: Uuid,
    endpoint_id: Uuid,
    invocation_time: i64,
    invocation_result: bool,
    status: String,
    endpoint_type: String,
    endpoint_sub_type: Option<String>,
    created: DateTime<Utc>,
    details: Option<Value>,
}

#[async_trait]
impl NotificationHistoryRepository for PostgresNotificationHistoryRepository {
    async fn list_history(
        &self,
        org_id: &OrgId,
        endpoint_id: Uuid,
        query: &HistoryQuery,
        authorized: Option<&AuthorizedIdSet>,
    ) -> AppResult<Vec<HistoryRecord>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, endpoint_id, invocation_time, invocation_result, status, \
             endpoint_type, endpoint_sub_type, created, ",
        );
        builder.push(if query.include_detail {
            "details"
        } else {
            "NULL::jsonb AS details"
        });
        builder.push(" FROM notification_history WHERE endpoint_id = ");
        builder.push_bind(endpoint_id);
        builder.push(" AND org_id = ");
        builder.push_bind(org_id.as_str().to_owned());

        if let Some(authorized) = authorized {
            builder.push(" AND endpoint_id = ANY(");
            builder.push_bind(authorized.to_vec());
            builder.push(')');
        }

        builder.push(" ORDER BY ");
        builder.push(match query.sort.field {
            HistorySortField::Created => "created",
            HistorySortField::InvocationResult => "invocation_result",
        });
        builder.push(' ');
        builder.push(query.sort.direction.as_sql());
        builder.push(", id ASC");

        if let Some(limit) = query.page.limit() {
            let limit = i64::try_from(limit)
                .map_err(|error| AppError::Validation(format!("invalid page limit: {error}")))?;
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }
        let offset = i64::try_from(query.page.offset())
            .map_err(|error| AppError::Validation(format!("invalid page offset: {error}")))?;
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<HistoryRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list history of endpoint '{endpoint_id}' in org '{org_id}': {error}"
                ))
            })?;

        rows.into_iter()
            .map(|row| {
                let endpoint_type =
                    EndpointType::from_str(row.endpoint_type.as_str()).map_err(|error| {
                        AppError::Internal(format!(
                            "history record '{}' has invalid stored type: {error}",
                            row.id
                        ))
                    })?;

                Ok(HistoryRecord {
                    id: row.id,
                    endpoint_id: row.endpoint_id,
                    invocation_time_ms: row.invocation_time,
                    invocation_result: row.invocation_result,
                    status: row.status,
                    endpoint_type,
                    endpoint_sub_type: row.endpoint_sub_type,
                    created: row.created,
                    details: row.details,
                })
            })
            .collect()
    }

    async fn count_history(&self, endpoint_id: Uuid, org_id: &OrgId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM notification_history
            WHERE endpoint_id = $1 AND org_id = $2
            "#,
        )
        .bind(endpoint_id)
        .bind(org_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to count history of endpoint '{endpoint_id}' in org '{org_id}': {error}"
            ))
        })?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
