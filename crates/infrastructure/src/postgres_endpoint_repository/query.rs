use integrations_application::{PageRequest, SortDirection};

use super::*;

/// Appends the `WHERE` clause shared by the window query and the count query.
pub(super) fn push_endpoint_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    org_id: &OrgId,
    query: &EndpointListQuery,
    authorized: Option<&AuthorizedIdSet>,
) {
    builder.push(" WHERE org_id = ");
    builder.push_bind(org_id.as_str().to_owned());

    if !query.type_filters.is_empty() {
        builder.push(" AND (");
        for (index, filter) in query.type_filters.iter().enumerate() {
            if index > 0 {
                builder.push(" OR ");
            }
            builder.push("(endpoint_type = ");
            builder.push_bind(filter.endpoint_type().as_str());
            if let Some(sub_type) = filter.sub_type() {
                builder.push(" AND endpoint_sub_type = ");
                builder.push_bind(sub_type.to_owned());
            }
            builder.push(')');
        }
        builder.push(')');
    }

    if let Some(active) = query.active {
        builder.push(" AND enabled = ");
        builder.push_bind(active);
    }

    if let Some(name) = query.name.as_deref().filter(|name| !name.is_empty()) {
        builder.push(" AND name ILIKE ");
        builder.push_bind(format!("%{}%", escape_like(name)));
    }

    if let Some(authorized) = authorized {
        builder.push(" AND id = ANY(");
        builder.push_bind(authorized.to_vec());
        builder.push(')');
    }
}

pub(super) fn push_endpoint_order(
    builder: &mut QueryBuilder<'_, Postgres>,
    field: EndpointSortField,
    direction: SortDirection,
) {
    builder.push(" ORDER BY ");
    for column in sort_columns(field) {
        builder.push(*column);
        builder.push(' ');
        builder.push(direction.as_sql());
        builder.push(", ");
    }
    builder.push("id ASC");
}

pub(super) fn push_window(
    builder: &mut QueryBuilder<'_, Postgres>,
    page: &PageRequest,
) -> AppResult<()> {
    if let Some(limit) = page.limit() {
        let limit = i64::try_from(limit)
            .map_err(|error| AppError::Validation(format!("invalid page limit: {error}")))?;
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }

    let offset = i64::try_from(page.offset())
        .map_err(|error| AppError::Validation(format!("invalid page offset: {error}")))?;
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    Ok(())
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        if matches!(character, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}
