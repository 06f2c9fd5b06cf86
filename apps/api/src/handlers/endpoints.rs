use axum::Json;
use axum::extract::{Extension, OriginalUri, Path, RawQuery, State};
use axum::http::StatusCode;
use integrations_core::Principal;
use uuid::Uuid;

use crate::dto::{EndpointResponse, HistoryResponse, PageResponse};
use crate::error::ApiResult;
use crate::state::AppState;

mod params;

use params::EndpointQueryParams;

pub async fn list_endpoints_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw_query): RawQuery,
) -> ApiResult<Json<PageResponse<EndpointResponse>>> {
    let query = EndpointQueryParams::parse(raw_query.as_deref())?
        .endpoint_list_query(state.max_page_size)?;

    let page = state
        .endpoint_service
        .list_endpoints(&principal, uri.path(), query)
        .await?;

    Ok(Json(PageResponse::from_page(page, EndpointResponse::from)))
}

pub async fn get_endpoint_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(endpoint_id): Path<Uuid>,
    RawQuery(raw_query): RawQuery,
) -> ApiResult<Json<EndpointResponse>> {
    let include_details = EndpointQueryParams::parse(raw_query.as_deref())?.include_detail(true);

    let endpoint = state
        .endpoint_service
        .get_endpoint(&principal, endpoint_id, include_details)
        .await?;

    Ok(Json(EndpointResponse::from(endpoint)))
}

pub async fn get_endpoint_history_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(endpoint_id): Path<Uuid>,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw_query): RawQuery,
) -> ApiResult<Json<PageResponse<HistoryResponse>>> {
    let query = EndpointQueryParams::parse(raw_query.as_deref())?.history_query()?;

    let page = state
        .endpoint_service
        .get_endpoint_history(&principal, endpoint_id, uri.path(), query)
        .await?;

    Ok(Json(PageResponse::from_page(page, HistoryResponse::from)))
}

pub async fn delete_endpoint_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(endpoint_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .endpoint_service
        .delete_endpoint(&principal, endpoint_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn enable_endpoint_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(endpoint_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .endpoint_service
        .set_endpoint_enabled(&principal, endpoint_id, true)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn disable_endpoint_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(endpoint_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .endpoint_service
        .set_endpoint_enabled(&principal, endpoint_id, false)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
