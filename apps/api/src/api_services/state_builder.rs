use integrations_application::EndpointService;
use integrations_core::AppError;
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod authorization;
mod repositories;

pub fn build_app_state(pool: Option<PgPool>, config: &ApiConfig) -> Result<AppState, AppError> {
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

    let repositories = repositories::build_repository_set(pool.as_ref());
    let authorization = authorization::build_authorization(config, &http_client)?;

    Ok(AppState {
        endpoint_service: EndpointService::new(
            authorization.router,
            repositories.endpoint_repository,
            repositories.history_repository,
        ),
        role_resolver: authorization.role_resolver,
        storage: config.storage,
        postgres_pool: pool,
        max_page_size: config.max_page_size,
    })
}
