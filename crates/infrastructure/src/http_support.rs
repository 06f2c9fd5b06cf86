use integrations_core::{AppError, AppResult};
use url::Url;

/// Appends `path` to `base`, keeping any path prefix of the base URL.
pub(crate) fn service_url(base: &Url, path: &str) -> AppResult<Url> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    Url::parse(joined.as_str())
        .map_err(|error| AppError::Internal(format!("invalid service url '{joined}': {error}")))
}

pub(crate) fn dependency_error(service: &str, error: reqwest::Error) -> AppError {
    AppError::Dependency(format!("{service} request failed: {error}"))
}
