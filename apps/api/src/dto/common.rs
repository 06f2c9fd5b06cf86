use std::collections::BTreeMap;

use integrations_application::Page;
use serde::Serialize;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub storage: StorageHealth,
}

/// Health of the configured storage backend.
#[derive(Debug, Serialize)]
pub struct StorageHealth {
    pub backend: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Metadata of a paginated response.
#[derive(Debug, Serialize)]
pub struct PageMetaResponse {
    pub count: u64,
}

/// Paginated response envelope.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub links: BTreeMap<String, String>,
    pub meta: PageMetaResponse,
}

impl<T> PageResponse<T> {
    /// Converts an application page, mapping each item into its response form.
    pub fn from_page<S>(page: Page<S>, convert: impl FnMut(S) -> T) -> Self {
        let links = page
            .links
            .iter()
            .map(|(relation, link)| (relation.to_owned(), link.to_owned()))
            .collect();

        Self {
            data: page.data.into_iter().map(convert).collect(),
            links,
            meta: PageMetaResponse {
                count: page.meta.count,
            },
        }
    }
}
