use super::*;

/// Runs the endpoint query, optionally constrained to an authorized id set,
/// and wraps the window into a [`Page`].
#[derive(Clone)]
pub struct ResultAssembler {
    endpoint_repository: Arc<dyn EndpointRepository>,
}

impl ResultAssembler {
    /// Creates an assembler over the endpoint repository.
    #[must_use]
    pub fn new(endpoint_repository: Arc<dyn EndpointRepository>) -> Self {
        Self {
            endpoint_repository,
        }
    }

    /// Lists endpoints of the principal's organization.
    ///
    /// The count in the page metadata and the links are computed from the
    /// filtered result, so they agree with what the filter lets through.
    pub async fn assemble(
        &self,
        principal: &Principal,
        request_path: &str,
        query: &EndpointListQuery,
        filter: Option<&AuthorizedIdSet>,
    ) -> AppResult<Page<Endpoint>> {
        let listing = self
            .endpoint_repository
            .list_endpoints(principal.org_id(), query, filter)
            .await?;

        let links = PageLinks::build(request_path, listing.total, &query.page);
        Ok(Page::new(listing.endpoints, links, listing.total))
    }
}
