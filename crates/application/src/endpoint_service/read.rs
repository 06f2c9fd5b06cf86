use super::*;

impl EndpointService {
    /// Returns one endpoint. Type-specific properties are dropped unless
    /// `include_details` is set.
    pub async fn get_endpoint(
        &self,
        principal: &Principal,
        endpoint_id: Uuid,
        include_details: bool,
    ) -> AppResult<Endpoint> {
        self.router
            .gate_for(principal)
            .authorize(principal, IntegrationPermission::View, endpoint_id)
            .await?;

        let endpoint = self
            .endpoint_repository
            .find_endpoint(principal.org_id(), endpoint_id)
            .await?
            .ok_or_else(|| endpoint_not_found(endpoint_id))?;

        Ok(if include_details {
            endpoint
        } else {
            endpoint.without_properties()
        })
    }

    /// Returns a page of delivery history for one endpoint.
    pub async fn get_endpoint_history(
        &self,
        principal: &Principal,
        endpoint_id: Uuid,
        request_path: &str,
        query: HistoryQuery,
    ) -> AppResult<Page<HistoryRecord>> {
        self.router
            .gate_for(principal)
            .authorize(principal, IntegrationPermission::ViewHistory, endpoint_id)
            .await?;

        self.require_existing(principal, endpoint_id).await?;

        let query = HistoryQuery {
            page: query.page.capped(MAX_NOTIFICATION_HISTORY_RESULTS),
            ..query
        };

        let records = self
            .history_repository
            .list_history(principal.org_id(), endpoint_id, &query, None)
            .await?;
        let count = self
            .history_repository
            .count_history(endpoint_id, principal.org_id())
            .await?;

        let records = if query.include_detail {
            records
        } else {
            records
                .into_iter()
                .map(HistoryRecord::without_details)
                .collect()
        };

        let links = PageLinks::build(request_path, count, &query.page);
        Ok(Page::new(records, links, count))
    }

    /// Lists the endpoints the principal may view.
    pub async fn list_endpoints(
        &self,
        principal: &Principal,
        request_path: &str,
        query: EndpointListQuery,
    ) -> AppResult<Page<Endpoint>> {
        let gate = self.router.gate_for(principal);

        match gate.visible_endpoints(principal).await? {
            EndpointScope::Unrestricted => {
                self.assembler
                    .assemble(principal, request_path, &query, None)
                    .await
            }
            EndpointScope::Only(authorized) => {
                self.assembler
                    .assemble(principal, request_path, &query, Some(&authorized))
                    .await
            }
            EndpointScope::Nothing => {
                info!(
                    org_id = %principal.org_id(),
                    username = principal.username(),
                    mode = gate.mode().as_str(),
                    "returning empty endpoint page"
                );
                Ok(Page::empty())
            }
        }
    }
}
