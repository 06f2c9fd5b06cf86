use super::*;

impl EndpointService {
    /// Deletes an endpoint together with its history.
    pub async fn delete_endpoint(&self, principal: &Principal, endpoint_id: Uuid) -> AppResult<()> {
        self.router
            .gate_for(principal)
            .authorize(principal, IntegrationPermission::Delete, endpoint_id)
            .await?;

        self.require_existing(principal, endpoint_id).await?;

        if !self
            .endpoint_repository
            .delete_endpoint(principal.org_id(), endpoint_id)
            .await?
        {
            return Err(endpoint_not_found(endpoint_id));
        }

        info!(
            org_id = %principal.org_id(),
            username = principal.username(),
            %endpoint_id,
            "endpoint deleted"
        );
        Ok(())
    }

    /// Enables or disables an endpoint.
    pub async fn set_endpoint_enabled(
        &self,
        principal: &Principal,
        endpoint_id: Uuid,
        enabled: bool,
    ) -> AppResult<()> {
        self.router
            .gate_for(principal)
            .authorize(principal, IntegrationPermission::Edit, endpoint_id)
            .await?;

        self.require_existing(principal, endpoint_id).await?;

        if !self
            .endpoint_repository
            .set_enabled(principal.org_id(), endpoint_id, enabled)
            .await?
        {
            return Err(endpoint_not_found(endpoint_id));
        }

        info!(
            org_id = %principal.org_id(),
            username = principal.username(),
            %endpoint_id,
            enabled,
            "endpoint enabled flag changed"
        );
        Ok(())
    }
}
