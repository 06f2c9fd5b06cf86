use super::*;

/// Gate backed by the relation-based permission oracle.
pub struct RelationGate {
    oracle: Arc<dyn PermissionOracle>,
    collector: AuthorizedIdCollector,
}

impl RelationGate {
    /// Creates a relation gate. The collector must share the same oracle.
    #[must_use]
    pub fn new(oracle: Arc<dyn PermissionOracle>, collector: AuthorizedIdCollector) -> Self {
        Self { oracle, collector }
    }
}

#[async_trait]
impl EndpointGate for RelationGate {
    async fn authorize(
        &self,
        principal: &Principal,
        permission: IntegrationPermission,
        endpoint_id: Uuid,
    ) -> AppResult<()> {
        if self.oracle.check(principal, permission, endpoint_id).await? {
            return Ok(());
        }

        debug!(
            org_id = %principal.org_id(),
            username = principal.username(),
            permission = permission.as_str(),
            %endpoint_id,
            "relation check denied"
        );

        Err(AppError::Forbidden(format!(
            "user '{}' is not allowed to '{}' integration '{endpoint_id}'",
            principal.username(),
            permission.as_str()
        )))
    }

    async fn visible_endpoints(&self, principal: &Principal) -> AppResult<EndpointScope> {
        Ok(match self.collector.collect(principal).await? {
            Some(authorized) => EndpointScope::Only(authorized),
            None => EndpointScope::Nothing,
        })
    }
}

/// Gate backed by the roles attached to the caller's session.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyRoleGate;

impl LegacyRoleGate {
    /// Creates the legacy gate.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn require_role(principal: &Principal, permission: IntegrationPermission) -> AppResult<()> {
        let role = permission.legacy_role();
        if principal.has_role(role) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' is missing role '{}'",
            principal.username(),
            role.as_str()
        )))
    }
}

#[async_trait]
impl EndpointGate for LegacyRoleGate {
    async fn authorize(
        &self,
        principal: &Principal,
        permission: IntegrationPermission,
        _endpoint_id: Uuid,
    ) -> AppResult<()> {
        Self::require_role(principal, permission)
    }

    async fn visible_endpoints(&self, principal: &Principal) -> AppResult<EndpointScope> {
        Self::require_role(principal, IntegrationPermission::View)?;
        Ok(EndpointScope::Unrestricted)
    }
}
