use std::collections::BTreeSet;

use async_trait::async_trait;
use futures::stream::BoxStream;
use integrations_core::{AppResult, LegacyRole, OrgId, Principal};
use integrations_domain::IntegrationPermission;
use uuid::Uuid;

/// Integration reported by the relation system's inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationDescriptor {
    /// Integration id as stored by the reporter, expected to be a UUID.
    pub local_resource_id: String,
}

/// One page of integrations produced by the enumeration stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationBatch {
    /// Integrations in this page. May be empty and may overlap other pages.
    pub integrations: Vec<IntegrationDescriptor>,
}

/// Finite stream of integration pages. An `Err` item ends the enumeration.
pub type IntegrationBatchStream = BoxStream<'static, AppResult<IntegrationBatch>>;

/// Port for the relation-based permission system.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    /// Returns whether the principal holds the permission on one integration.
    async fn check(
        &self,
        principal: &Principal,
        permission: IntegrationPermission,
        integration_id: Uuid,
    ) -> AppResult<bool>;

    /// Opens the enumeration of integrations the principal may view in a workspace.
    async fn list_integrations(
        &self,
        principal: &Principal,
        workspace_id: Uuid,
    ) -> AppResult<IntegrationBatchStream>;
}

/// Port resolving the default workspace of an organization.
#[async_trait]
pub trait WorkspaceResolver: Send + Sync {
    /// Returns the id of the organization's default workspace.
    async fn default_workspace_id(&self, org_id: &OrgId) -> AppResult<Uuid>;
}

/// Port resolving the legacy roles attached to a session.
#[async_trait]
pub trait LegacyRoleResolver: Send + Sync {
    /// Returns the legacy roles granted to the caller.
    async fn resolve_roles(
        &self,
        org_id: &OrgId,
        username: &str,
        raw_identity: &str,
    ) -> AppResult<BTreeSet<LegacyRole>>;
}
