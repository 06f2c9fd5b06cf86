use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use integrations_core::{AppError, AppResult, OrgId, Principal};
use integrations_domain::{AuthorizedIdSet, IntegrationPermission};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{IntegrationBatchStream, PermissionOracle, WorkspaceResolver};

mod collector;
mod gates;
mod mode;

pub use collector::AuthorizedIdCollector;
pub use gates::{LegacyRoleGate, RelationGate};
pub use mode::{AuthorizationMode, AuthorizationModeConfig};

/// Visibility of integrations for a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointScope {
    /// Every integration of the organization is visible.
    Unrestricted,
    /// Only the integrations in the set are visible.
    Only(AuthorizedIdSet),
    /// Nothing is visible; storage must not be queried.
    Nothing,
}

/// One authorization subsystem able to gate integration access.
#[async_trait]
pub trait EndpointGate: Send + Sync {
    /// Fails with [`AppError::Forbidden`] unless the principal may perform the
    /// action on the integration. Never consults storage.
    async fn authorize(
        &self,
        principal: &Principal,
        permission: IntegrationPermission,
        endpoint_id: Uuid,
    ) -> AppResult<()>;

    /// Resolves which integrations the principal may list.
    async fn visible_endpoints(&self, principal: &Principal) -> AppResult<EndpointScope>;
}

/// Gate chosen for one request, together with the mode that chose it.
#[derive(Clone)]
pub struct ResolvedGate {
    mode: AuthorizationMode,
    gate: Arc<dyn EndpointGate>,
}

impl ResolvedGate {
    /// Returns the mode this gate was selected for.
    #[must_use]
    pub fn mode(&self) -> AuthorizationMode {
        self.mode
    }

    /// See [`EndpointGate::authorize`].
    pub async fn authorize(
        &self,
        principal: &Principal,
        permission: IntegrationPermission,
        endpoint_id: Uuid,
    ) -> AppResult<()> {
        self.gate.authorize(principal, permission, endpoint_id).await
    }

    /// See [`EndpointGate::visible_endpoints`].
    pub async fn visible_endpoints(&self, principal: &Principal) -> AppResult<EndpointScope> {
        self.gate.visible_endpoints(principal).await
    }
}

/// Picks the authoritative gate for an organization.
#[derive(Clone)]
pub struct AuthorizationRouter {
    config: Arc<AuthorizationModeConfig>,
    relation_gate: Arc<dyn EndpointGate>,
    legacy_gate: Arc<dyn EndpointGate>,
}

impl AuthorizationRouter {
    /// Creates a router over the relation-based and legacy gates.
    #[must_use]
    pub fn new(
        config: AuthorizationModeConfig,
        relation_gate: Arc<dyn EndpointGate>,
        legacy_gate: Arc<dyn EndpointGate>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            relation_gate,
            legacy_gate,
        }
    }

    /// Returns the authoritative mode for the organization.
    #[must_use]
    fn mode_for(&self, org_id: &OrgId) -> AuthorizationMode {
        self.config.mode_for(org_id)
    }

    /// Selects the gate for the principal's organization. Call once per
    /// request and keep the result for every later decision in that request.
    #[must_use]
    pub fn gate_for(&self, principal: &Principal) -> ResolvedGate {
        let mode = self.mode_for(principal.org_id());
        debug!(
            org_id = %principal.org_id(),
            mode = mode.as_str(),
            "selected authorization mode"
        );

        let gate = match mode {
            AuthorizationMode::Relations => self.relation_gate.clone(),
            AuthorizationMode::LegacyRbac => self.legacy_gate.clone(),
        };

        ResolvedGate { mode, gate }
    }
}
