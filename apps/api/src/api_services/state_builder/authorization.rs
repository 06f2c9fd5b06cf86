use std::sync::Arc;

use integrations_application::{
    AuthorizationModeConfig, AuthorizationRouter, AuthorizedIdCollector, LegacyRoleGate,
    LegacyRoleResolver, RelationGate,
};
use integrations_core::AppError;
use integrations_infrastructure::{
    HttpKesselClient, HttpRbacRoleResolver, HttpWorkspaceResolver, StaticRoleResolver,
};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, LegacyRoleSource};

pub(super) struct AuthorizationSet {
    pub(super) router: AuthorizationRouter,
    pub(super) role_resolver: Arc<dyn LegacyRoleResolver>,
}

pub(super) fn build_authorization(
    config: &ApiConfig,
    http_client: &reqwest::Client,
) -> Result<AuthorizationSet, AppError> {
    let kessel = &config.kessel;
    let oracle = Arc::new(HttpKesselClient::new(
        http_client.clone(),
        &kessel.relations_url,
        &kessel.inventory_url,
        kessel.list_page_size,
    )?);
    let workspace_resolver = Arc::new(HttpWorkspaceResolver::new(
        http_client.clone(),
        &config.rbac.url,
        config.rbac.psk.clone(),
        config.rbac.client_id.clone(),
    )?);

    if config.relations_in_use() && config.rbac.psk.is_empty() {
        warn!("RBAC_PSK is empty; default workspace lookups will likely be rejected");
    }

    let collector =
        AuthorizedIdCollector::new(oracle.clone(), workspace_resolver, kessel.list_timeout);
    let router = AuthorizationRouter::new(
        AuthorizationModeConfig::new(kessel.relations_enabled, kessel.relations_org_ids.clone()),
        Arc::new(RelationGate::new(oracle, collector)),
        Arc::new(LegacyRoleGate::new()),
    );

    let role_resolver: Arc<dyn LegacyRoleResolver> = match &config.legacy_role_source {
        LegacyRoleSource::Rbac => Arc::new(HttpRbacRoleResolver::new(
            http_client.clone(),
            &config.rbac.url,
        )?),
        LegacyRoleSource::Static(roles) => Arc::new(StaticRoleResolver::new(roles.clone())),
    };

    info!(
        relations_enabled = kessel.relations_enabled,
        relations_org_count = kessel.relations_org_ids.len(),
        "authorization configured"
    );

    Ok(AuthorizationSet {
        router,
        role_resolver,
    })
}
