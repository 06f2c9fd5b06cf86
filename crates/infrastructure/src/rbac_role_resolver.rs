use std::collections::BTreeSet;

use async_trait::async_trait;
use integrations_application::LegacyRoleResolver;
use integrations_core::{AppResult, LegacyRole, OrgId};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::http_support::{dependency_error, service_url};

const ACCESS_PATH: &str = "api/rbac/v1/access/";
const IDENTITY_HEADER: &str = "x-rh-identity";

/// Resolves legacy roles from the caller's RBAC access list.
#[derive(Clone)]
pub struct HttpRbacRoleResolver {
    http_client: reqwest::Client,
    access_url: Url,
}

impl HttpRbacRoleResolver {
    /// Creates a resolver for the RBAC service at `rbac_url`.
    pub fn new(http_client: reqwest::Client, rbac_url: &Url) -> AppResult<Self> {
        Ok(Self {
            http_client,
            access_url: service_url(rbac_url, ACCESS_PATH)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AccessPage {
    #[serde(default)]
    data: Vec<Access>,
}

#[derive(Debug, Deserialize)]
struct Access {
    permission: String,
}

/// Maps one `application:resource:verb` permission to the role it grants.
fn role_for_permission(permission: &str) -> Option<LegacyRole> {
    let mut parts = permission.split(':');
    let (Some(application), Some(resource), Some(verb), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    if application != "integrations" || !matches!(resource, "endpoints" | "*") {
        return None;
    }

    match verb {
        "read" => Some(LegacyRole::IntegrationsEndpointsRead),
        "write" | "*" => Some(LegacyRole::IntegrationsEndpointsWrite),
        _ => None,
    }
}

#[async_trait]
impl LegacyRoleResolver for HttpRbacRoleResolver {
    async fn resolve_roles(
        &self,
        org_id: &OrgId,
        username: &str,
        raw_identity: &str,
    ) -> AppResult<BTreeSet<LegacyRole>> {
        let page = self
            .http_client
            .get(self.access_url.clone())
            .query(&[("application", "integrations"), ("limit", "1000")])
            .header(IDENTITY_HEADER, raw_identity)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| dependency_error("rbac access lookup", error))?
            .json::<AccessPage>()
            .await
            .map_err(|error| dependency_error("rbac access lookup", error))?;

        let roles = page
            .data
            .iter()
            .filter_map(|access| role_for_permission(access.permission.as_str()))
            .collect::<BTreeSet<_>>();

        debug!(org_id = %org_id, username, roles = roles.len(), "resolved legacy roles");
        Ok(roles)
    }
}

/// Grants the same configured roles to every caller.
#[derive(Debug, Clone, Default)]
pub struct StaticRoleResolver {
    roles: BTreeSet<LegacyRole>,
}

impl StaticRoleResolver {
    /// Creates a resolver granting `roles`.
    #[must_use]
    pub fn new(roles: BTreeSet<LegacyRole>) -> Self {
        Self { roles }
    }
}

#[async_trait]
impl LegacyRoleResolver for StaticRoleResolver {
    async fn resolve_roles(
        &self,
        _org_id: &OrgId,
        _username: &str,
        _raw_identity: &str,
    ) -> AppResult<BTreeSet<LegacyRole>> {
        Ok(self.roles.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::{Json, Router};
    use integrations_application::LegacyRoleResolver;
    use integrations_core::{LegacyRole, OrgId};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;
    use url::Url;

    use super::{HttpRbacRoleResolver, StaticRoleResolver, role_for_permission};

    #[test]
    fn permissions_map_to_roles() {
        assert_eq!(
            role_for_permission("integrations:endpoints:read"),
            Some(LegacyRole::IntegrationsEndpointsRead)
        );
        assert_eq!(
            role_for_permission("integrations:*:*"),
            Some(LegacyRole::IntegrationsEndpointsWrite)
        );
        assert_eq!(
            role_for_permission("integrations:endpoints:write"),
            Some(LegacyRole::IntegrationsEndpointsWrite)
        );
        assert_eq!(role_for_permission("notifications:events:read"), None);
        assert_eq!(role_for_permission("integrations:endpoints"), None);
        assert_eq!(role_for_permission("integrations:endpoints:read:extra"), None);
    }

    async fn access(headers: HeaderMap) -> Json<Value> {
        if headers.get("x-rh-identity").is_some_and(|value| value == "reader") {
            Json(json!({"data": [
                {"permission": "integrations:endpoints:read"},
                {"permission": "notifications:events:write"}
            ]}))
        } else {
            Json(json!({"data": []}))
        }
    }

    #[tokio::test]
    async fn http_resolver_forwards_identity() {
        let listener = match TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => listener,
            Err(error) => panic!("failed to bind stub server: {error}"),
        };
        let Ok(address) = listener.local_addr() else {
            panic!("stub address should be readable");
        };
        tokio::spawn(async move {
            let router = Router::new().route("/api/rbac/v1/access/", get(access));
            let _ = axum::serve(listener, router).await;
        });
        let Ok(base) = Url::parse(&format!("http://{address}")) else {
            panic!("stub url should parse");
        };
        let Ok(resolver) = HttpRbacRoleResolver::new(reqwest::Client::new(), &base) else {
            panic!("resolver should build");
        };
        let Ok(org_id) = OrgId::new("org-1") else {
            panic!("org id should be valid");
        };

        let reader = resolver.resolve_roles(&org_id, "alice", "reader").await;
        let nobody = resolver.resolve_roles(&org_id, "bob", "other").await;

        assert!(matches!(
            reader,
            Ok(ref roles) if roles == &BTreeSet::from([LegacyRole::IntegrationsEndpointsRead])
        ));
        assert!(matches!(nobody, Ok(ref roles) if roles.is_empty()));
    }

    #[tokio::test]
    async fn static_resolver_grants_configured_roles() {
        let resolver =
            StaticRoleResolver::new(BTreeSet::from([LegacyRole::IntegrationsEndpointsWrite]));
        let Ok(org_id) = OrgId::new("org-1") else {
            panic!("org id should be valid");
        };

        let roles = resolver.resolve_roles(&org_id, "alice", "").await;

        assert!(matches!(
            roles,
            Ok(ref roles) if roles.contains(&LegacyRole::IntegrationsEndpointsWrite)
        ));
    }
}
