use async_trait::async_trait;
use integrations_application::WorkspaceResolver;
use integrations_core::{AppError, AppResult, OrgId};
use serde::Deserialize;
use tracing::warn;
use url::Url;
use uuid::Uuid;

use crate::http_support::{dependency_error, service_url};

const WORKSPACES_PATH: &str = "api/rbac/v2/workspaces/";

/// Resolves default workspaces through the RBAC v2 API using a pre-shared key.
#[derive(Clone)]
pub struct HttpWorkspaceResolver {
    http_client: reqwest::Client,
    workspaces_url: Url,
    psk: String,
    client_id: String,
}

impl HttpWorkspaceResolver {
    /// Creates a resolver for the RBAC service at `rbac_url`.
    pub fn new(
        http_client: reqwest::Client,
        rbac_url: &Url,
        psk: impl Into<String>,
        client_id: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            http_client,
            workspaces_url: service_url(rbac_url, WORKSPACES_PATH)?,
            psk: psk.into(),
            client_id: client_id.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct WorkspacePage {
    #[serde(default)]
    data: Vec<Workspace>,
}

#[derive(Debug, Deserialize)]
struct Workspace {
    id: Uuid,
}

#[async_trait]
impl WorkspaceResolver for HttpWorkspaceResolver {
    async fn default_workspace_id(&self, org_id: &OrgId) -> AppResult<Uuid> {
        let page = self
            .http_client
            .get(self.workspaces_url.clone())
            .query(&[("type", "default")])
            .header("x-rh-rbac-org-id", org_id.as_str())
            .header("x-rh-rbac-psk", self.psk.as_str())
            .header("x-rh-rbac-client-id", self.client_id.as_str())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| dependency_error("rbac workspace lookup", error))?
            .json::<WorkspacePage>()
            .await
            .map_err(|error| dependency_error("rbac workspace lookup", error))?;

        match page.data.as_slice() {
            [workspace] => Ok(workspace.id),
            workspaces => {
                warn!(
                    org_id = %org_id,
                    found = workspaces.len(),
                    "unexpected number of default workspaces"
                );
                Err(AppError::Dependency(format!(
                    "expected exactly one default workspace for org '{org_id}', found {}",
                    workspaces.len()
                )))
            }
        }
    }
}
