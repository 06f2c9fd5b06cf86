use integrations_domain::IntegrationPermission;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub(super) struct ObjectType {
    namespace: &'static str,
    name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ObjectReference {
    #[serde(rename = "type")]
    object_type: ObjectType,
    id: String,
}

impl ObjectReference {
    pub(super) fn integration(integration_id: Uuid) -> Self {
        Self {
            object_type: ObjectType {
                namespace: "notifications",
                name: "integration",
            },
            id: integration_id.to_string(),
        }
    }

    fn workspace(workspace_id: Uuid) -> Self {
        Self {
            object_type: ObjectType {
                namespace: "rbac",
                name: "workspace",
            },
            id: workspace_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct SubjectReference {
    subject: ObjectReference,
}

impl SubjectReference {
    pub(super) fn principal(username: &str) -> Self {
        Self {
            subject: ObjectReference {
                object_type: ObjectType {
                    namespace: "rbac",
                    name: "principal",
                },
                id: format!("redhat/{username}"),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CheckRequest {
    pub(super) subject: SubjectReference,
    pub(super) relation: String,
    pub(super) resource: ObjectReference,
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckResponse {
    pub(super) allowed: String,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ListPagination {
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    continuation_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ListIntegrationsRequest {
    reporter_type: &'static str,
    resource_type: &'static str,
    parent: ObjectReference,
    subject: SubjectReference,
    relation: &'static str,
    pagination: ListPagination,
}

impl ListIntegrationsRequest {
    /// Lists integrations in the workspace the user may view.
    pub(super) fn viewable_by(username: &str, workspace_id: Uuid, page_size: u32) -> Self {
        Self {
            reporter_type: "NOTIFICATIONS",
            resource_type: "integration",
            parent: ObjectReference::workspace(workspace_id),
            subject: SubjectReference::principal(username),
            relation: IntegrationPermission::View.relation(),
            pagination: ListPagination {
                limit: page_size,
                continuation_token: None,
            },
        }
    }

    pub(super) fn with_continuation_token(&self, continuation_token: Option<String>) -> Self {
        let mut request = self.clone();
        request.pagination.continuation_token = continuation_token;
        request
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ReporterData {
    pub(super) local_resource_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListedIntegration {
    pub(super) reporter_data: ReporterData,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListPaginationResponse {
    #[serde(default)]
    continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListIntegrationsResponse {
    #[serde(default)]
    pub(super) integrations: Vec<ListedIntegration>,
    #[serde(default)]
    pagination: Option<ListPaginationResponse>,
}

impl ListIntegrationsResponse {
    /// Token of the next page; absent or empty ends the enumeration.
    pub(super) fn next_continuation_token(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .and_then(|pagination| pagination.continuation_token.as_deref())
            .filter(|token| !token.is_empty())
    }
}
