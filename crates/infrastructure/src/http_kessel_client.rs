use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use integrations_application::{
    IntegrationBatch, IntegrationBatchStream, IntegrationDescriptor, PermissionOracle,
};
use integrations_core::{AppResult, Principal};
use integrations_domain::IntegrationPermission;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::http_support::{dependency_error, service_url};

mod wire;

use wire::{
    CheckRequest, CheckResponse, ListIntegrationsRequest, ListIntegrationsResponse,
    ObjectReference, SubjectReference,
};

const CHECK_PATH: &str = "api/authz/v1beta1/check";
const LIST_INTEGRATIONS_PATH: &str =
    "api/inventory/v1beta1/resources/notifications-integrations/list";
const ALLOWED_TRUE: &str = "ALLOWED_TRUE";

/// Permission oracle backed by the Kessel relations and inventory HTTP APIs.
#[derive(Clone)]
pub struct HttpKesselClient {
    http_client: reqwest::Client,
    check_url: Url,
    list_url: Url,
    page_size: u32,
}

impl HttpKesselClient {
    /// Creates a client for the relations API at `relations_url` and the
    /// inventory API at `inventory_url`.
    pub fn new(
        http_client: reqwest::Client,
        relations_url: &Url,
        inventory_url: &Url,
        page_size: u32,
    ) -> AppResult<Self> {
        Ok(Self {
            http_client,
            check_url: service_url(relations_url, CHECK_PATH)?,
            list_url: service_url(inventory_url, LIST_INTEGRATIONS_PATH)?,
            page_size: page_size.max(1),
        })
    }
}

#[async_trait]
impl PermissionOracle for HttpKesselClient {
    async fn check(
        &self,
        principal: &Principal,
        permission: IntegrationPermission,
        integration_id: Uuid,
    ) -> AppResult<bool> {
        let request = CheckRequest {
            subject: SubjectReference::principal(principal.username()),
            relation: permission.relation().to_owned(),
            resource: ObjectReference::integration(integration_id),
        };

        let response = self
            .http_client
            .post(self.check_url.clone())
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| dependency_error("kessel check", error))?
            .json::<CheckResponse>()
            .await
            .map_err(|error| dependency_error("kessel check", error))?;

        let allowed = response.allowed == ALLOWED_TRUE;
        debug!(
            org_id = %principal.org_id(),
            username = principal.username(),
            relation = permission.relation(),
            %integration_id,
            allowed,
            "kessel check answered"
        );

        Ok(allowed)
    }

    async fn list_integrations(
        &self,
        principal: &Principal,
        workspace_id: Uuid,
    ) -> AppResult<IntegrationBatchStream> {
        let pager = Arc::new(InventoryPager {
            http_client: self.http_client.clone(),
            url: self.list_url.clone(),
            template: ListIntegrationsRequest::viewable_by(
                principal.username(),
                workspace_id,
                self.page_size,
            ),
        });

        let stream = futures::stream::try_unfold(Cursor::Start, move |cursor| {
            let pager = pager.clone();
            async move {
                let continuation_token = match cursor {
                    Cursor::Done => return Ok(None),
                    Cursor::Start => None,
                    Cursor::Token(token) => Some(token),
                };

                pager.fetch(continuation_token).await.map(Some)
            }
        });

        Ok(stream.boxed())
    }
}

enum Cursor {
    Start,
    Token(String),
    Done,
}

struct InventoryPager {
    http_client: reqwest::Client,
    url: Url,
    template: ListIntegrationsRequest,
}

impl InventoryPager {
    async fn fetch(&self, continuation_token: Option<String>) -> AppResult<(IntegrationBatch, Cursor)> {
        let request = self.template.with_continuation_token(continuation_token);

        let response = self
            .http_client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| dependency_error("kessel inventory list", error))?
            .json::<ListIntegrationsResponse>()
            .await
            .map_err(|error| dependency_error("kessel inventory list", error))?;

        let next = match response.next_continuation_token() {
            Some(token) => Cursor::Token(token.to_owned()),
            None => Cursor::Done,
        };

        let batch = IntegrationBatch {
            integrations: response
                .integrations
                .into_iter()
                .map(|listed| IntegrationDescriptor {
                    local_resource_id: listed.reporter_data.local_resource_id,
                })
                .collect(),
        };

        Ok((batch, next))
    }
}
