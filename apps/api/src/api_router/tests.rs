use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use futures::StreamExt;
use http_body_util::BodyExt;
use integrations_application::{
    AuthorizationModeConfig, AuthorizationRouter, AuthorizedIdCollector, EndpointService,
    IntegrationBatch, IntegrationBatchStream, IntegrationDescriptor, LegacyRoleGate,
    PermissionOracle, RelationGate, WorkspaceResolver,
};
use integrations_core::{AppError, AppResult, LegacyRole, OrgId, Principal};
use integrations_domain::{Endpoint, EndpointInput, EndpointStatus, EndpointType, IntegrationPermission};
use integrations_infrastructure::{InMemoryEndpointRepository, StaticRoleResolver};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use super::{ENDPOINTS_PATH, build_router};
use crate::api_config::StorageBackend;
use crate::middleware::IDENTITY_HEADER;
use crate::state::AppState;

enum OracleBehavior {
    Allow(Vec<Uuid>),
    AllowSeeded,
    Unavailable,
}

struct StubOracle {
    behavior: OracleBehavior,
    calls: AtomicUsize,
}

#[async_trait]
impl PermissionOracle for StubOracle {
    async fn check(
        &self,
        _principal: &Principal,
        _permission: IntegrationPermission,
        integration_id: Uuid,
    ) -> AppResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            OracleBehavior::Allow(ids) => Ok(ids.contains(&integration_id)),
            OracleBehavior::AllowSeeded | OracleBehavior::Unavailable => {
                Err(AppError::Dependency("relations api unavailable".to_owned()))
            }
        }
    }

    async fn list_integrations(
        &self,
        _principal: &Principal,
        _workspace_id: Uuid,
    ) -> AppResult<IntegrationBatchStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let OracleBehavior::Allow(ids) = &self.behavior else {
            return Err(AppError::Dependency("inventory api unavailable".to_owned()));
        };
        let batch = IntegrationBatch {
            integrations: ids
                .iter()
                .map(|id| IntegrationDescriptor {
                    local_resource_id: id.to_string(),
                })
                .collect(),
        };
        Ok(futures::stream::iter(vec![Ok(batch)]).boxed())
    }
}

struct StubWorkspace;

#[async_trait]
impl WorkspaceResolver for StubWorkspace {
    async fn default_workspace_id(&self, _org_id: &OrgId) -> AppResult<Uuid> {
        Ok(Uuid::nil())
    }
}

struct TestApp {
    router: Router,
    webhook_id: Uuid,
    oracle: Arc<StubOracle>,
}

async fn test_app(relations: bool, oracle: OracleBehavior, roles: &[LegacyRole]) -> TestApp {
    let store = Arc::new(InMemoryEndpointRepository::new());
    let webhook_id = Uuid::new_v4();
    for (id, name, org) in [
        (webhook_id, "ops webhook", "org-1"),
        (Uuid::new_v4(), "other org hook", "org-2"),
    ] {
        let Ok(org_id) = OrgId::new(org) else {
            panic!("org id should be valid");
        };
        let endpoint = Endpoint::new(EndpointInput {
            id,
            org_id,
            name: name.to_owned(),
            description: String::new(),
            endpoint_type: EndpointType::Webhook,
            sub_type: None,
            enabled: true,
            status: EndpointStatus::Ready,
            server_errors: 0,
            properties: Some(json!({"url": "https://example.com/hook"})),
            created: Utc::now(),
            updated: None,
        });
        let Ok(endpoint) = endpoint else {
            panic!("endpoint should be valid");
        };
        assert!(store.insert_endpoint(endpoint).await.is_ok());
    }

    let oracle = match oracle {
        OracleBehavior::AllowSeeded => OracleBehavior::Allow(vec![webhook_id]),
        other => other,
    };
    let oracle = Arc::new(StubOracle {
        behavior: oracle,
        calls: AtomicUsize::new(0),
    });
    let collector =
        AuthorizedIdCollector::new(oracle.clone(), Arc::new(StubWorkspace), Duration::from_secs(5));
    let router = AuthorizationRouter::new(
        AuthorizationModeConfig::new(relations, BTreeSet::new()),
        Arc::new(RelationGate::new(oracle.clone(), collector)),
        Arc::new(LegacyRoleGate::new()),
    );

    let state = AppState {
        endpoint_service: EndpointService::new(router, store.clone(), store),
        role_resolver: Arc::new(StaticRoleResolver::new(roles.iter().copied().collect())),
        storage: StorageBackend::Memory,
        postgres_pool: None,
        max_page_size: 200,
    };

    TestApp {
        router: build_router(state),
        webhook_id,
        oracle,
    }
}

fn identity() -> String {
    STANDARD.encode(r#"{"identity":{"org_id":"org-1","user":{"username":"alice"}}}"#)
}

async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(IDENTITY_HEADER, identity())
        .body(Body::empty());
    let Ok(request) = request else {
        panic!("request should build");
    };

    let response = router.clone().oneshot(request).await;
    let Ok(response) = response else {
        panic!("router should respond");
    };
    let status = response.status();
    let Ok(body) = response.into_body().collect().await else {
        panic!("body should be readable");
    };
    let bytes = body.to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

#[tokio::test]
async fn health_reports_memory_storage() {
    let app = test_app(false, OracleBehavior::Allow(Vec::new()), &[]).await;

    let (status, body) = send(&app.router, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["storage"]["backend"], "memory");
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let app = test_app(false, OracleBehavior::Allow(Vec::new()), &[]).await;
    let Ok(request) = Request::builder().uri(ENDPOINTS_PATH).body(Body::empty()) else {
        panic!("request should build");
    };

    let response = app.router.clone().oneshot(request).await;

    assert!(matches!(response, Ok(ref response) if response.status() == StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn legacy_reader_lists_own_org_with_links() {
    let app = test_app(
        false,
        OracleBehavior::Unavailable,
        &[LegacyRole::IntegrationsEndpointsRead],
    )
    .await;

    let (status, body) = send(&app.router, "GET", &format!("{ENDPOINTS_PATH}?limit=10")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["id"], app.webhook_id.to_string());
    assert_eq!(body["data"][0]["type"], "webhook");
    assert_eq!(
        body["links"]["first"],
        format!("{ENDPOINTS_PATH}?limit=10&offset=0")
    );
}

#[tokio::test]
async fn legacy_caller_without_role_is_forbidden() {
    let app = test_app(false, OracleBehavior::Allow(Vec::new()), &[]).await;

    let (status, body) = send(&app.router, "GET", ENDPOINTS_PATH).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn relation_denial_looks_the_same_for_missing_endpoints() {
    let app = test_app(true, OracleBehavior::Allow(Vec::new()), &[]).await;

    let (existing, _) = send(
        &app.router,
        "GET",
        &format!("{ENDPOINTS_PATH}/{}", app.webhook_id),
    )
    .await;
    let (missing, _) = send(
        &app.router,
        "GET",
        &format!("{ENDPOINTS_PATH}/{}", Uuid::new_v4()),
    )
    .await;

    assert_eq!(existing, StatusCode::FORBIDDEN);
    assert_eq!(missing, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn empty_authorized_set_yields_empty_page() {
    let app = test_app(true, OracleBehavior::Allow(Vec::new()), &[]).await;

    let (status, body) = send(&app.router, "GET", ENDPOINTS_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["links"], json!({}));
    assert_eq!(body["meta"]["count"], 0);
}

#[tokio::test]
async fn relation_allowed_caller_reads_endpoint_without_properties() {
    let app = test_app(true, OracleBehavior::AllowSeeded, &[]).await;
    let endpoint_path = format!("{ENDPOINTS_PATH}/{}", app.webhook_id);

    let (status, detailed) = send(&app.router, "GET", &endpoint_path).await;
    let (_, summary) = send(
        &app.router,
        "GET",
        &format!("{endpoint_path}?includeDetail=false"),
    )
    .await;
    let (_, listing) = send(&app.router, "GET", ENDPOINTS_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(detailed["properties"]["url"], "https://example.com/hook");
    assert!(summary["properties"].is_null());
    assert_eq!(listing["meta"]["count"], 1);
}

#[tokio::test]
async fn dependency_failure_maps_to_bad_gateway() {
    let app = test_app(true, OracleBehavior::Unavailable, &[]).await;

    let (status, _) = send(
        &app.router,
        "GET",
        &format!("{ENDPOINTS_PATH}/{}", app.webhook_id),
    )
    .await;
    let (list_status, _) = send(&app.router, "GET", ENDPOINTS_PATH).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(list_status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn invalid_query_is_bad_request() {
    let app = test_app(
        false,
        OracleBehavior::Allow(Vec::new()),
        &[LegacyRole::IntegrationsEndpointsRead],
    )
    .await;

    let (status, _) = send(&app.router, "GET", &format!("{ENDPOINTS_PATH}?limit=-1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn legacy_writer_disables_then_deletes() {
    let app = test_app(
        false,
        OracleBehavior::Allow(Vec::new()),
        &[LegacyRole::IntegrationsEndpointsWrite],
    )
    .await;
    let endpoint_path = format!("{ENDPOINTS_PATH}/{}", app.webhook_id);

    let (disabled, _) = send(&app.router, "DELETE", &format!("{endpoint_path}/enable")).await;
    let (_, fetched) = send(&app.router, "GET", &endpoint_path).await;
    let (deleted, _) = send(&app.router, "DELETE", &endpoint_path).await;
    let (gone, _) = send(&app.router, "GET", &endpoint_path).await;

    assert_eq!(disabled, StatusCode::NO_CONTENT);
    assert_eq!(fetched["enabled"], false);
    assert_eq!(deleted, StatusCode::NO_CONTENT);
    assert_eq!(gone, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn relation_mode_rejects_bad_pagination_before_asking_the_oracle() {
    let app = test_app(true, OracleBehavior::AllowSeeded, &[]).await;

    let (negative, _) = send(&app.router, "GET", &format!("{ENDPOINTS_PATH}?limit=-1")).await;
    let (oversized, _) = send(&app.router, "GET", &format!("{ENDPOINTS_PATH}?limit=201")).await;
    let (history, _) = send(
        &app.router,
        "GET",
        &format!("{ENDPOINTS_PATH}/{}/history?offset=-5", app.webhook_id),
    )
    .await;

    assert_eq!(negative, StatusCode::BAD_REQUEST);
    assert_eq!(oversized, StatusCode::BAD_REQUEST);
    assert_eq!(history, StatusCode::BAD_REQUEST);
    assert_eq!(app.oracle.calls.load(Ordering::SeqCst), 0);
}
