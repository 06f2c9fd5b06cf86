use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api_config::StorageBackend;
use crate::dto::{HealthResponse, StorageHealth};
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = check_storage(&state).await;

    let ready = storage.status == "ok";
    let status = if ready { "ok" } else { "degraded" };
    let http_status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            ready,
            storage,
        }),
    )
}

async fn check_storage(state: &AppState) -> StorageHealth {
    let backend = state.storage.as_str();

    let Some(pool) = state.postgres_pool.as_ref() else {
        return match state.storage {
            StorageBackend::Memory => StorageHealth {
                backend,
                status: "ok",
                detail: None,
            },
            StorageBackend::Postgres => StorageHealth {
                backend,
                status: "error",
                detail: Some("postgres pool is not configured".to_owned()),
            },
        };
    };

    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
        Ok(_) => StorageHealth {
            backend,
            status: "ok",
            detail: None,
        },
        Err(error) => StorageHealth {
            backend,
            status: "error",
            detail: Some(format!("postgres check failed: {error}")),
        },
    }
}
