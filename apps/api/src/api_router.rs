use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, put};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

#[cfg(test)]
mod tests;

pub const ENDPOINTS_PATH: &str = "/api/integrations/v2.0/endpoints";

pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            ENDPOINTS_PATH,
            get(handlers::endpoints::list_endpoints_handler),
        )
        .route(
            &format!("{ENDPOINTS_PATH}/{{endpoint_id}}"),
            get(handlers::endpoints::get_endpoint_handler)
                .delete(handlers::endpoints::delete_endpoint_handler),
        )
        .route(
            &format!("{ENDPOINTS_PATH}/{{endpoint_id}}/history"),
            get(handlers::endpoints::get_endpoint_history_handler),
        )
        .route(
            &format!("{ENDPOINTS_PATH}/{{endpoint_id}}/enable"),
            put(handlers::endpoints::enable_endpoint_handler)
                .delete(handlers::endpoints::disable_endpoint_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_identity,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
