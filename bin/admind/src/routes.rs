//! Route registration — pages, module routes, system endpoints, guard layer.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use tracing::info;

use auth::guard::{Guard, access_guard};

/// Build the complete router with all routes.
pub fn build_router(guard: Arc<Guard>, module_routes: Vec<(&'static str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/", get(index_page))
        .route("/login", get(login_page))
        .route("/health", get(health))
        .route("/version", get(version));

    for (name, router) in module_routes {
        info!(module = name, "mounting module routes");
        app = app.merge(router);
    }

    app.layer(middleware::from_fn_with_state(guard, access_guard))
}

async fn index_page() -> impl IntoResponse {
    Html(include_str!("web/index.html"))
}

async fn login_page() -> impl IntoResponse {
    Html(include_str!("web/login.html"))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "bistro-admind",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
