mod cart;
mod catalog;
mod likes;
mod orders;
mod payment;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use bistro_core::ServiceError;

use crate::service::{ShopError, ShopService};

/// Shared application state.
pub type AppState = Arc<ShopService>;

/// Customer Gateway shop routes: browse, search, cart, payment, likes.
pub fn customer_router(svc: AppState) -> Router {
    Router::new()
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/items/{id}", get(catalog::get_item))
        .route("/api/search", get(catalog::search))
        .route("/api/cart", get(cart::get_cart).post(cart::update_cart))
        .route("/api/payment", post(payment::payment))
        .route("/api/likes", get(likes::list_likes))
        .route("/api/likes/{id}", post(likes::like).delete(likes::unlike))
        .with_state(svc)
}

/// Admin Gateway shop routes: catalog CRUD and order listings. Every
/// handler re-checks the ADMIN role.
pub fn admin_router(svc: AppState) -> Router {
    Router::new()
        .route("/api/categories", get(catalog::list_categories_admin))
        .route("/api/categories/create", post(catalog::create_category))
        .route("/api/categories/{id}/edit", post(catalog::edit_category))
        .route("/api/categories/{id}", delete(catalog::delete_category))
        .route("/api/items/create", post(catalog::create_item))
        .route("/api/items/{id}/edit", post(catalog::edit_item))
        .route(
            "/api/items/{id}",
            get(catalog::get_item_admin).delete(catalog::delete_item),
        )
        .route("/api/orders", get(orders::list_orders))
        .route("/api/orders/{id}", get(orders::get_order))
        .with_state(svc)
}

/// Gateway API error body: `{"error": "<message>"}` with the status
/// taken from the service error taxonomy.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl From<ShopError> for ApiError {
    fn from(err: ShopError) -> Self {
        ServiceError::from(err).into()
    }
}

/// Wrap a service result into an API response.
pub(crate) fn ok_json<T: serde::Serialize>(
    result: Result<T, ShopError>,
) -> Result<Json<T>, ApiError> {
    result.map(Json).map_err(ApiError::from)
}
