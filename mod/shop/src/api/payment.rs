//! POST /api/payment — checkout.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::{HeaderValue, SET_COOKIE};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::info;

use auth::model::Claims;

use crate::cart::clear_cart_cookie;

use super::{ApiError, AppState};
use super::cart::cart_from_headers;

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub name: String,
}

/// Create a COMPLETED order from the cookie-held cart.
///
/// An empty cart is a 400 before anything else is looked at. On
/// success the cart cookie is cleared in the response.
pub async fn payment(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
    Json(body): Json<PaymentRequest>,
) -> Response {
    let cart = cart_from_headers(&headers);

    let order = match svc.checkout(&body.name, &cart) {
        Ok(order) => order,
        Err(e) => return ApiError::from(e).into_response(),
    };

    info!(
        order_id = %order.id,
        customer = %claims.email,
        total_cents = order.total_cents,
        "order completed"
    );

    let mut response = (StatusCode::CREATED, Json(order)).into_response();
    if let Ok(value) = HeaderValue::from_str(&clear_cart_cookie()) {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    response
}
