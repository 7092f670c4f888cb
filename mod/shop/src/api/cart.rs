//! Cart endpoints — read and mutate the cookie-held cart.
//!
//! The server never stores the cart; every response that changes it
//! re-sets the `cart` cookie in full.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::{HeaderValue, SET_COOKIE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use auth::guard::request_cookies;

use crate::cart::{CART_COOKIE, Cart, LineItem, cart_cookie};

use super::{ApiError, AppState};

/// The cart as returned to clients: its lines plus the computed total.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<LineItem>,
    pub total_cents: i64,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let total_cents = cart.total_cents();
        CartView {
            lines: cart.lines,
            total_cents,
        }
    }
}

/// Read the cart out of the request cookies. A missing or unreadable
/// cookie is the empty cart.
pub(crate) fn cart_from_headers(headers: &HeaderMap) -> Cart {
    let cookies = request_cookies(headers);
    match cookies.get(CART_COOKIE) {
        Some(raw) => Cart::decode(raw),
        None => Cart::default(),
    }
}

/// Handle GET /api/cart.
pub async fn get_cart(headers: HeaderMap) -> Json<CartView> {
    Json(cart_from_headers(&headers).into())
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    #[default]
    Add,
    Remove,
}

/// Cart mutation request. Quantity defaults to 1.
#[derive(Debug, Deserialize)]
pub struct CartUpdate {
    #[serde(default)]
    pub item_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub action: CartAction,
}

fn default_quantity() -> u32 {
    1
}

/// Handle POST /api/cart.
///
/// `add` merges the item into the cart (looked up in the catalog for
/// its current name and price); `remove` decrements and drops the line
/// at zero. The response carries the re-encoded cart cookie.
pub async fn update_cart(
    State(svc): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CartUpdate>,
) -> Response {
    if body.item_id.trim().is_empty() {
        return ApiError::from(crate::service::ShopError::Validation(
            "missing 'item_id' field".into(),
        ))
        .into_response();
    }

    let mut cart = cart_from_headers(&headers);

    match body.action {
        CartAction::Add => {
            let item = match svc.get_item(&body.item_id) {
                Ok(item) => item,
                Err(e) => return ApiError::from(e).into_response(),
            };
            cart.add(&item.id, &item.name, item.price_cents, body.quantity);
        }
        CartAction::Remove => {
            cart.remove(&body.item_id, body.quantity);
        }
    }

    let cookie = cart_cookie(&cart);
    let mut response = Json(CartView::from(cart)).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    response
}
