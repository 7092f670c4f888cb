//! Cart Codec — the cookie-held cart and its tolerant string codec.
//!
//! The cart is serialized to a single JSON string written once into the
//! `cart` cookie. No second encoding layer is applied on top — layering
//! URL-encoding over an already-encoded payload is how past cart bugs
//! happened. Decode accepts both the raw form and a percent-encoded
//! legacy form, and degrades to the empty cart on anything unreadable.

use cookie::{Cookie, SameSite};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Cookie name for the cart. Script-readable by design: the storefront
/// renders the cart badge without a server round-trip.
pub const CART_COOKIE: &str = "cart";

/// Cart cookie lifetime: 7 days.
pub const CART_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// One product line in a cart. Quantity is always ≥ 1 — a line at 0 is
/// removed, not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

/// An in-progress order: an ordered sequence of line items, no two of
/// which share an item id.
///
/// Serializes transparently as the line array, so the empty cart is the
/// string `[]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    pub lines: Vec<LineItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of unit price × quantity over all lines.
    pub fn total_cents(&self) -> i64 {
        self.lines
            .iter()
            .map(|l| l.unit_price_cents * l.quantity as i64)
            .sum()
    }

    /// Add a line, merging by item id: adding an id already in the cart
    /// increments its quantity instead of creating a second line.
    pub fn add(&mut self, item_id: &str, name: &str, unit_price_cents: i64, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            line.quantity += quantity;
            return;
        }
        self.lines.push(LineItem {
            item_id: item_id.to_string(),
            name: name.to_string(),
            unit_price_cents,
            quantity,
        });
    }

    /// Decrement a line's quantity, removing the line when it reaches 0.
    /// Unknown item ids are ignored.
    pub fn remove(&mut self, item_id: &str, quantity: u32) {
        if let Some(pos) = self.lines.iter().position(|l| l.item_id == item_id) {
            let line = &mut self.lines[pos];
            line.quantity = line.quantity.saturating_sub(quantity);
            if line.quantity == 0 {
                self.lines.remove(pos);
            }
        }
    }

    /// Serialize to the cookie string. Single JSON pass, no second
    /// encoding layer.
    pub fn encode(&self) -> String {
        // A Vec of plain structs cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parse a cookie value back into a cart.
    ///
    /// Direct parse first; a percent-decoded retry covers legacy
    /// double-encoded values. Anything still unreadable degrades to the
    /// empty cart — a corrupted cookie must never break the page — and
    /// the degrade is logged so it stays diagnosable.
    pub fn decode(raw: &str) -> Cart {
        if let Ok(cart) = serde_json::from_str::<Cart>(raw) {
            return cart.sanitized();
        }

        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        match serde_json::from_str::<Cart>(&decoded) {
            Ok(cart) => cart.sanitized(),
            Err(error) => {
                warn!(%error, "unreadable cart cookie, degrading to empty cart");
                Cart::default()
            }
        }
    }

    /// Drop lines that violate the quantity invariant.
    fn sanitized(mut self) -> Cart {
        self.lines.retain(|l| l.quantity >= 1);
        self
    }
}

/// Build the `Set-Cookie` value carrying a cart. Not HTTP-only — client
/// script reads it.
pub fn cart_cookie(cart: &Cart) -> String {
    Cookie::build((CART_COOKIE, cart.encode()))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(CART_TTL_SECS))
        .build()
        .to_string()
}

/// Build the `Set-Cookie` value that clears the cart after checkout.
pub fn clear_cart_cookie() -> String {
    Cookie::build((CART_COOKIE, ""))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::ZERO)
        .build()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, price: i64, qty: u32) -> LineItem {
        LineItem {
            item_id: id.to_string(),
            name: format!("item {}", id),
            unit_price_cents: price,
            quantity: qty,
        }
    }

    #[test]
    fn test_add_merges_by_item_id() {
        let mut cart = Cart::default();
        cart.add("1", "espresso", 10, 1);
        cart.add("1", "espresso", 10, 1);

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.total_cents(), 20);
    }

    #[test]
    fn test_remove_drops_line_at_zero() {
        let mut cart = Cart {
            lines: vec![line("1", 10, 2), line("2", 30, 1)],
        };

        cart.remove("1", 1);
        assert_eq!(cart.lines[0].quantity, 1);

        cart.remove("1", 1);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].item_id, "2");

        // Unknown ids are ignored.
        cart.remove("nope", 5);
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_roundtrip() {
        let cart = Cart {
            lines: vec![line("1", 250, 2), line("2", 1200, 1)],
        };
        assert_eq!(Cart::decode(&cart.encode()), cart);
    }

    #[test]
    fn test_empty_roundtrip() {
        let empty = Cart::default();
        assert_eq!(empty.encode(), "[]");
        assert_eq!(Cart::decode(&empty.encode()), empty);
    }

    #[test]
    fn test_percent_encoded_legacy_value_decodes() {
        let cart = Cart {
            lines: vec![line("1", 250, 2)],
        };
        let encoded: String =
            percent_encoding::utf8_percent_encode(&cart.encode(), percent_encoding::NON_ALPHANUMERIC)
                .to_string();

        assert_eq!(Cart::decode(&encoded), cart);
    }

    #[test]
    fn test_malformed_degrades_to_empty() {
        for garbage in ["", "not json", "{\"lines\":", "42", "%ZZ%", "[{\"item_id\":1}]"] {
            assert_eq!(Cart::decode(garbage), Cart::default(), "input: {garbage:?}");
        }
    }

    #[test]
    fn test_zero_quantity_lines_are_dropped_on_decode() {
        let raw = r#"[{"item_id":"1","name":"x","unit_price_cents":10,"quantity":0}]"#;
        assert_eq!(Cart::decode(raw), Cart::default());
    }

    #[test]
    fn test_cart_cookie_is_script_readable() {
        let value = cart_cookie(&Cart::default());
        assert!(value.starts_with("cart=[]"));
        assert!(!value.contains("HttpOnly"));
        assert!(value.contains("Max-Age=604800"));
    }
}
