//! Checkout and order listings.

use bistro_core::{ListParams, ListResult, new_id, now_rfc3339};
use bistro_sql::Value;

use crate::cart::Cart;
use crate::model::{Item, Order, OrderLine, OrderStatus};
use crate::service::{ShopError, ShopService};

impl ShopService {
    /// Create a COMPLETED order from a non-empty cart.
    ///
    /// Lines are re-priced from the catalog at creation time: the
    /// snapshot records what the store says items cost now, not what a
    /// client-held cookie claims. The total therefore always equals the
    /// sum over the snapshot.
    pub fn checkout(&self, customer_name: &str, cart: &Cart) -> Result<Order, ShopError> {
        if cart.is_empty() {
            return Err(ShopError::Validation("Cart is empty.".into()));
        }

        let customer_name = customer_name.trim();
        if customer_name.is_empty() {
            return Err(ShopError::Validation("customer name must not be empty".into()));
        }

        let mut lines = Vec::with_capacity(cart.lines.len());
        for cart_line in &cart.lines {
            let item: Item = self.get_record("items", &cart_line.item_id).map_err(|e| {
                match e {
                    ShopError::NotFound(_) => ShopError::NotFound(format!(
                        "item '{}' is no longer available",
                        cart_line.name
                    )),
                    other => other,
                }
            })?;
            lines.push(OrderLine {
                item_id: item.id,
                name: item.name,
                unit_price_cents: item.price_cents,
                quantity: cart_line.quantity,
            });
        }

        let total_cents = lines
            .iter()
            .map(|l| l.unit_price_cents * l.quantity as i64)
            .sum();

        let order = Order {
            id: new_id(),
            customer_name: customer_name.to_string(),
            total_cents,
            status: OrderStatus::Completed,
            lines,
            created_at: now_rfc3339(),
        };

        self.insert_record(
            "orders",
            &order.id,
            &order,
            &[
                ("customer_name", Value::Text(order.customer_name.clone())),
                ("total_cents", Value::Integer(order.total_cents)),
                ("status", Value::Text("COMPLETED".into())),
                ("created_at", Value::Text(order.created_at.clone())),
            ],
        )?;

        Ok(order)
    }

    pub fn get_order(&self, id: &str) -> Result<Order, ShopError> {
        self.get_record("orders", id)
    }

    /// List orders, newest first.
    pub fn list_orders(&self, params: &ListParams) -> Result<ListResult<Order>, ShopError> {
        let count_rows = self
            .sql
            .query("SELECT COUNT(*) as cnt FROM orders", &[])
            .map_err(|e| ShopError::Storage(e.to_string()))?;
        let total = count_rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0) as usize;

        let limit = params.limit.min(500);
        let items = self.query_records(
            "SELECT data FROM orders ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
            &[
                Value::Integer(limit as i64),
                Value::Integer(params.offset as i64),
            ],
        )?;

        Ok(ListResult { items, total })
    }
}
