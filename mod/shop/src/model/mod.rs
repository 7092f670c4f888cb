use serde::{Deserialize, Serialize};

/// A menu section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Section name. Unique, non-empty.
    pub name: String,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// A category together with its items, as the menu endpoint returns it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithItems {
    #[serde(flatten)]
    pub category: Category,
    pub items: Vec<Item>,
}

/// One orderable product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Owning category id.
    pub category_id: String,

    /// Display name. Non-empty.
    pub name: String,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// Unit price in cents. Always ≥ 1.
    pub price_cents: i64,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

/// Input for creating an item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_cents: i64,
}

/// Order lifecycle. Only completed purchases are modeled — there are no
/// partial or failed states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "COMPLETED")]
    Completed,
}

/// One product line snapshotted into an order at checkout time.
///
/// Name and unit price are copied from the catalog so later item edits
/// cannot change what a past order says it cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

/// A completed purchase. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Name given at checkout.
    pub customer_name: String,

    /// Total in cents. Always equals the sum over the snapshot lines.
    pub total_cents: i64,

    pub status: OrderStatus,

    /// Snapshot of the purchased lines.
    pub lines: Vec<OrderLine>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// A customer's bookmark on an item. One per (user, item).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    pub created_at: String,
}
