use bistro_sql::SqlStore;

use crate::service::ShopError;

/// Initialize the SQLite schema for shop resources.
pub fn init_schema(sql: &dyn SqlStore) -> Result<(), ShopError> {
    let statements = [
        // Categories: menu sections.
        "CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            data TEXT NOT NULL,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        )",

        // Items: orderable products.
        "CREATE TABLE IF NOT EXISTS items (
            id TEXT PRIMARY KEY,
            data TEXT NOT NULL,
            category_id TEXT NOT NULL,
            name TEXT NOT NULL,
            price_cents INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_items_category ON items(category_id)",
        "CREATE INDEX IF NOT EXISTS idx_items_name ON items(name)",

        // Orders: immutable checkout snapshots.
        "CREATE TABLE IF NOT EXISTS orders (
            id TEXT PRIMARY KEY,
            data TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            total_cents INTEGER NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_orders_created ON orders(created_at)",

        // Likes: one bookmark per (user, item).
        "CREATE TABLE IF NOT EXISTS likes (
            id TEXT PRIMARY KEY,
            data TEXT NOT NULL,
            user_id TEXT NOT NULL,
            item_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, item_id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_likes_item ON likes(item_id)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| ShopError::Storage(e.to_string()))?;
    }

    Ok(())
}
