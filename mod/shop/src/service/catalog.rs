//! Catalog operations: categories, items, search, cascading deletes.

use bistro_core::{new_id, now_rfc3339};
use bistro_sql::{Statement, Value};

use crate::model::{Category, CategoryWithItems, CreateItem, Item};
use crate::service::{ShopError, ShopService};

impl ShopService {
    // ── Categories ──

    pub fn create_category(&self, name: &str) -> Result<Category, ShopError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ShopError::Validation("category name must not be empty".into()));
        }

        let category = Category {
            id: new_id(),
            name: name.to_string(),
            created_at: now_rfc3339(),
        };

        self.insert_record(
            "categories",
            &category.id,
            &category,
            &[
                ("name", Value::Text(category.name.clone())),
                ("created_at", Value::Text(category.created_at.clone())),
            ],
        )
        .map_err(|e| match e {
            ShopError::Conflict(_) => {
                ShopError::Conflict(format!("category '{}' already exists", name))
            }
            other => other,
        })?;

        Ok(category)
    }

    pub fn get_category(&self, id: &str) -> Result<Category, ShopError> {
        self.get_record("categories", id)
    }

    pub fn rename_category(&self, id: &str, name: &str) -> Result<Category, ShopError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ShopError::Validation("category name must not be empty".into()));
        }

        let mut category: Category = self.get_record("categories", id)?;
        category.name = name.to_string();

        self.update_record(
            "categories",
            id,
            &category,
            &[("name", Value::Text(category.name.clone()))],
        )?;

        Ok(category)
    }

    /// Delete a category and everything under it — its items and their
    /// likes — in one transaction.
    pub fn delete_category(&self, id: &str) -> Result<(), ShopError> {
        // Existence check up front so a bad id is a 404, not a no-op.
        let _: Category = self.get_record("categories", id)?;

        self.sql
            .exec_batch(&[
                Statement::new(
                    "DELETE FROM likes WHERE item_id IN (SELECT id FROM items WHERE category_id = ?1)",
                    vec![Value::Text(id.to_string())],
                ),
                Statement::new(
                    "DELETE FROM items WHERE category_id = ?1",
                    vec![Value::Text(id.to_string())],
                ),
                Statement::new(
                    "DELETE FROM categories WHERE id = ?1",
                    vec![Value::Text(id.to_string())],
                ),
            ])
            .map_err(|e| ShopError::Storage(e.to_string()))?;

        Ok(())
    }

    /// List every category with its items, the shape the menu renders.
    pub fn list_categories(&self) -> Result<Vec<CategoryWithItems>, ShopError> {
        let categories: Vec<Category> =
            self.query_records("SELECT data FROM categories ORDER BY name ASC", &[])?;
        let items: Vec<Item> =
            self.query_records("SELECT data FROM items ORDER BY name ASC", &[])?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let items = items
                    .iter()
                    .filter(|i| i.category_id == category.id)
                    .cloned()
                    .collect();
                CategoryWithItems { category, items }
            })
            .collect())
    }

    // ── Items ──

    pub fn create_item(&self, input: CreateItem) -> Result<Item, ShopError> {
        validate_item_fields(&input.name, input.price_cents)?;
        // The owning category must exist.
        let _: Category = self.get_record("categories", &input.category_id)?;

        let now = now_rfc3339();
        let item = Item {
            id: new_id(),
            category_id: input.category_id,
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            price_cents: input.price_cents,
            created_at: now.clone(),
            updated_at: now,
        };

        self.insert_record(
            "items",
            &item.id,
            &item,
            &[
                ("category_id", Value::Text(item.category_id.clone())),
                ("name", Value::Text(item.name.clone())),
                ("price_cents", Value::Integer(item.price_cents)),
                ("created_at", Value::Text(item.created_at.clone())),
                ("updated_at", Value::Text(item.updated_at.clone())),
            ],
        )?;

        Ok(item)
    }

    pub fn get_item(&self, id: &str) -> Result<Item, ShopError> {
        self.get_record("items", id)
    }

    pub fn update_item(&self, id: &str, input: CreateItem) -> Result<Item, ShopError> {
        validate_item_fields(&input.name, input.price_cents)?;
        let _: Category = self.get_record("categories", &input.category_id)?;

        let current: Item = self.get_record("items", id)?;
        let item = Item {
            category_id: input.category_id,
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            price_cents: input.price_cents,
            updated_at: now_rfc3339(),
            ..current
        };

        self.update_record(
            "items",
            id,
            &item,
            &[
                ("category_id", Value::Text(item.category_id.clone())),
                ("name", Value::Text(item.name.clone())),
                ("price_cents", Value::Integer(item.price_cents)),
                ("updated_at", Value::Text(item.updated_at.clone())),
            ],
        )?;

        Ok(item)
    }

    /// Delete an item and its likes in one transaction.
    pub fn delete_item(&self, id: &str) -> Result<(), ShopError> {
        let _: Item = self.get_record("items", id)?;

        self.sql
            .exec_batch(&[
                Statement::new(
                    "DELETE FROM likes WHERE item_id = ?1",
                    vec![Value::Text(id.to_string())],
                ),
                Statement::new(
                    "DELETE FROM items WHERE id = ?1",
                    vec![Value::Text(id.to_string())],
                ),
            ])
            .map_err(|e| ShopError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Substring search over item names. One store query, nothing more.
    pub fn search_items(&self, query: &str) -> Result<Vec<Item>, ShopError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ShopError::Validation("search query must not be empty".into()));
        }

        let pattern = format!("%{}%", escape_like(query));
        self.query_records(
            "SELECT data FROM items WHERE name LIKE ?1 ESCAPE '\\' ORDER BY name ASC",
            &[Value::Text(pattern)],
        )
    }
}

fn validate_item_fields(name: &str, price_cents: i64) -> Result<(), ShopError> {
    if name.trim().is_empty() {
        return Err(ShopError::Validation("item name must not be empty".into()));
    }
    if price_cents < 1 {
        return Err(ShopError::Validation("price_cents must be at least 1".into()));
    }
    Ok(())
}

/// Escape LIKE wildcards so a query for "100%" matches literally.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bistro_sql::SqliteStore;

    use super::*;

    fn test_service() -> Arc<ShopService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        ShopService::new(sql).unwrap()
    }

    fn seed_item(svc: &ShopService, category_id: &str, name: &str, price: i64) -> Item {
        svc.create_item(CreateItem {
            category_id: category_id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price_cents: price,
        })
        .unwrap()
    }

    #[test]
    fn test_category_crud() {
        let svc = test_service();

        let cat = svc.create_category("Mains").unwrap();
        assert_eq!(cat.name, "Mains");

        let dup = svc.create_category("Mains");
        assert!(matches!(dup, Err(ShopError::Conflict(_))));

        let renamed = svc.rename_category(&cat.id, "Main Courses").unwrap();
        assert_eq!(renamed.name, "Main Courses");

        let missing = svc.rename_category("nope", "X");
        assert!(matches!(missing, Err(ShopError::NotFound(_))));
    }

    #[test]
    fn test_item_validation() {
        let svc = test_service();
        let cat = svc.create_category("Mains").unwrap();

        let no_name = svc.create_item(CreateItem {
            category_id: cat.id.clone(),
            name: "  ".into(),
            description: String::new(),
            price_cents: 100,
        });
        assert!(matches!(no_name, Err(ShopError::Validation(_))));

        let free = svc.create_item(CreateItem {
            category_id: cat.id.clone(),
            name: "Soup".into(),
            description: String::new(),
            price_cents: 0,
        });
        assert!(matches!(free, Err(ShopError::Validation(_))));

        let orphan = svc.create_item(CreateItem {
            category_id: "missing".into(),
            name: "Soup".into(),
            description: String::new(),
            price_cents: 100,
        });
        assert!(matches!(orphan, Err(ShopError::NotFound(_))));
    }

    #[test]
    fn test_list_categories_groups_items() {
        let svc = test_service();
        let mains = svc.create_category("Mains").unwrap();
        let drinks = svc.create_category("Drinks").unwrap();
        seed_item(&svc, &mains.id, "Steak", 2500);
        seed_item(&svc, &drinks.id, "Espresso", 250);
        seed_item(&svc, &drinks.id, "Tea", 200);

        let listing = svc.list_categories().unwrap();
        assert_eq!(listing.len(), 2);
        // Ordered by name: Drinks first.
        assert_eq!(listing[0].category.name, "Drinks");
        assert_eq!(listing[0].items.len(), 2);
        assert_eq!(listing[1].items.len(), 1);
    }

    #[test]
    fn test_search_items() {
        let svc = test_service();
        let cat = svc.create_category("Drinks").unwrap();
        seed_item(&svc, &cat.id, "Espresso", 250);
        seed_item(&svc, &cat.id, "Double Espresso", 350);
        seed_item(&svc, &cat.id, "Tea", 200);

        let hits = svc.search_items("espresso").unwrap();
        assert_eq!(hits.len(), 2);

        let none = svc.search_items("pizza").unwrap();
        assert!(none.is_empty());

        let empty = svc.search_items("   ");
        assert!(matches!(empty, Err(ShopError::Validation(_))));
    }

    #[test]
    fn test_delete_item_cascades_likes() {
        let svc = test_service();
        let cat = svc.create_category("Drinks").unwrap();
        let item = seed_item(&svc, &cat.id, "Espresso", 250);
        svc.like_item("u1", &item.id).unwrap();

        svc.delete_item(&item.id).unwrap();

        assert!(matches!(svc.get_item(&item.id), Err(ShopError::NotFound(_))));
        assert!(svc.likes_for_user("u1").unwrap().is_empty());
    }

    #[test]
    fn test_delete_category_cascades_items_and_likes() {
        let svc = test_service();
        let cat = svc.create_category("Drinks").unwrap();
        let keep = svc.create_category("Mains").unwrap();
        let item = seed_item(&svc, &cat.id, "Espresso", 250);
        let kept_item = seed_item(&svc, &keep.id, "Steak", 2500);
        svc.like_item("u1", &item.id).unwrap();
        svc.like_item("u1", &kept_item.id).unwrap();

        svc.delete_category(&cat.id).unwrap();

        assert!(matches!(svc.get_category(&cat.id), Err(ShopError::NotFound(_))));
        assert!(matches!(svc.get_item(&item.id), Err(ShopError::NotFound(_))));
        // The other category's rows are untouched.
        assert!(svc.get_item(&kept_item.id).is_ok());
        assert_eq!(svc.likes_for_user("u1").unwrap().len(), 1);
    }

    #[test]
    fn test_like_search_escapes_wildcards() {
        let svc = test_service();
        let cat = svc.create_category("Specials").unwrap();
        seed_item(&svc, &cat.id, "100% Rye Bread", 600);
        seed_item(&svc, &cat.id, "Rye Bread", 500);

        let hits = svc.search_items("100%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "100% Rye Bread");
    }
}
