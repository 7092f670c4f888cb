//! Likes — customer bookmarks on items.

use bistro_core::{new_id, now_rfc3339};
use bistro_sql::Value;

use crate::model::{Item, Like};
use crate::service::{ShopError, ShopService};

impl ShopService {
    /// Record a like. Liking an already-liked item is a no-op, not an
    /// error.
    pub fn like_item(&self, user_id: &str, item_id: &str) -> Result<(), ShopError> {
        // The item must still exist.
        let _: Item = self.get_record("items", item_id)?;

        let like = Like {
            id: new_id(),
            user_id: user_id.to_string(),
            item_id: item_id.to_string(),
            created_at: now_rfc3339(),
        };

        match self.insert_record(
            "likes",
            &like.id,
            &like,
            &[
                ("user_id", Value::Text(like.user_id.clone())),
                ("item_id", Value::Text(like.item_id.clone())),
                ("created_at", Value::Text(like.created_at.clone())),
            ],
        ) {
            Ok(()) => Ok(()),
            // (user, item) already present — idempotent.
            Err(ShopError::Conflict(_)) => Ok(()),
            Err(other) => Err(other),
        }
    }

    /// Remove a like. Removing a like that doesn't exist is a no-op.
    pub fn unlike_item(&self, user_id: &str, item_id: &str) -> Result<(), ShopError> {
        self.sql
            .exec(
                "DELETE FROM likes WHERE user_id = ?1 AND item_id = ?2",
                &[
                    Value::Text(user_id.to_string()),
                    Value::Text(item_id.to_string()),
                ],
            )
            .map_err(|e| ShopError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Every like a user has, newest first.
    pub fn likes_for_user(&self, user_id: &str) -> Result<Vec<Like>, ShopError> {
        self.query_records(
            "SELECT data FROM likes WHERE user_id = ?1 ORDER BY created_at DESC",
            &[Value::Text(user_id.to_string())],
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bistro_sql::SqliteStore;

    use super::*;
    use crate::model::CreateItem;

    fn service_with_item() -> (Arc<ShopService>, Item) {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let svc = ShopService::new(sql).unwrap();
        let cat = svc.create_category("Drinks").unwrap();
        let item = svc
            .create_item(CreateItem {
                category_id: cat.id,
                name: "Espresso".into(),
                description: String::new(),
                price_cents: 250,
            })
            .unwrap();
        (svc, item)
    }

    #[test]
    fn test_like_is_idempotent() {
        let (svc, item) = service_with_item();

        svc.like_item("u1", &item.id).unwrap();
        svc.like_item("u1", &item.id).unwrap();

        assert_eq!(svc.likes_for_user("u1").unwrap().len(), 1);
    }

    #[test]
    fn test_like_missing_item_is_not_found() {
        let (svc, _) = service_with_item();
        let err = svc.like_item("u1", "missing").unwrap_err();
        assert!(matches!(err, ShopError::NotFound(_)));
    }

    #[test]
    fn test_unlike() {
        let (svc, item) = service_with_item();
        svc.like_item("u1", &item.id).unwrap();

        svc.unlike_item("u1", &item.id).unwrap();
        assert!(svc.likes_for_user("u1").unwrap().is_empty());

        // Removing again is fine.
        svc.unlike_item("u1", &item.id).unwrap();
    }
}
