pub mod catalog;
pub mod like;
pub mod order;
pub mod schema;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use bistro_sql::{SqlStore, Value};

/// Shop service error type.
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<ShopError> for bistro_core::ServiceError {
    fn from(e: ShopError) -> Self {
        match e {
            ShopError::NotFound(m) => bistro_core::ServiceError::NotFound(m),
            ShopError::Conflict(m) => bistro_core::ServiceError::Conflict(m),
            ShopError::Validation(m) => bistro_core::ServiceError::Validation(m),
            ShopError::Storage(m) => bistro_core::ServiceError::Storage(m),
            ShopError::Internal(m) => bistro_core::ServiceError::Internal(m),
        }
    }
}

/// The Shop service. Holds the injected store handle.
pub struct ShopService {
    pub(crate) sql: Arc<dyn SqlStore>,
}

impl ShopService {
    /// Create a new ShopService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SqlStore>) -> Result<Arc<Self>, ShopError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql }))
    }

    // ── Generic record helpers (JSON data column + indexed columns) ──

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), ShopError> {
        let json = serde_json::to_string(record).map_err(|e| ShopError::Internal(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 3;
            cols.push(col);
            placeholders.push(format!("?{}", idx));
            params.push(val.clone());
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            cols.join(", "),
            placeholders.join(", "),
        );

        self.sql.exec(&sql, &params).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint") {
                ShopError::Conflict(msg)
            } else {
                ShopError::Storage(msg)
            }
        })?;

        Ok(())
    }

    /// Get a record by id, deserializing the JSON `data` column.
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<T, ShopError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
        let rows = self
            .sql
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| ShopError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| ShopError::NotFound(format!("{}/{}", table, id)))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| ShopError::Internal("missing data column".into()))?;
        serde_json::from_str(data).map_err(|e| ShopError::Internal(e.to_string()))
    }

    /// Update a record's JSON data and indexed columns.
    pub(crate) fn update_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), ShopError> {
        let json = serde_json::to_string(record).map_err(|e| ShopError::Internal(e.to_string()))?;

        let mut sets = vec!["data = ?1".to_string()];
        let mut params: Vec<Value> = vec![Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 2;
            sets.push(format!("{} = ?{}", col, idx));
            params.push(val.clone());
        }

        let id_idx = params.len() + 1;
        params.push(Value::Text(id.to_string()));

        let sql = format!("UPDATE {} SET {} WHERE id = ?{}", table, sets.join(", "), id_idx);

        let affected = self
            .sql
            .exec(&sql, &params)
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("UNIQUE constraint") {
                    ShopError::Conflict(msg)
                } else {
                    ShopError::Storage(msg)
                }
            })?;

        if affected == 0 {
            return Err(ShopError::NotFound(format!("{}/{}", table, id)));
        }

        Ok(())
    }

    /// Run a query and deserialize every row's `data` column.
    pub(crate) fn query_records<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<T>, ShopError> {
        let rows = self
            .sql
            .query(sql, params)
            .map_err(|e| ShopError::Storage(e.to_string()))?;

        let mut items = Vec::new();
        for row in &rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| ShopError::Internal("missing data column".into()))?;
            let item: T =
                serde_json::from_str(data).map_err(|e| ShopError::Internal(e.to_string()))?;
            items.push(item);
        }
        Ok(items)
    }
}
