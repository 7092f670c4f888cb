pub mod schema;
pub mod token;
pub mod user;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use bistro_sql::{SqlStore, Value};

use crate::service::token::SessionCodec;

/// Auth service error type.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<AuthError> for bistro_core::ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotFound(m) => bistro_core::ServiceError::NotFound(m),
            AuthError::Conflict(m) => bistro_core::ServiceError::Conflict(m),
            AuthError::Validation(m) => bistro_core::ServiceError::Validation(m),
            AuthError::Unauthorized(m) => bistro_core::ServiceError::Unauthorized(m),
            AuthError::Forbidden(m) => bistro_core::ServiceError::PermissionDenied(m),
            AuthError::Storage(m) => bistro_core::ServiceError::Storage(m),
            AuthError::Internal(m) => bistro_core::ServiceError::Internal(m),
        }
    }
}

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session token signing secret.
    pub session_secret: String,
    /// Session token lifetime in seconds (default: 10 minutes).
    pub session_ttl_secs: i64,
    /// Shared secret for verifying third-party provider tokens, if any.
    pub provider_secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: "bistro-dev-secret-change-me".to_string(),
            session_ttl_secs: 600,
            provider_secret: None,
        }
    }
}

/// The Auth service. Holds the injected store handle and the session codec.
pub struct AuthService {
    pub(crate) sql: Arc<dyn SqlStore>,
    codec: Arc<SessionCodec>,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SqlStore>, config: AuthConfig) -> Result<Arc<Self>, AuthError> {
        schema::init_schema(sql.as_ref())?;
        let codec = Arc::new(SessionCodec::new(&config.session_secret));
        Ok(Arc::new(Self { sql, codec, config }))
    }

    /// The session codec used for issue/verify.
    pub fn codec(&self) -> &Arc<SessionCodec> {
        &self.codec
    }

    /// Configured session TTL in seconds.
    pub fn session_ttl_secs(&self) -> i64 {
        self.config.session_ttl_secs
    }

    /// Configured provider shared secret, if any.
    pub fn provider_secret(&self) -> Option<&str> {
        self.config.provider_secret.as_deref()
    }

    // ── Generic record helpers (JSON data column + indexed columns) ──

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), AuthError> {
        let json = serde_json::to_string(record).map_err(|e| AuthError::Internal(e.to_string()))?;

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
                AuthError::Conflict(msg)
            } else {
                AuthError::Storage(msg)
            }
        })?;

        Ok(())
    }

    /// Get a record by id, deserializing the JSON `data` column.
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<T, AuthError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
        let rows = self
            .sql
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| AuthError::NotFound(format!("{}/{}", table, id)))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| AuthError::Internal("missing data column".into()))?;
        serde_json::from_str(data).map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// List records ordered by creation time, newest first.
    pub(crate) fn list_records<T: DeserializeOwned>(
        &self,
        table: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<T>, usize), AuthError> {
        let count_rows = self
            .sql
            .query(&format!("SELECT COUNT(*) as cnt FROM {}", table), &[])
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let total = count_rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0) as usize;

        let sql = format!(
            "SELECT data FROM {} ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
            table,
        );
        let rows = self
            .sql
            .query(
                &sql,
                &[Value::Integer(limit as i64), Value::Integer(offset as i64)],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let mut items = Vec::new();
        for row in &rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| AuthError::Internal("missing data column".into()))?;
            let item: T =
                serde_json::from_str(data).map_err(|e| AuthError::Internal(e.to_string()))?;
            items.push(item);
        }

        Ok((items, total))
    }
}
