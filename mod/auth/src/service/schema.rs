use bistro_sql::SqlStore;

use crate::service::AuthError;

/// Initialize the SQLite schema for auth resources.
pub fn init_schema(sql: &dyn SqlStore) -> Result<(), AuthError> {
    let statements = [
        // Users table: credential-based identities.
        // The password hash lives in its own column, outside the JSON
        // data blob, so serialized users never carry it.
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            data TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| AuthError::Storage(e.to_string()))?;
    }

    Ok(())
}
