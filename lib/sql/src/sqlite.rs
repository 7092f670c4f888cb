use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use rusqlite::types::ValueRef;

use crate::error::SqlError;
use crate::traits::{Row, SqlStore, Statement, Value};

/// SqliteStore is a SqlStore implementation backed by rusqlite (bundled SQLite).
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SqlError> {
        let conn = Connection::open(path).map_err(|e| SqlError::Connection(e.to_string()))?;

        // WAL for better concurrent read performance; foreign keys stay off,
        // cascades are expressed as explicit transactions (exec_batch).
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| SqlError::Connection(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SqlError> {
        let conn =
            Connection::open_in_memory().map_err(|e| SqlError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Convert our Value enum to rusqlite's ToSql.
fn bind_params(params: &[Value]) -> Vec<Box<dyn rusqlite::types::ToSql + '_>> {
    params
        .iter()
        .map(|v| -> Box<dyn rusqlite::types::ToSql + '_> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Real(f) => Box::new(*f),
                Value::Text(s) => Box::new(s.as_str()),
                Value::Blob(b) => Box::new(b.as_slice()),
            }
        })
        .collect()
}

/// Map a rusqlite column value to our Value enum by its declared type.
fn column_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

fn run_exec(conn: &Connection, sql: &str, params: &[Value]) -> Result<u64, SqlError> {
    let bound = bind_params(params);
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = bound.iter().map(|b| b.as_ref()).collect();

    let affected = conn
        .execute(sql, param_refs.as_slice())
        .map_err(|e| SqlError::Execution(e.to_string()))?;

    Ok(affected as u64)
}

impl SqlStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SqlError> {
        let conn = self.conn.lock().map_err(|e| SqlError::Query(e.to_string()))?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        let mut stmt = conn.prepare(sql).map_err(|e| SqlError::Query(e.to_string()))?;

        let column_names: Vec<String> =
            stmt.column_names().iter().map(|s| s.to_string()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let mut columns = Vec::with_capacity(column_names.len());
                for (i, name) in column_names.iter().enumerate() {
                    let val = column_value(row.get_ref(i)?);
                    columns.push((name.clone(), val));
                }
                Ok(Row { columns })
            })
            .map_err(|e| SqlError::Query(e.to_string()))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(|e| SqlError::Query(e.to_string()))?);
        }
        Ok(result)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SqlError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SqlError::Execution(e.to_string()))?;

        run_exec(&conn, sql, params)
    }

    fn exec_batch(&self, stmts: &[Statement]) -> Result<u64, SqlError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| SqlError::Transaction(e.to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| SqlError::Transaction(e.to_string()))?;

        let mut affected = 0u64;
        for stmt in stmts {
            // Any failure drops `tx`, which rolls the whole batch back.
            affected += run_exec(&tx, &stmt.sql, &stmt.params)?;
        }

        tx.commit().map_err(|e| SqlError::Transaction(e.to_string()))?;

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_table() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .exec(
                "CREATE TABLE t (id TEXT PRIMARY KEY, n INTEGER, label TEXT)",
                &[],
            )
            .unwrap();
        store
    }

    #[test]
    fn test_exec_and_query() {
        let store = store_with_table();
        let affected = store
            .exec(
                "INSERT INTO t (id, n, label) VALUES (?1, ?2, ?3)",
                &[
                    Value::Text("a".into()),
                    Value::Integer(7),
                    Value::Text("seven".into()),
                ],
            )
            .unwrap();
        assert_eq!(affected, 1);

        let rows = store
            .query("SELECT n, label FROM t WHERE id = ?1", &[Value::Text("a".into())])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_i64("n"), Some(7));
        assert_eq!(rows[0].get_str("label"), Some("seven"));
    }

    #[test]
    fn test_query_null_column() {
        let store = store_with_table();
        store
            .exec(
                "INSERT INTO t (id, n) VALUES (?1, ?2)",
                &[Value::Text("a".into()), Value::Null],
            )
            .unwrap();

        let rows = store.query("SELECT n FROM t", &[]).unwrap();
        assert_eq!(rows[0].get("n"), Some(&Value::Null));
        assert_eq!(rows[0].get_i64("n"), None);
    }

    #[test]
    fn test_exec_batch_commits_together() {
        let store = store_with_table();
        let affected = store
            .exec_batch(&[
                Statement::new(
                    "INSERT INTO t (id, n) VALUES (?1, ?2)",
                    vec![Value::Text("a".into()), Value::Integer(1)],
                ),
                Statement::new(
                    "INSERT INTO t (id, n) VALUES (?1, ?2)",
                    vec![Value::Text("b".into()), Value::Integer(2)],
                ),
            ])
            .unwrap();
        assert_eq!(affected, 2);

        let rows = store.query("SELECT id FROM t", &[]).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_open_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.sqlite");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .exec("CREATE TABLE t (id TEXT PRIMARY KEY, n INTEGER)", &[])
                .unwrap();
            store
                .exec(
                    "INSERT INTO t (id, n) VALUES (?1, ?2)",
                    &[Value::Text("a".into()), Value::Integer(1)],
                )
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let rows = store.query("SELECT n FROM t WHERE id = 'a'", &[]).unwrap();
        assert_eq!(rows[0].get_i64("n"), Some(1));
    }

    #[test]
    fn test_exec_batch_rolls_back_on_failure() {
        let store = store_with_table();
        let result = store.exec_batch(&[
            Statement::new(
                "INSERT INTO t (id, n) VALUES (?1, ?2)",
                vec![Value::Text("a".into()), Value::Integer(1)],
            ),
            // Duplicate primary key — the whole batch must roll back.
            Statement::new(
                "INSERT INTO t (id, n) VALUES (?1, ?2)",
                vec![Value::Text("a".into()), Value::Integer(2)],
            ),
        ]);
        assert!(result.is_err());

        let rows = store.query("SELECT id FROM t", &[]).unwrap();
        assert!(rows.is_empty());
    }
}
