//! Backend SQLite (`rusqlite`, SQLite embebido).

use super::{to_sql_int, AssetStore, Row, StoreError, TableName};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use serde_json::Value as JsonValue;
use std::sync::Mutex;

pub struct SqliteStore {
    conn: Mutex<Connection>,
    count_sql: String,
    page_sql: String,
}

impl SqliteStore {
    /// Abre (o crea) la base en `path`. `:memory:` abre una base en memoria.
    pub fn open(path: &str, table: TableName) -> Result<Self, StoreError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        Ok(Self::from_connection(conn, table))
    }

    /// Envuelve una conexión ya abierta (útil para sembrar datos en tests)
    pub fn from_connection(conn: Connection, table: TableName) -> Self {
        Self {
            conn: Mutex::new(conn),
            count_sql: format!("SELECT COUNT(*) FROM {}", table),
            page_sql: format!("SELECT * FROM {} ORDER BY id LIMIT ?1 OFFSET ?2", table),
        }
    }

    /// Ejecuta SQL arbitrario sobre la conexión (esquema y datos de prueba)
    pub fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute_batch(sql)?;
        Ok(())
    }
}

impl AssetStore for SqliteStore {
    fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let total: i64 = conn.query_row(&self.count_sql, [], |row| row.get(0))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    fn fetch_page(&self, limit: u64, offset: u64) -> Result<Vec<Row>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = conn.prepare(&self.page_sql)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params![to_sql_int(limit), to_sql_int(offset)])?;

        let mut page = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (idx, name) in columns.iter().enumerate() {
                record.insert(name.clone(), value_to_json(row.get_ref(idx)?));
            }
            page.push(record);
        }

        Ok(page)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

fn value_to_json(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::Number(i.into()),
        ValueRef::Real(f) => {
            JsonValue::Number(serde_json::Number::from_f64(f).unwrap_or_else(|| serde_json::Number::from(0)))
        }
        ValueRef::Text(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
        // Mismo formato que `row_to_json` para bytea: "\\x0102..."
        ValueRef::Blob(bytes) => JsonValue::String(format!("\\x{}", hex::encode(bytes))),
    }
}
