//! Backend PostgreSQL.
//!
//! Cada fila se serializa en la base con `row_to_json`, así las columnas
//! llegan como JSON sin que el servicio conozca el esquema.

use super::{to_sql_int, AssetStore, Row, StoreError, TableName};
use ::postgres::{Client, NoTls};
use std::sync::Mutex;
use tracing::{debug, warn};

pub struct PostgresStore {
    config: ::postgres::Config,
    client: Mutex<Option<Client>>,
    count_sql: String,
    page_sql: String,
}

impl PostgresStore {
    /// No abre la conexión: eso ocurre en la primera consulta.
    pub fn new(config: ::postgres::Config, table: TableName) -> Self {
        Self {
            config,
            client: Mutex::new(None),
            count_sql: format!("SELECT COUNT(*) FROM {}", table),
            page_sql: format!(
                "SELECT row_to_json(t) FROM \
                 (SELECT * FROM {} ORDER BY id LIMIT $1 OFFSET $2) AS t \
                 ORDER BY t.id",
                table
            ),
        }
    }

    /// Ejecuta `f` con un cliente conectado.
    ///
    /// Si la conexión quedó cerrada después de un error se descarta, y el
    /// próximo request vuelve a conectar.
    fn with_client<T>(
        &self,
        f: impl FnOnce(&mut Client) -> Result<T, ::postgres::Error>,
    ) -> Result<T, StoreError> {
        let mut guard = self.client.lock().map_err(|_| StoreError::Poisoned)?;

        let client = match guard.take() {
            Some(client) if !client.is_closed() => guard.insert(client),
            _ => {
                debug!("opening postgres connection");
                guard.insert(self.config.connect(NoTls)?)
            }
        };

        let result = f(client);

        if result.is_err() && guard.as_ref().map_or(false, Client::is_closed) {
            warn!("postgres connection closed, will reconnect on next request");
            *guard = None;
        }

        result.map_err(StoreError::from)
    }
}

impl AssetStore for PostgresStore {
    fn count(&self) -> Result<u64, StoreError> {
        let total: i64 = self.with_client(|client| {
            client.query_one(self.count_sql.as_str(), &[]).and_then(|row| row.try_get(0))
        })?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    fn fetch_page(&self, limit: u64, offset: u64) -> Result<Vec<Row>, StoreError> {
        let limit = to_sql_int(limit);
        let offset = to_sql_int(offset);

        let values = self.with_client(|client| {
            client
                .query(self.page_sql.as_str(), &[&limit, &offset])?
                .iter()
                .map(|row| row.try_get::<_, serde_json::Value>(0))
                .collect::<Result<Vec<_>, _>>()
        })?;

        values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::Object(map) => Ok(map),
                other => Err(StoreError::RowShape(other.to_string())),
            })
            .collect()
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(table: &str) -> PostgresStore {
        let config = "host=127.0.0.1 port=1 user=nobody dbname=none connect_timeout=1"
            .parse::<::postgres::Config>()
            .unwrap();
        PostgresStore::new(config, TableName::new(table).unwrap())
    }

    #[test]
    fn test_queries_use_table_and_bound_params() {
        let store = store("activos");

        assert_eq!(store.count_sql, "SELECT COUNT(*) FROM activos");
        assert!(store.page_sql.contains("FROM activos ORDER BY id LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn test_unreachable_database_is_an_error() {
        let store = store("activos");

        assert!(matches!(store.count(), Err(StoreError::Postgres(_))));
        // El store sigue usable para el siguiente intento
        assert!(matches!(store.fetch_page(10, 0), Err(StoreError::Postgres(_))));
    }

    /// Requiere una base real: `DATABASE_URL=postgres://... cargo test -- --ignored`
    #[test]
    #[ignore]
    fn test_live_database_roundtrip() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let mut client = Client::connect(&url, NoTls).unwrap();
        client
            .batch_execute(
                "DROP TABLE IF EXISTS activos_test;
                 CREATE TABLE activos_test (id SERIAL PRIMARY KEY, nombre TEXT NOT NULL);
                 INSERT INTO activos_test (nombre) SELECT 'activo ' || g FROM generate_series(1, 7) g;",
            )
            .unwrap();

        let store = PostgresStore::new(url.parse().unwrap(), TableName::new("activos_test").unwrap());
        assert_eq!(store.count().unwrap(), 7);

        let rows = store.fetch_page(3, 3).unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert_eq!(rows[0]["nombre"], "activo 4");

        client.batch_execute("DROP TABLE activos_test;").unwrap();
    }
}
