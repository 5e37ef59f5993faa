//! # Store Relacional
//! src/store/mod.rs
//!
//! Acceso de solo lectura a la tabla de activos. El servicio solo necesita
//! dos consultas:
//!
//! ```text
//! SELECT COUNT(*) FROM <tabla>
//! SELECT * FROM <tabla> ORDER BY id LIMIT $1 OFFSET $2
//! ```
//!
//! `limit` y `offset` siempre viajan como parámetros. El nombre de la tabla
//! no puede ser un parámetro, así que se valida una sola vez en [`TableName::new`].
//!
//! Backends:
//! - `postgres`: cliente síncrono, reconecta solo cuando la conexión se cae
//! - `sqlite`: `rusqlite` con SQLite embebido (desarrollo local y tests)

pub mod postgres;
pub mod sqlite;

pub use self::postgres::PostgresStore;
pub use self::sqlite::SqliteStore;

use crate::config::{Config, StoreDescriptor};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::info;

/// Una fila de la tabla, columna -> valor. El servicio no la interpreta.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid table name: {0:?}")]
    InvalidTable(String),

    #[error("postgres error: {0}")]
    Postgres(#[from] ::postgres::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store connection lock poisoned")]
    Poisoned,

    #[error("unexpected row shape: {0}")]
    RowShape(String),
}

/// Operaciones que el servicio de listado necesita del store.
///
/// Las implementaciones se comparten entre threads (`Arc<dyn AssetStore>`).
pub trait AssetStore: Send + Sync {
    /// Total de filas de la tabla
    fn count(&self) -> Result<u64, StoreError>;

    /// Filas ordenadas por `id` ascendente, salteando `offset`, a lo sumo `limit`
    fn fetch_page(&self, limit: u64, offset: u64) -> Result<Vec<Row>, StoreError>;

    /// Nombre corto del backend, para logs
    fn backend(&self) -> &'static str;
}

/// Identificador SQL validado: `^[A-Za-z_][A-Za-z0-9_]*$`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn new(name: &str) -> Result<Self, StoreError> {
        static IDENT: OnceLock<Regex> = OnceLock::new();
        let ident = IDENT.get_or_init(|| {
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid")
        });

        if ident.is_match(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(StoreError::InvalidTable(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// LIMIT/OFFSET se bindean como BIGINT; valores fuera de rango saturan.
pub(crate) fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Abre el store que corresponde al descriptor de conexión de `config`.
///
/// PostgreSQL conecta de forma perezosa en la primera consulta, así un
/// servidor sin base de datos igual arranca y responde `/health`.
pub fn open(config: &Config) -> Result<Arc<dyn AssetStore>, StoreError> {
    let table = TableName::new(&config.table)?;

    let store: Arc<dyn AssetStore> = match config.store_descriptor() {
        StoreDescriptor::Sqlite(path) => {
            info!(path = %path, table = %table, "using sqlite store");
            Arc::new(SqliteStore::open(&path, table)?)
        }
        StoreDescriptor::PostgresUrl(url) => {
            info!(table = %table, "using postgres store from connection string");
            let pg_config = url.parse::<::postgres::Config>()?;
            Arc::new(PostgresStore::new(pg_config, table))
        }
        StoreDescriptor::PostgresParams { host, port, dbname, user, password } => {
            info!(host = %host, port, dbname = %dbname, user = %user, table = %table, "using postgres store");
            let mut pg_config = ::postgres::Config::new();
            pg_config.host(&host).port(port).dbname(&dbname).user(&user);
            if let Some(password) = password {
                pg_config.password(password);
            }
            Arc::new(PostgresStore::new(pg_config, table))
        }
    };

    Ok(store)
}
