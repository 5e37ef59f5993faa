//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración desde argumentos CLI y variables de entorno. Antes de
//! parsear se carga un archivo `.env` del directorio actual si existe; las
//! variables ya definidas en el entorno tienen prioridad.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./activos_api --port 3001 --database-url postgres://app@db/inventario
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! PORT=3001 PGHOST=db PGDATABASE=inventario PGUSER=app ./activos_api
//! DATABASE_URL=sqlite:./activos.db ./activos_api
//! ```

use crate::store::TableName;
use clap::Parser;

/// Configuración del servicio de activos
#[derive(Debug, Clone, Parser)]
#[command(name = "activos_api")]
#[command(about = "Servicio HTTP de solo lectura con paginación sobre la tabla de activos")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "3001", env = "PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    // === Base de datos ===

    /// Cadena de conexión. `sqlite:<ruta>` usa SQLite; cualquier otra cosa
    /// se interpreta como conexión PostgreSQL (URL o `key=value`)
    #[arg(long = "database-url", env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Host de PostgreSQL (si no hay DATABASE_URL)
    #[arg(long = "db-host", default_value = "localhost", env = "PGHOST")]
    pub db_host: String,

    /// Puerto de PostgreSQL
    #[arg(long = "db-port", default_value = "5432", env = "PGPORT")]
    pub db_port: u16,

    /// Nombre de la base de datos
    #[arg(long = "db-name", default_value = "postgres", env = "PGDATABASE")]
    pub db_name: String,

    /// Usuario de la base de datos
    #[arg(long = "db-user", default_value = "postgres", env = "PGUSER")]
    pub db_user: String,

    /// Contraseña de la base de datos
    #[arg(long = "db-password", env = "PGPASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Tabla que se expone en /activos
    #[arg(long, default_value = "activos", env = "ASSETS_TABLE")]
    pub table: String,

    // === HTTP ===

    /// Directorio de archivos estáticos (index.html, etc.)
    #[arg(long = "public-dir", default_value = "public", env = "PUBLIC_DIR")]
    pub public_dir: String,

    /// Tamaño máximo de página; valores mayores de `limit` se recortan
    #[arg(long = "max-limit", default_value = "1000", env = "MAX_PAGE_LIMIT")]
    pub max_limit: u64,
}

/// Cómo llegar al store, derivado de la configuración
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreDescriptor {
    /// Ruta de archivo SQLite o `:memory:`
    Sqlite(String),

    /// Cadena de conexión PostgreSQL tal cual
    PostgresUrl(String),

    /// Parámetros discretos de PostgreSQL
    PostgresParams {
        host: String,
        port: u16,
        dbname: String,
        user: String,
        password: Option<String>,
    },
}

impl Config {
    /// Carga `.env` (si existe) y parsea argumentos CLI + entorno
    pub fn load() -> Self {
        // Un .env ausente no es un error
        let _ = dotenv::dotenv();
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use activos_api::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:3001");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Traduce la configuración de base de datos a un descriptor
    ///
    /// `DATABASE_URL` tiene prioridad sobre los parámetros discretos.
    pub fn store_descriptor(&self) -> StoreDescriptor {
        match self.database_url.as_deref().map(str::trim) {
            Some(url) if url.starts_with("sqlite:") => {
                let path = url.trim_start_matches("sqlite:").trim_start_matches("//");
                if path.is_empty() {
                    StoreDescriptor::Sqlite(":memory:".to_string())
                } else {
                    StoreDescriptor::Sqlite(path.to_string())
                }
            }
            Some(url) if !url.is_empty() => StoreDescriptor::PostgresUrl(url.to_string()),
            _ => StoreDescriptor::PostgresParams {
                host: self.db_host.clone(),
                port: self.db_port,
                dbname: self.db_name.clone(),
                user: self.db_user.clone(),
                password: self.db_password.clone(),
            },
        }
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be >= 1".to_string());
        }
        if self.max_limit == 0 {
            return Err("Max page limit must be >= 1".to_string());
        }
        if let Err(e) = TableName::new(&self.table) {
            return Err(e.to_string());
        }
        Ok(())
    }

    /// Resumen de la configuración para el log de arranque (sin credenciales)
    pub fn summary(&self) -> String {
        let store = match self.store_descriptor() {
            StoreDescriptor::Sqlite(path) => format!("sqlite {}", path),
            StoreDescriptor::PostgresUrl(_) => "postgres (DATABASE_URL)".to_string(),
            StoreDescriptor::PostgresParams { host, port, dbname, user, .. } => {
                format!("postgres {}@{}:{}/{}", user, host, port, dbname)
            }
        };
        format!(
            "address={} store=[{}] table={} public_dir={} max_limit={}",
            self.address(),
            store,
            self.table,
            self.public_dir,
            self.max_limit
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            host: "0.0.0.0".to_string(),
            database_url: None,
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_name: "postgres".to_string(),
            db_user: "postgres".to_string(),
            db_password: None,
            table: "activos".to_string(),
            public_dir: "public".to_string(),
            max_limit: 1000,
        }
    }
}
