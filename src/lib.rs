//! # activos_api
//! src/lib.rs
//!
//! Servicio HTTP de solo lectura sobre la tabla de activos, con paginación.
//!
//! ## Arquitectura
//!
//! - `http`: parsing de requests y construcción de responses
//! - `router`: enrutamiento de requests a handlers
//! - `server`: servidor TCP, un thread por conexión
//! - `listing`: paginación y endpoints `/activos` y `/health`
//! - `store`: acceso a la base (PostgreSQL o SQLite)
//! - `static_files`: contenido del directorio público
//! - `config`: argumentos CLI y variables de entorno
//! - `logging`: subscriber de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use activos_api::{app, config::Config, listing::ListingService, server::Server, static_files::StaticFiles, store};
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! let store = store::open(&config).unwrap();
//! let service = Arc::new(ListingService::new(store, config.max_limit));
//! let router = app::build_router(service, StaticFiles::new(&config.public_dir));
//!
//! Server::bind(&config.address(), router).unwrap().run().unwrap();
//! ```

pub mod app;
pub mod config;
pub mod http;
pub mod listing;
pub mod logging;
pub mod router;
pub mod server;
pub mod static_files;
pub mod store;
