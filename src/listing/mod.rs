//! # Listado de Activos
//! src/listing/mod.rs
//!
//! Paginación sobre la tabla de activos:
//! - `types`: `PageRequest`, `Page`, `PageMeta`
//! - `service`: `ListingService`, las dos consultas al store
//! - `handlers`: endpoints `/health` y `/activos`

pub mod handlers;
pub mod service;
pub mod types;

pub use service::ListingService;
pub use types::{Page, PageMeta, PageRequest, DEFAULT_LIMIT, DEFAULT_PAGE};
