//! # Tipos de Paginación
//! src/listing/types.rs
//!
//! Parámetros de página recibidos por query string y la forma de la
//! respuesta de `/activos`:
//!
//! ```json
//! {
//!   "data": [ { "id": 51, ... }, ... ],
//!   "meta": { "totalItems": 120, "totalPages": 3, "currentPage": 2, "limit": 50 }
//! }
//! ```

use crate::store::Row;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 50;

/// Página pedida por el cliente, ya validada: `page >= 1`, `1 <= limit <= max_limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Construye una página recortando valores fuera de rango
    pub fn new(page: u64, limit: u64, max_limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, max_limit.max(1)),
        }
    }

    /// Interpreta los valores crudos de `page` y `limit`.
    ///
    /// - ausente o no numérico -> valor por defecto (1 y 50)
    /// - cero o negativo -> 1
    /// - `limit` mayor que `max_limit` -> `max_limit`
    /// - números enormes saturan en `u64::MAX` antes de recortar
    ///
    /// # Ejemplo
    /// ```
    /// use activos_api::listing::PageRequest;
    ///
    /// let req = PageRequest::from_query(Some("2"), Some("abc"), 1000);
    /// assert_eq!((req.page(), req.limit(), req.offset()), (2, 50, 50));
    /// ```
    pub fn from_query(page: Option<&str>, limit: Option<&str>, max_limit: u64) -> Self {
        let page = parse_int(page).unwrap_or(DEFAULT_PAGE);
        let limit = parse_int(limit).unwrap_or(DEFAULT_LIMIT);
        Self::new(page, limit, max_limit)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// `(page - 1) * limit`, saturando en vez de desbordar
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Entero decimal con signo opcional; espacios alrededor se ignoran.
///
/// Negativos se leen como 0 y valores que no entran en u64 saturan en
/// `u64::MAX`. Cualquier otra cosa es no numérica (`None`).
fn parse_int(raw: Option<&str>) -> Option<u64> {
    let s = raw?.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if negative {
        return Some(0);
    }
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

/// Metadatos de paginación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub limit: u64,
}

impl PageMeta {
    pub fn new(total_items: u64, request: &PageRequest) -> Self {
        Self {
            total_items,
            total_pages: total_items.div_ceil(request.limit()),
            current_page: request.page(),
            limit: request.limit(),
        }
    }
}

/// Una página de activos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub data: Vec<Row>,
    pub meta: PageMeta,
}
