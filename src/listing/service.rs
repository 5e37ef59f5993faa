//! # Servicio de Listado
//! src/listing/service.rs
//!
//! Arma una página de activos a partir de dos consultas al store: el total
//! de filas y las filas de la página. Si cualquiera de las dos falla, el
//! request completo falla.

use super::types::{Page, PageMeta, PageRequest};
use crate::store::{AssetStore, StoreError};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Servicio de listado de activos. Se comparte entre threads con `Arc`.
pub struct ListingService {
    store: Arc<dyn AssetStore>,
    max_limit: u64,
}

impl ListingService {
    pub fn new(store: Arc<dyn AssetStore>, max_limit: u64) -> Self {
        Self {
            store,
            max_limit: max_limit.max(1),
        }
    }

    /// Interpreta `page` y `limit` con los topes de este servicio
    pub fn page_request(&self, page: Option<&str>, limit: Option<&str>) -> PageRequest {
        PageRequest::from_query(page, limit, self.max_limit)
    }

    /// Página `request.page()` de la tabla, ordenada por `id`.
    ///
    /// Una página más allá de la última retorna `data` vacío, no un error.
    pub fn list_assets(&self, request: PageRequest) -> Result<Page, StoreError> {
        let start = Instant::now();

        let total_items = self.store.count()?;
        let data = self.store.fetch_page(request.limit(), request.offset())?;

        debug!(
            backend = self.store.backend(),
            page = request.page(),
            limit = request.limit(),
            offset = request.offset(),
            total_items,
            rows = data.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "listed assets"
        );

        Ok(Page {
            data,
            meta: PageMeta::new(total_items, &request),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Row;
    use std::sync::Mutex;

    /// Store en memoria que registra las consultas recibidas
    struct FakeStore {
        ids: Vec<i64>,
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeStore {
        fn with_rows(n: i64) -> Self {
            Self { ids: (1..=n).collect(), fail: false, calls: Mutex::new(Vec::new()) }
        }

        fn failing() -> Self {
            Self { ids: Vec::new(), fail: true, calls: Mutex::new(Vec::new()) }
        }
    }

    impl AssetStore for FakeStore {
        fn count(&self) -> Result<u64, StoreError> {
            self.calls.lock().unwrap().push("count".to_string());
            if self.fail {
                return Err(StoreError::Poisoned);
            }
            Ok(self.ids.len() as u64)
        }

        fn fetch_page(&self, limit: u64, offset: u64) -> Result<Vec<Row>, StoreError> {
            self.calls.lock().unwrap().push(format!("fetch {} {}", limit, offset));
            if self.fail {
                return Err(StoreError::Poisoned);
            }
            Ok(self
                .ids
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .map(|id| {
                    let mut row = Row::new();
                    row.insert("id".to_string(), (*id).into());
                    row
                })
                .collect())
        }

        fn backend(&self) -> &'static str {
            "fake"
        }
    }

    fn ids(page: &Page) -> Vec<i64> {
        page.data.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_second_page_of_120() {
        let store = Arc::new(FakeStore::with_rows(120));
        let service = ListingService::new(store.clone(), 1000);

        let page = service.list_assets(service.page_request(Some("2"), Some("50"))).unwrap();

        assert_eq!(ids(&page), (51..=100).collect::<Vec<_>>());
        assert_eq!(page.meta, PageMeta { total_items: 120, total_pages: 3, current_page: 2, limit: 50 });
        assert_eq!(*store.calls.lock().unwrap(), vec!["count", "fetch 50 50"]);
    }

    #[test]
    fn test_empty_table_defaults() {
        let service = ListingService::new(Arc::new(FakeStore::with_rows(0)), 1000);

        let page = service.list_assets(service.page_request(None, None)).unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.meta, PageMeta { total_items: 0, total_pages: 0, current_page: 1, limit: 50 });
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let service = ListingService::new(Arc::new(FakeStore::with_rows(120)), 1000);

        let page = service.list_assets(service.page_request(Some("9"), Some("50"))).unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.current_page, 9);
    }

    #[test]
    fn test_pages_cover_table_without_gaps() {
        let service = ListingService::new(Arc::new(FakeStore::with_rows(47)), 1000);

        let mut seen = Vec::new();
        for p in 1..=5u64 {
            let page = service.list_assets(PageRequest::new(p, 10, 1000)).unwrap();
            assert!(page.data.len() <= 10);
            seen.extend(ids(&page));
        }

        assert_eq!(seen, (1..=47).collect::<Vec<_>>());
    }

    #[test]
    fn test_limit_capped_by_service() {
        let service = ListingService::new(Arc::new(FakeStore::with_rows(10)), 5);

        let page = service.list_assets(service.page_request(None, Some("100"))).unwrap();

        assert_eq!(page.data.len(), 5);
        assert_eq!(page.meta.limit, 5);
        assert_eq!(page.meta.total_pages, 2);
    }

    #[test]
    fn test_store_failure_propagates() {
        let service = ListingService::new(Arc::new(FakeStore::failing()), 1000);

        assert!(service.list_assets(PageRequest::new(1, 50, 1000)).is_err());
    }
}
