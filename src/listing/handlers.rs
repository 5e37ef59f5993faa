//! # Handlers HTTP de Activos
//! src/listing/handlers.rs
//!
//! - /health
//! - /activos?page=N&limit=M

use super::service::ListingService;
use crate::http::{Request, Response, StatusCode};
use tracing::error;

/// Handler para /health
///
/// Siempre 200 `OK`. No toca el store, así responde aunque la base no esté.
pub fn health_handler(_req: &Request) -> Response {
    Response::text(StatusCode::Ok, "OK")
}

/// Handler para /activos?page=N&limit=M
///
/// # Query parameters
/// - `page`: número de página desde 1 (opcional, default: 1)
/// - `limit`: tamaño de página (opcional, default: 50)
///
/// # Ejemplo de response
/// ```json
/// {
///   "data": [{"id": 51, "nombre": "..."}],
///   "meta": {"totalItems": 120, "totalPages": 3, "currentPage": 2, "limit": 50}
/// }
/// ```
///
/// Si el store falla se responde 500 `Server Error`; el detalle solo va al log.
pub fn list_handler(req: &Request, service: &ListingService) -> Response {
    let page_request = service.page_request(req.query_param("page"), req.query_param("limit"));

    match service.list_assets(page_request) {
        Ok(page) => Response::json_value(&page),
        Err(e) => {
            error!(error = %e, page = page_request.page(), limit = page_request.limit(), "failed to list assets");
            Response::text(StatusCode::InternalServerError, "Server Error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SqliteStore, TableName};
    use std::sync::Arc;

    fn service(rows: i64) -> ListingService {
        let store = SqliteStore::open(":memory:", TableName::new("activos").unwrap()).unwrap();
        store
            .execute_batch(&format!(
                "CREATE TABLE activos (id INTEGER PRIMARY KEY, nombre TEXT);
                 WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < {rows})
                 INSERT INTO activos (id, nombre) SELECT n, 'activo ' || n FROM seq WHERE n <= {rows};"
            ))
            .unwrap();
        ListingService::new(Arc::new(store), 1000)
    }

    fn get(path: &str) -> Request {
        Request::parse(format!("GET {} HTTP/1.0\r\n\r\n", path).as_bytes()).unwrap()
    }

    #[test]
    fn test_health() {
        let response = health_handler(&get("/health"));
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"OK");
    }

    #[test]
    fn test_list_json_shape() {
        let response = list_handler(&get("/activos?page=2&limit=5"), &service(12));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["data"][0]["id"], 6);
        assert_eq!(body["data"][0]["nombre"], "activo 6");
        assert_eq!(
            body["meta"],
            serde_json::json!({ "totalItems": 12, "totalPages": 3, "currentPage": 2, "limit": 5 })
        );
    }

    #[test]
    fn test_list_huge_page_is_past_the_end() {
        let service = service(120);

        for raw in ["9223372036854775807", "99999999999999999999"] {
            let response = list_handler(&get(&format!("/activos?page={}", raw)), &service);
            let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();

            assert_eq!(response.status(), StatusCode::Ok);
            assert_eq!(body["data"], serde_json::json!([]), "page = {raw}");
            assert_eq!(body["meta"]["totalItems"], 120);
        }

        let response = list_handler(&get("/activos?page=99999999999999999999"), &service);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["meta"]["currentPage"], u64::MAX);
    }

    #[test]
    fn test_list_huge_limit_is_capped() {
        let response = list_handler(&get("/activos?limit=99999999999999999999"), &service(120));
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();

        assert_eq!(body["meta"]["limit"], 1000);
        assert_eq!(body["meta"]["totalPages"], 1);
        assert_eq!(body["data"].as_array().unwrap().len(), 120);
    }

    #[test]
    fn test_list_store_error_is_500() {
        // Tabla inexistente
        let store = SqliteStore::open(":memory:", TableName::new("activos").unwrap()).unwrap();
        let service = ListingService::new(Arc::new(store), 1000);

        let response = list_handler(&get("/activos"), &service);

        assert_eq!(response.status(), StatusCode::InternalServerError);
        assert_eq!(response.body(), b"Server Error");
    }
}
