//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea paths HTTP a handlers.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! - Path registrado + GET/HEAD → handler
//! - Path registrado + otro método → 405
//! - Path no registrado → fallback (archivos estáticos) o 404
//!
//! `HEAD` ejecuta el handler de `GET` y descarta el body.

use crate::http::{Method, Request, Response, StatusCode};

/// Un handler recibe un Request y retorna una Response.
///
/// Puede capturar estado compartido (ej: `Arc<ListingService>`).
pub type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// Router que mapea paths a handlers
pub struct Router {
    routes: Vec<(String, Handler)>,
    fallback: Option<Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            fallback: None,
        }
    }

    /// Registra una ruta con su handler
    ///
    /// # Ejemplo
    /// ```
    /// use activos_api::router::Router;
    /// use activos_api::http::{Request, Response, StatusCode};
    ///
    /// let mut router = Router::new();
    /// router.register("/hello", |_req: &Request| Response::text(StatusCode::Ok, "hello"));
    ///
    /// let request = Request::parse(b"GET /hello HTTP/1.0\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).status(), StatusCode::Ok);
    /// ```
    pub fn register<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.routes.push((path.to_string(), Box::new(handler)));
    }

    /// Handler para paths sin ruta registrada
    pub fn set_fallback<F>(&mut self, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(handler));
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &Request) -> Response {
        let path = request.path();
        let handler = self
            .routes
            .iter()
            .find(|(route_path, _)| route_path == path)
            .map(|(_, handler)| handler);

        let mut response = match (request.method(), handler) {
            (Method::GET | Method::HEAD, Some(handler)) => handler(request),
            (_, Some(_)) => Response::error(
                StatusCode::MethodNotAllowed,
                &format!("Method {} not allowed on {}", request.method().as_str(), path),
            )
            .with_header("Allow", "GET, HEAD"),
            (Method::GET | Method::HEAD, None) => match &self.fallback {
                Some(fallback) => fallback(request),
                None => Self::not_found(path),
            },
            (_, None) => Self::not_found(path),
        };

        if request.method() == Method::HEAD {
            response.strip_body();
        }

        self.add_common_headers(&mut response);
        response
    }

    fn not_found(path: &str) -> Response {
        Response::error(StatusCode::NotFound, &format!("Route not found: {}", path))
    }

    /// Headers comunes a todas las respuestas
    fn add_common_headers(&self, response: &mut Response) {
        response.add_header("Server", concat!("activos_api/", env!("CARGO_PKG_VERSION")));
        response.add_header("Connection", "close");
        response.add_header("Access-Control-Allow-Origin", "*");
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
