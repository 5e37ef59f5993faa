//! # Composición de la Aplicación
//! src/app.rs
//!
//! Arma el router con las rutas del servicio:
//!
//! | Método | Ruta       | Handler                         |
//! |--------|------------|---------------------------------|
//! | GET    | `/health`  | `listing::handlers::health_handler` |
//! | GET    | `/`        | `StaticFiles::serve_index`      |
//! | GET    | `/activos` | `listing::handlers::list_handler`   |
//! | GET    | otras      | `StaticFiles::serve`            |

use crate::http::Request;
use crate::listing::{handlers, ListingService};
use crate::router::Router;
use crate::static_files::StaticFiles;
use std::sync::Arc;

pub fn build_router(service: Arc<ListingService>, files: StaticFiles) -> Router {
    let mut router = Router::new();

    router.register("/health", handlers::health_handler);
    router.register("/activos", move |req: &Request| handlers::list_handler(req, &service));

    let index_files = files.clone();
    router.register("/", move |req: &Request| index_files.serve_index(req));
    router.set_fallback(move |req: &Request| files.serve(req));

    router
}
