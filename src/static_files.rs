//! # Archivos Estáticos
//! src/static_files.rs
//!
//! Sirve el contenido del directorio público:
//! - `GET /` -> `index.html` si existe, si no el texto `Server is running`
//! - cualquier otra ruta no registrada -> archivo bajo el directorio público
//!
//! Rutas con `..`, `\` o NUL se rechazan con 403 antes de tocar el disco.

use crate::http::{Request, Response, StatusCode};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Handler para `/`
    pub fn serve_index(&self, _req: &Request) -> Response {
        match self.read(&self.root.join(INDEX_FILE)) {
            Some(response) => response,
            None => Response::text(StatusCode::Ok, "Server is running"),
        }
    }

    /// Handler para rutas que no coinciden con ningún endpoint
    pub fn serve(&self, req: &Request) -> Response {
        let Some(relative) = sanitize(req.path()) else {
            debug!(path = req.path(), "rejected static path");
            return Response::error(StatusCode::Forbidden, "Forbidden path");
        };

        let mut full = self.root.join(relative);
        if full.is_dir() {
            full.push(INDEX_FILE);
        }

        self.read(&full).unwrap_or_else(|| {
            Response::error(StatusCode::NotFound, &format!("Route not found: {}", req.path()))
        })
    }

    /// `None` si el archivo no existe; otros errores de I/O son 500
    fn read(&self, path: &Path) -> Option<Response> {
        match std::fs::read(path) {
            Ok(bytes) => Some(
                Response::new(StatusCode::Ok)
                    .with_header("Content-Type", content_type(path))
                    .with_body_bytes(bytes),
            ),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to read static file");
                Some(Response::text(StatusCode::InternalServerError, "Server Error"))
            }
        }
    }
}

/// Convierte el path del request en una ruta relativa segura.
///
/// `None` si intenta salir del directorio público.
fn sanitize(request_path: &str) -> Option<PathBuf> {
    if request_path.contains('\\') || request_path.contains('\0') {
        return None;
    }

    let mut relative = PathBuf::new();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s => relative.push(s),
        }
    }
    Some(relative)
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
