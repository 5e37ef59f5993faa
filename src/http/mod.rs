//! # Módulo HTTP
//!
//! Implementación mínima del protocolo HTTP/1.0 sin librerías de alto nivel:
//!
//! - Parsing de requests (request line, query string, headers)
//! - Construcción de responses
//! - Códigos de estado
//!
//! Cada conexión atiende un solo request y se cierra (`Connection: close`).

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
