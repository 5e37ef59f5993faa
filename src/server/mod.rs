//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones (un thread por conexión)
//! 3. Lee y parsea el request
//! 4. Lo enruta y escribe la respuesta

pub mod tcp;

pub use tcp::Server;
