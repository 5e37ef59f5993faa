//! # Logging
//! src/logging.rs
//!
//! Logs estructurados con `tracing`. El nivel se controla con `RUST_LOG`
//! (ej: `RUST_LOG=activos_api=debug`); por defecto `info`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Instala el subscriber global. Llamarlo más de una vez no tiene efecto.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init();
        init();
        tracing::info!("logging initialized");
    }
}
