//! # activos_api - Entry Point
//! src/main.rs

use activos_api::config::Config;
use activos_api::listing::ListingService;
use activos_api::server::Server;
use activos_api::static_files::StaticFiles;
use activos_api::{app, logging, store};
use std::sync::Arc;
use tracing::{error, info};

fn main() {
    // Primero la config: RUST_LOG puede venir del .env
    let config = Config::load();
    logging::init();

    if let Err(e) = config.validate() {
        error!("invalid configuration: {}", e);
        std::process::exit(1);
    }
    info!("{}", config.summary());

    let store = match store::open(&config) {
        Ok(store) => store,
        Err(e) => {
            error!("failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let service = Arc::new(ListingService::new(store, config.max_limit));
    let router = app::build_router(service, StaticFiles::new(&config.public_dir));

    let server = match Server::bind(&config.address(), router) {
        Ok(server) => server,
        Err(e) => {
            error!("failed to bind {}: {}", config.address(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        error!("server stopped: {}", e);
        std::process::exit(1);
    }
}
