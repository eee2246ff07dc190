mod config;
mod errors;
mod export;
mod mail;
mod presentation;
mod repository;
mod services;
mod state;
mod store;

use crate::config::Config;
use crate::repository::Repository;
use crate::state::AppState;
use crate::store::{MemoryStore, SnapshotStore, SqliteStore, IN_MEMORY_PATH};
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();

    let store: Box<dyn SnapshotStore> = if config.db_path.as_os_str() == IN_MEMORY_PATH {
        info!("Using in-memory store; nothing survives a restart");
        Box::new(MemoryStore::new())
    } else {
        let sqlite = SqliteStore::open(&config.db_path).map_err(|e| {
            error!("Cannot open store at {}: {}", config.db_path.display(), e);
            std::io::Error::other(e.to_string())
        })?;
        info!("Store: {}", sqlite.path().display());
        Box::new(sqlite)
    };
    let repository = Repository::open(store).map_err(|e| {
        error!("Cannot load stored collections: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let bind_address = config.bind_address();
    info!("PDF exports: {}", config.export_dir.display());
    info!("Server running at {}", config.public_url);

    let state = AppState::new(repository, config);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(state.clone()))
            .service(services::templates::configure_routes())
            .service(services::documents::configure_routes())
            .service(services::view::configure_routes())
    })
    .bind(bind_address)?
    .run()
    .await
}
