use actix_files::Files;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;

mod api;
mod config;
mod db;
mod error;
mod services;
mod store;

use crate::config::StoreBackend;
use crate::services::feed::FeedRegistry;
use crate::services::parent_gate::ParentGate;
use crate::store::{MemoryStore, PgStore, Store};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    env_logger::init();

    let config = config::AppConfig::new().context("Failed to load configuration")?;

    let store: Arc<dyn Store> = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = db::create_pool(&config.database.url, config.database.max_connections)
                .context("Failed to create database pool")?;
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };
    let store = web::Data::from(store);
    let feeds = web::Data::new(FeedRegistry::new(config.feed));
    let gate = web::Data::new(ParentGate::new(config.parent.pin.clone()));

    log::info!(
        "Starting server on {}:{}",
        config.server.host,
        config.server.port
    );

    let static_path = config.site.static_path.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(feeds.clone())
            .app_data(gate.clone())
            .wrap(actix_cors::Cors::permissive()) // Configure properly in production
            .configure(api::configure)
            // Landing page; registered last so it never shadows the API.
            .service(Files::new("/", &static_path).index_file("index.html"))
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
