#![deny(missing_docs)]
//! Shipyard server executable.
//!
//! Hosts the HTTP ship registry: filtered listing, counting and CRUD.

mod config;
mod db;
mod models;
mod openapi;
mod routes;
mod schema;
mod store;

#[cfg(not(test))]
use std::sync::Arc;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use shipyard_core::{InMemoryShipRepository, ShipRepository};

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::db::init_pool;
#[cfg(not(test))]
use crate::routes::{AppState, configure};
#[cfg(not(test))]
use crate::store::PgShipRepository;

#[cfg(not(test))]
fn select_repository(config: &ServerConfig) -> std::io::Result<Arc<dyn ShipRepository>> {
    match &config.database_url {
        Some(url) => {
            let pool = init_pool(url).map_err(std::io::Error::other)?;
            log::info!("using PostgreSQL ship store");
            Ok(Arc::new(PgShipRepository::new(pool)))
        }
        None => {
            log::warn!("DATABASE_URL not set; ships are kept in memory and lost on exit");
            Ok(Arc::new(InMemoryShipRepository::new()))
        }
    }
}

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    // Pool creation and migrations block, so they run before the runtime starts.
    let repository = select_repository(&config)?;
    let state = web::Data::new(AppState::new(repository));

    let ServerConfig {
        host,
        port,
        allowed_origins,
        ..
    } = config;
    log::info!("listening on {host}:{port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
