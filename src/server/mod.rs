//! HTTP server

pub mod routes;
pub mod state;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::config::RelayConfig;
use crate::utils::error::Result;
use state::AppState;

/// Run the relay server until shutdown
pub async fn run_server(config: RelayConfig) -> Result<()> {
    config.validate()?;
    let bind_addr = config.bind_addr();
    let has_default_key = config.default_api_key.is_some();
    let state = web::Data::new(AppState::new(config));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", "chat-relay")))
            .configure(routes::configure)
    })
    .bind(&bind_addr)?;

    info!("Chat relay started on {bind_addr}");
    info!("  GET  /health   - Health check");
    info!("  POST /api/chat - Streaming chat relay");
    if !has_default_key {
        info!("No default API key configured; requests must carry their own");
    }

    server.run().await?;
    Ok(())
}
