//! HTTP routes

pub mod chat;
pub mod health;

use actix_web::web;

/// Register all routes on the service config
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/api/chat", web::post().to(chat::relay_chat_endpoint));
}
