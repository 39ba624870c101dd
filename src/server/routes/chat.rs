//! Chat relay endpoint

use std::sync::atomic::Ordering;

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{web, HttpResponse, ResponseError, Result as ActixResult};
use tracing::{error, info};

use crate::core::relay::relay_chat;
use crate::core::types::ChatRelayRequest;
use crate::server::state::AppState;

/// `POST /api/chat`
///
/// Relays the conversation to the upstream generative API and streams the
/// extracted text deltas back as a plain text body. Errors never escape this
/// handler; they are converted to plain-text responses per the relay's
/// error mapping.
pub async fn relay_chat_endpoint(
    state: web::Data<AppState>,
    request: web::Json<ChatRelayRequest>,
) -> ActixResult<HttpResponse> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let request = request.into_inner();
    info!("Chat relay request: {} turns", request.messages.len());

    match relay_chat(&state.http_client, &state.config, request).await {
        Ok(stream) => Ok(HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .streaming(stream)),
        Err(e) => {
            error!("Chat relay failed: {e}");
            Ok(e.error_response())
        }
    }
}
