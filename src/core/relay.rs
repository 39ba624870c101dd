//! Upstream relay call
//!
//! One invocation per inbound request: resolve credential and model, open the
//! upstream SSE connection, hand the body to the re-framer. No shared mutable
//! state across invocations.

use reqwest::Client;
use tracing::{error, info};

use crate::config::RelayConfig;
use crate::core::streaming::TextChunkStream;
use crate::core::types::{ChatRelayRequest, GenerateContentRequest};
use crate::utils::error::{RelayError, Result};

/// Open the upstream streaming call and return the re-framed chunk stream
///
/// Fails before any network I/O when no credential is resolvable. A
/// non-success upstream status terminates the relay with the upstream status
/// and body; streaming begins only on success.
pub async fn relay_chat(
    client: &Client,
    config: &RelayConfig,
    request: ChatRelayRequest,
) -> Result<TextChunkStream> {
    let api_key = request
        .api_key
        .filter(|key| !key.is_empty())
        .or_else(|| config.default_api_key.clone())
        .ok_or(RelayError::MissingApiKey)?;

    let model = request
        .model_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| config.default_model.clone());

    let url = format!(
        "{}/models/{}:streamGenerateContent",
        config.base_url, model
    );
    let body = GenerateContentRequest::from_turns(&request.messages);

    info!(
        model = %model,
        turns = request.messages.len(),
        "opening upstream stream"
    );

    let response = client
        .post(&url)
        .query(&[("alt", "sse"), ("key", api_key.as_str())])
        .json(&body)
        .timeout(config.upstream_timeout)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), "upstream rejected request: {body}");
        return Err(RelayError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    // A success response that declares no body has nothing to stream; keep
    // this distinct from an upstream rejection.
    if response.content_length() == Some(0) {
        return Err(RelayError::EmptyUpstreamBody);
    }

    Ok(TextChunkStream::from_response(response))
}
