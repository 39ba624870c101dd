//! Relay transport for the chat client

use futures::StreamExt;
use reqwest::Client;

use crate::core::types::{ChatRelayRequest, Turn};
use crate::utils::error::{RelayError, Result};

/// Incremental UTF-8 decoder for the relay's chunked body
///
/// A multi-byte code point can straddle two network reads; incomplete
/// trailing bytes are carried into the next push instead of being decoded
/// lossily.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    carry: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of the accumulated bytes as is valid UTF-8
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.carry.extend_from_slice(bytes);
        match std::str::from_utf8(&self.carry) {
            Ok(text) => {
                let out = text.to_string();
                self.carry.clear();
                out
            }
            Err(e) if e.error_len().is_none() => {
                // Incomplete sequence at the end; hold it back.
                let valid = e.valid_up_to();
                let out = String::from_utf8_lossy(&self.carry[..valid]).into_owned();
                self.carry.drain(..valid);
                out
            }
            Err(_) => {
                // Genuinely invalid bytes; decode with replacement.
                let out = String::from_utf8_lossy(&self.carry).into_owned();
                self.carry.clear();
                out
            }
        }
    }
}

/// HTTP client for one relay endpoint
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
    model_name: Option<String>,
}

impl RelayClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
            model_name: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_model(mut self, model_name: Option<String>) -> Self {
        self.model_name = model_name;
        self
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn request_body(&self, messages: Vec<Turn>) -> ChatRelayRequest {
        ChatRelayRequest {
            messages,
            api_key: self.api_key.clone(),
            model_name: self.model_name.clone(),
        }
    }

    /// Send a conversation and feed each arriving text chunk to `on_chunk`
    pub async fn send(
        &self,
        messages: Vec<Turn>,
        mut on_chunk: impl FnMut(&str),
    ) -> Result<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&self.request_body(messages))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let mut stream = response.bytes_stream();
        let mut decoder = Utf8ChunkDecoder::new();
        while let Some(read) = stream.next().await {
            let bytes = read.map_err(|e| RelayError::UpstreamRead(e.to_string()))?;
            let text = decoder.push(&bytes);
            if !text.is_empty() {
                on_chunk(&text);
            }
        }
        Ok(())
    }
}
