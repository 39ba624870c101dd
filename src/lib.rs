//! # chat-relay
//!
//! Streaming chat relay gateway for the Google generative-language API.
//!
//! The relay accepts a conversation over `POST /api/chat`, opens an upstream
//! SSE connection to `models/{model}:streamGenerateContent`, and re-emits
//! every text delta it extracts as a plain `text/plain` byte stream. The
//! companion terminal client renders the stream progressively and hosts a
//! batch load generator.
//!
//! ```rust,no_run
//! use chat_relay::config::RelayConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RelayConfig::from_env()?;
//!     chat_relay::server::run_server(config).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod core;
pub mod server;
pub mod utils;

pub use crate::config::RelayConfig;
pub use crate::core::{ChatRelayRequest, Role, Turn};
pub use crate::utils::error::{RelayError, Result};
