//! Core relay logic: conversation types, the SSE re-framer, and the
//! upstream call

pub mod relay;
pub mod streaming;
pub mod types;

pub use relay::relay_chat;
pub use streaming::{SseFrameBuffer, TextChunkStream};
pub use types::{ChatRelayRequest, Role, Turn};
