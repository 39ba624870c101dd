//! Streaming re-framer
//!
//! Consumes the upstream SSE stream and re-emits the text deltas it carries
//! as a plain byte stream, one outbound chunk per upstream frame. An SSE
//! event may straddle two physical reads, so a carry-over buffer holds the
//! final, possibly-incomplete line between reads.

use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use reqwest::Response;
use serde::Deserialize;
use tracing::warn;

use crate::utils::error::RelayError;

/// Prefix of an SSE data line carrying a JSON frame
const DATA_PREFIX: &[u8] = b"data: ";

/// Upper bound on the carry-over buffer. An unterminated line past this
/// bound is discarded up to the next line feed; upstream never emits frames
/// anywhere near this size.
pub const MAX_PENDING_LINE_BYTES: usize = 1 << 20;

#[derive(Debug, Deserialize)]
struct StreamFrame {
    #[serde(default)]
    candidates: Vec<FrameCandidate>,
}

#[derive(Debug, Deserialize)]
struct FrameCandidate {
    content: Option<FrameContent>,
}

#[derive(Debug, Deserialize)]
struct FrameContent {
    #[serde(default)]
    parts: Vec<FramePart>,
}

#[derive(Debug, Deserialize)]
struct FramePart {
    text: Option<String>,
}

/// Incremental SSE frame splitter
///
/// Feed it raw upstream bytes in whatever fragments they arrive; it returns
/// the text deltas completed by each fragment, in arrival order. Bytes after
/// the last line feed are retained for the next push, so fragmentation never
/// changes the emitted sequence.
#[derive(Debug, Default)]
pub struct SseFrameBuffer {
    pending: Vec<u8>,
    /// Set while skipping the remainder of an oversized line
    discarding: bool,
}

impl SseFrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one physical read and return the deltas it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut deltas = Vec::new();
        while let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            if self.discarding {
                self.discarding = false;
                continue;
            }
            let line = &line[..line.len() - 1];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if let Some(delta) = extract_delta(line) {
                deltas.push(delta);
            }
        }

        if self.pending.len() > MAX_PENDING_LINE_BYTES {
            warn!(
                buffered = self.pending.len(),
                "discarding oversized unterminated SSE line"
            );
            self.pending.clear();
            self.discarding = true;
        }

        deltas
    }

    /// Bytes currently held over for the next read
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Extract the text delta from one complete SSE line, if it carries one
///
/// Lines without the `data: ` prefix, lines whose payload fails to parse
/// (keep-alive noise, partially-delivered JSON) and frames without a
/// non-empty `candidates[0].content.parts[0].text` all yield nothing; none
/// of these are error conditions.
fn extract_delta(line: &[u8]) -> Option<String> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    let frame: StreamFrame = serde_json::from_slice(payload).ok()?;
    let text = frame
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text?;
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

pin_project! {
    /// Outbound text-chunk stream derived from an upstream SSE response
    ///
    /// Owns the upstream connection: dropping the stream (client disconnect)
    /// drops the pending upstream read and closes the connection.
    pub struct TextChunkStream {
        #[pin]
        inner: Pin<Box<dyn Stream<Item = Result<Bytes, RelayError>> + Send>>,
    }
}

impl TextChunkStream {
    /// Re-frame the body of a successful upstream response
    pub fn from_response(response: Response) -> Self {
        let stream = async_stream::stream! {
            let mut upstream = response.bytes_stream();
            let mut frames = SseFrameBuffer::new();

            while let Some(read) = upstream.next().await {
                match read {
                    Ok(bytes) => {
                        for delta in frames.push(&bytes) {
                            yield Ok(Bytes::from(delta));
                        }
                    }
                    Err(e) => {
                        yield Err(RelayError::UpstreamRead(e.to_string()));
                        break;
                    }
                }
            }
            // Any unterminated partial line cannot hold a complete frame;
            // end-of-stream drops it without a flush.
        };

        Self {
            inner: Box::pin(stream),
        }
    }

    #[cfg(test)]
    pub fn from_fragments(fragments: Vec<Vec<u8>>) -> Self {
        let stream = async_stream::stream! {
            let mut frames = SseFrameBuffer::new();
            for fragment in fragments {
                for delta in frames.push(&fragment) {
                    yield Ok(Bytes::from(delta));
                }
            }
        };

        Self {
            inner: Box::pin(stream),
        }
    }
}

impl Stream for TextChunkStream {
    type Item = Result<Bytes, RelayError>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }
}
