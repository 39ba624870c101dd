//! Chat session state
//!
//! Conversation transitions are a pure reducer over an immutable snapshot.
//! Appending a streamed chunk replaces the trailing turn with an extended
//! copy instead of mutating it in place, so interleaved chunks and renders
//! cannot alias.

use crate::core::types::{Role, Turn};

/// Fixed reply shown when a send fails for any reason
pub const ERROR_REPLY: &str = "Sorry, I ran into an error.";

/// Rendered in place of an empty pending reply
pub const PENDING_INDICATOR: &str = "...";

/// State transition events for one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// User submitted text; appends the user turn plus an empty placeholder
    /// reply. Whitespace-only text is a no-op.
    Submitted(String),
    /// One streamed chunk arrived for the trailing reply
    Chunk(String),
    /// The in-flight send failed; the trailing reply becomes [`ERROR_REPLY`]
    Failed,
    /// A standalone summary turn (batch reports)
    Summary(String),
}

/// Apply one event to a conversation snapshot, returning the next snapshot
pub fn reduce(turns: &[Turn], event: &SessionEvent) -> Vec<Turn> {
    let mut next = turns.to_vec();
    match event {
        SessionEvent::Submitted(text) => {
            if text.trim().is_empty() {
                return next;
            }
            next.push(Turn::user(text.clone()));
            next.push(Turn::model(""));
        }
        SessionEvent::Chunk(chunk) => {
            if let Some(last) = next.last_mut() {
                if last.role == Role::Model {
                    *last = Turn::model(format!("{}{}", last.text, chunk));
                }
            }
        }
        SessionEvent::Failed => {
            if let Some(last) = next.last_mut() {
                if last.role == Role::Model {
                    *last = Turn::model(ERROR_REPLY);
                }
            }
        }
        SessionEvent::Summary(text) => {
            next.push(Turn::model(text.clone()));
        }
    }
    next
}

/// One chat session: the conversation plus the awaiting-response flag
#[derive(Debug, Default)]
pub struct ChatSession {
    turns: Vec<Turn>,
    awaiting: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Begin a send: record the user turn and placeholder reply, and return
    /// the conversation to transmit (without the placeholder). Returns `None`
    /// for whitespace-only input, which leaves the session untouched.
    pub fn begin_send(&mut self, text: &str) -> Option<Vec<Turn>> {
        if text.trim().is_empty() {
            return None;
        }
        self.turns = reduce(&self.turns, &SessionEvent::Submitted(text.to_string()));
        self.awaiting = true;
        // Everything up to, but not including, the placeholder reply.
        Some(self.turns[..self.turns.len() - 1].to_vec())
    }

    /// Append one streamed chunk to the pending reply
    pub fn apply_chunk(&mut self, chunk: &str) {
        self.turns = reduce(&self.turns, &SessionEvent::Chunk(chunk.to_string()));
    }

    /// Mark the in-flight send as complete
    pub fn finish(&mut self) {
        self.awaiting = false;
    }

    /// Mark the in-flight send as failed; the pending reply becomes the
    /// fixed error message
    pub fn fail(&mut self) {
        self.turns = reduce(&self.turns, &SessionEvent::Failed);
        self.awaiting = false;
    }

    /// Append one batch-report turn
    pub fn push_summary(&mut self, text: &str) {
        self.turns = reduce(&self.turns, &SessionEvent::Summary(text.to_string()));
    }
}

/// Text to render for a turn; an empty reply shows the pending indicator
pub fn render_text(turn: &Turn) -> &str {
    if turn.role == Role::Model && turn.text.is_empty() {
        PENDING_INDICATOR
    } else {
        &turn.text
    }
}
