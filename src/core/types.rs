//! Conversation and wire types shared by the relay server and the client

use serde::{Deserialize, Serialize};

/// Speaker role for one conversation turn
///
/// Serialized lowercase; passed through to the upstream API unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Request body accepted by `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRelayRequest {
    pub messages: Vec<Turn>,
    #[serde(rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(rename = "modelName", skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// Request body sent to `models/{model}:streamGenerateContent`
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

impl GenerateContentRequest {
    /// Translate a conversation into the upstream request shape, one
    /// single-part content entry per turn, dialogue order preserved.
    pub fn from_turns(turns: &[Turn]) -> Self {
        Self {
            contents: turns
                .iter()
                .map(|turn| Content {
                    role: turn.role,
                    parts: vec![Part {
                        text: turn.text.clone(),
                    }],
                })
                .collect(),
        }
    }
}
