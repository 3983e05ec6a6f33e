//! Run requests: the UI-protocol conversation posted by the frontend.
//!
//! Parsing happens in two steps so syntax and schema problems are reported
//! separately, and both become `400 Invalid request body: ...`.

use agentrelay_core::{Message, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServerError;

/// Roles the UI protocol may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestRole {
    User,
    Assistant,
    System,
    Tool,
    Developer,
}

impl RequestRole {
    /// The runtime role, or `None` for roles the runtime does not take.
    pub fn to_runtime(self) -> Option<Role> {
        match self {
            RequestRole::User => Some(Role::User),
            RequestRole::Assistant => Some(Role::Assistant),
            RequestRole::System => Some(Role::System),
            RequestRole::Tool | RequestRole::Developer => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: RequestRole,
    /// Missing or `null` content is the empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validated request body. Unknown fields (`threadId`, `state`, `tools`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub messages: Vec<RequestMessage>,
}

/// What the runtime is invoked with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    /// Content of the latest message.
    pub prompt: String,
    /// Every earlier message, oldest first.
    pub history: Vec<Message>,
}

impl RunRequest {
    /// Parse and validate a raw body.
    pub fn parse(body: &str) -> Result<Self, ServerError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
        Self::from_value(value)
    }

    /// Validate an already-parsed JSON body.
    pub fn from_value(value: Value) -> Result<Self, ServerError> {
        let request: RunRequest =
            serde_json::from_value(value).map_err(|e| ServerError::InvalidRequest(e.to_string()))?;

        if request.messages.is_empty() {
            return Err(ServerError::InvalidRequest(
                "messages must not be empty".to_string(),
            ));
        }

        Ok(request)
    }

    /// Convert to runtime messages and split off the latest one as the prompt.
    ///
    /// Messages with roles the runtime does not take are dropped. If nothing is
    /// left, the prompt is empty and there is no history.
    pub fn into_conversation(self) -> Conversation {
        let mut history: Vec<Message> = self
            .messages
            .into_iter()
            .filter_map(|message| match message.role.to_runtime() {
                Some(role) => Some(Message::new(role, message.content)),
                None => {
                    tracing::debug!(role = ?message.role, "dropping message with unsupported role");
                    None
                }
            })
            .collect();

        let prompt = history
            .pop()
            .map(|latest| latest.content)
            .unwrap_or_default();

        Conversation { prompt, history }
    }
}
