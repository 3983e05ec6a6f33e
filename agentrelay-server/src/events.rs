//! SSE event types streamed to the frontend.
//!
//! Every frame is `data: <json>\n\n` where the JSON is a `{type, data}` record.
//! `agent_response` carries one of three payloads (started, chunk, completed);
//! `error` carries a message.

use agentrelay_core::{RunOutput, Usage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single streamed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SseEvent {
    AgentResponse(AgentResponse),
    Error(ErrorData),
}

/// Payloads of `agent_response` events.
///
/// Variant order matters for deserialization: the most specific shape first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentResponse {
    Completed(CompletedData),
    Chunk(ChunkData),
    Started(StartedData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Started,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartedData {
    pub status: RunStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkData {
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedData {
    pub content: String,
    pub status: RunStatus,
    /// Always present; `null` when the runtime reported no cost.
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl From<Usage> for TokenUsage {
    fn from(usage: Usage) -> Self {
        Self {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub message: String,
}

impl SseEvent {
    pub fn started() -> Self {
        SseEvent::AgentResponse(AgentResponse::Started(StartedData {
            status: RunStatus::Started,
        }))
    }

    /// A content chunk stamped with the current time.
    pub fn chunk(content: impl Into<String>) -> Self {
        Self::chunk_at(content, Utc::now())
    }

    pub fn chunk_at(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        SseEvent::AgentResponse(AgentResponse::Chunk(ChunkData {
            content: content.into(),
            timestamp,
        }))
    }

    pub fn completed(output: &RunOutput) -> Self {
        SseEvent::AgentResponse(AgentResponse::Completed(CompletedData {
            content: output.content.clone(),
            status: RunStatus::Completed,
            cost: output.cost(),
            usage: output.usage.map(TokenUsage::from),
        }))
    }

    pub fn error(message: impl Into<String>) -> Self {
        SseEvent::Error(ErrorData {
            message: message.into(),
        })
    }

    /// Wire name of the event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            SseEvent::AgentResponse(_) => "agent_response",
            SseEvent::Error(_) => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SseEvent::Error(_))
    }

    /// Render as one SSE frame.
    pub fn to_frame(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({
                "type": "error",
                "data": {"message": format!("Failed to serialize event: {}", e)}
            })
            .to_string()
        });
        format!("data: {}\n\n", json)
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
