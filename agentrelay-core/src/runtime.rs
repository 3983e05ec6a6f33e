//! The agent runtime abstraction
//!
//! An [`AgentRuntime`] takes the latest user turn plus the prior conversation and
//! produces a stream of [`RunEvent`]s: zero or more text chunks followed by exactly
//! one [`RunEvent::Completed`] carrying the aggregate result.

use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::types::Message;

/// Token usage and cost for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    /// Total cost in USD, when pricing is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
}

impl Usage {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_cost: None,
        }
    }

    /// Attach a cost figure
    pub fn with_cost(mut self, total_cost: f64) -> Self {
        self.total_cost = Some(total_cost);
        self
    }

    /// Sum token counts with another usage record (costs are not summed)
    pub fn accumulate(&mut self, other: &Usage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Aggregate result of a completed run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    /// The complete response text
    pub content: String,
    /// Token usage, if the backend reported it
    pub usage: Option<Usage>,
}

impl RunOutput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Cost of the run, if known
    pub fn cost(&self) -> Option<f64> {
        self.usage.and_then(|u| u.total_cost)
    }
}

/// Events produced while an agent runs
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// Incremental text output
    Chunk(String),
    /// The run finished; always the last event of a successful stream
    Completed(RunOutput),
}

/// Stream of run events
pub type RunStream = BoxStream<'static, Result<RunEvent, AgentError>>;

/// Trait for agent runtimes
///
/// The runtime owns model calls and tool dispatch. Callers only see the ordered
/// output of a run.
#[async_trait::async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Name of the runtime for display and logging
    fn name(&self) -> &str;

    /// Start a run
    ///
    /// # Arguments
    /// * `prompt` - Content of the latest message (the new turn)
    /// * `history` - Earlier messages, oldest first
    async fn run_stream(&self, prompt: &str, history: Vec<Message>)
        -> Result<RunStream, AgentError>;
}

#[async_trait::async_trait]
impl AgentRuntime for std::sync::Arc<dyn AgentRuntime> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn run_stream(
        &self,
        prompt: &str,
        history: Vec<Message>,
    ) -> Result<RunStream, AgentError> {
        (**self).run_stream(prompt, history).await
    }
}

/// Drain a run stream, returning its final result
///
/// Chunks are ignored; the [`RunEvent::Completed`] payload is returned. A stream
/// that ends without one is a [`AgentError::Stream`] error.
pub async fn collect_run(mut stream: RunStream) -> Result<RunOutput, AgentError> {
    while let Some(event) = stream.next().await {
        if let RunEvent::Completed(output) = event? {
            return Ok(output);
        }
    }
    Err(AgentError::Stream(
        "agent stream ended without a final result".to_string(),
    ))
}
