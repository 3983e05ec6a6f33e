//! Test utilities for agentrelay-core.
//!
//! This module provides a scripted [`AgentRuntime`] for testing request handling
//! without a model backend.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! agentrelay-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use agentrelay_core::{collect_run, test_utils::MockRuntime, AgentRuntime};
//!
//! # async fn example() -> agentrelay_core::Result<()> {
//! let runtime = MockRuntime::new().with_chunks(["Hello ", "there"]);
//!
//! let output = collect_run(runtime.run_stream("Hi", vec![]).await?).await?;
//! assert_eq!(output.content, "Hello there");
//! assert_eq!(runtime.call_count(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::AgentError;
use crate::runtime::{AgentRuntime, RunEvent, RunOutput, RunStream, Usage};
use crate::types::Message;

/// How a scripted run ends
#[derive(Debug, Clone, PartialEq)]
enum Ending {
    Complete,
    Fail(String),
    Truncate,
}

/// One recorded invocation of [`MockRuntime::run_stream`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub history: Vec<Message>,
}

/// A scripted agent runtime.
///
/// Every run replays the same script: the configured chunks in order, then a
/// completion whose content is the chunks joined together. The ending can be
/// swapped for an error or for a stream that just stops.
///
/// # Example
///
/// ```rust
/// use agentrelay_core::test_utils::MockRuntime;
///
/// // Two chunks, then completion with a cost
/// let runtime = MockRuntime::new()
///     .with_chunks(["Hel", "lo"])
///     .with_cost(0.002);
///
/// // One chunk, then a failure
/// let runtime = MockRuntime::new()
///     .with_text("partial")
///     .failing_with("backend went away");
/// ```
#[derive(Clone)]
pub struct MockRuntime {
    chunks: Vec<String>,
    usage: Option<Usage>,
    ending: Ending,
    start_error: Option<String>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockRuntime {
    /// Create a runtime that completes immediately with empty content.
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            usage: None,
            ending: Ending::Complete,
            start_error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Emit a single chunk.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_chunks([text.into()])
    }

    /// Emit the given chunks in order.
    pub fn with_chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chunks.extend(chunks.into_iter().map(Into::into));
        self
    }

    /// Attach usage to the completion.
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Attach a cost to the completion.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.usage = Some(self.usage.unwrap_or_default().with_cost(cost));
        self
    }

    /// End the stream with an error after the chunks instead of completing.
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.ending = Ending::Fail(message.into());
        self
    }

    /// End the stream after the chunks without a completion event.
    pub fn without_completion(mut self) -> Self {
        self.ending = Ending::Truncate;
        self
    }

    /// Fail `run_stream` itself, before any event is produced.
    pub fn failing_to_start(mut self, message: impl Into<String>) -> Self {
        self.start_error = Some(message.into());
        self
    }

    /// Number of times `run_stream` was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Every recorded call, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AgentRuntime for MockRuntime {
    fn name(&self) -> &str {
        "MockRuntime"
    }

    async fn run_stream(
        &self,
        prompt: &str,
        history: Vec<Message>,
    ) -> Result<RunStream, AgentError> {
        self.calls.lock().push(RecordedCall {
            prompt: prompt.to_string(),
            history,
        });

        if let Some(message) = &self.start_error {
            return Err(AgentError::Other(message.clone()));
        }

        let mut events: Vec<Result<RunEvent, AgentError>> = self
            .chunks
            .iter()
            .cloned()
            .map(|chunk| Ok(RunEvent::Chunk(chunk)))
            .collect();

        match &self.ending {
            Ending::Complete => events.push(Ok(RunEvent::Completed(RunOutput {
                content: self.chunks.concat(),
                usage: self.usage,
            }))),
            Ending::Fail(message) => events.push(Err(AgentError::Other(message.clone()))),
            Ending::Truncate => {}
        }

        Ok(Box::pin(futures::stream::iter(events)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::collect_run;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_replays_chunks_and_records_calls() {
        let runtime = MockRuntime::new().with_chunks(["a", "b"]).with_cost(0.5);

        let stream = runtime
            .run_stream("latest", vec![Message::user("earlier")])
            .await
            .unwrap();
        let output = collect_run(stream).await.unwrap();

        assert_eq!(output.content, "ab");
        assert_eq!(output.cost(), Some(0.5));
        assert_eq!(runtime.call_count(), 1);

        let call = runtime.last_call().unwrap();
        assert_eq!(call.prompt, "latest");
        assert_eq!(call.history, vec![Message::user("earlier")]);
    }

    #[tokio::test]
    async fn test_failing_with_ends_in_error() {
        let runtime = MockRuntime::new().with_text("x").failing_with("boom");
        let events: Vec<_> = runtime.run_stream("", vec![]).await.unwrap().collect().await;

        assert_eq!(events.len(), 2);
        assert!(events[0].is_ok());
        assert_eq!(events[1].as_ref().unwrap_err().to_string(), "boom");
    }

    #[tokio::test]
    async fn test_failing_to_start() {
        let runtime = MockRuntime::new().failing_to_start("no backend");
        assert!(runtime.run_stream("", vec![]).await.is_err());
        assert_eq!(runtime.call_count(), 1);
    }
}
