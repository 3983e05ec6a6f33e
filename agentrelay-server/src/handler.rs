//! The request adapter.
//!
//! [`AgentHandler::handle`] turns one serverless invocation into one complete
//! response:
//!
//! 1. Anything but POST is rejected with 405 before the runtime is touched.
//! 2. The body is decoded and validated as a [`RunRequest`]; failures are 400.
//! 3. The runtime is invoked with the latest message as the prompt and the
//!    earlier ones as history.
//! 4. Its output is buffered as SSE frames: `started`, one frame per chunk, then
//!    a `completed` frame. A failure at any point of the run becomes a single
//!    trailing `error` frame and the response is still 200.

use std::sync::Arc;

use agentrelay_core::{AgentRuntime, RunEvent};
use futures::StreamExt;
use serde_json::Value;
use tracing::Instrument;

use crate::config::HandlerConfig;
use crate::envelope::{HttpResponse, InvocationEvent};
use crate::error::{ServerError, ServerResult};
use crate::events::SseEvent;
use crate::request::{Conversation, RunRequest};
use crate::sse::SseBuffer;

/// Adapter between serverless invocations and an [`AgentRuntime`].
#[derive(Clone)]
pub struct AgentHandler {
    runtime: Arc<dyn AgentRuntime>,
    config: HandlerConfig,
}

impl std::fmt::Debug for AgentHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentHandler")
            .field("runtime", &self.runtime.name())
            .field("config", &self.config)
            .finish()
    }
}

impl AgentHandler {
    pub fn new(runtime: impl AgentRuntime + 'static) -> Self {
        Self::from_arc(Arc::new(runtime))
    }

    /// Use this when the runtime is shared with other parts of the application.
    pub fn from_arc(runtime: Arc<dyn AgentRuntime>) -> Self {
        Self {
            runtime,
            config: HandlerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: HandlerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn runtime(&self) -> &Arc<dyn AgentRuntime> {
        &self.runtime
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Handle a raw host event.
    ///
    /// An event that cannot be read as an [`InvocationEvent`] is a 500.
    pub async fn handle_value(&self, event: Value) -> HttpResponse {
        match serde_json::from_value::<InvocationEvent>(event) {
            Ok(event) => self.handle(event).await,
            Err(e) => {
                tracing::error!(error = %e, "unreadable invocation event");
                ServerError::Internal(e.to_string()).into_http_response()
            }
        }
    }

    /// Handle one invocation.
    pub async fn handle(&self, event: InvocationEvent) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "invocation",
            %request_id,
            runtime = %self.runtime.name(),
            method = %event.method()
        );

        async move {
            match self.respond(event).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::info!(status = err.status_code(), error = %err, "request rejected");
                    err.into_http_response()
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn respond(&self, event: InvocationEvent) -> ServerResult<HttpResponse> {
        if !event.is_post() {
            return Err(ServerError::MethodNotAllowed);
        }

        let body = event.decoded_body()?;
        let conversation = RunRequest::parse(&body)?.into_conversation();

        tracing::info!(history = conversation.history.len(), "running agent");
        let body = self.run(conversation).await;

        Ok(HttpResponse::event_stream(body))
    }

    /// Run the agent and buffer its output as SSE frames.
    async fn run(&self, conversation: Conversation) -> String {
        let mut buffer = SseBuffer::new(self.config.max_body_bytes);

        if let Err(overflow) = buffer.push(&SseEvent::started()) {
            buffer.push_overflow_error(overflow);
            return buffer.into_body();
        }

        let mut stream = match self
            .runtime
            .run_stream(&conversation.prompt, conversation.history)
            .await
        {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(error = %err, "agent failed to start");
                buffer.push_error(err.to_string());
                return buffer.into_body();
            }
        };

        while let Some(event) = stream.next().await {
            let frame = match event {
                Ok(RunEvent::Chunk(content)) => SseEvent::chunk(content),
                Ok(RunEvent::Completed(output)) => {
                    tracing::info!(
                        chars = output.content.len(),
                        cost = ?output.cost(),
                        "agent run completed"
                    );
                    let completed = SseEvent::completed(&output);
                    if let Err(overflow) = buffer.push(&completed) {
                        tracing::warn!(
                            limit = overflow.limit,
                            frames = buffer.frame_count(),
                            "response truncated"
                        );
                        buffer.push_overflow_error(overflow);
                    }
                    return buffer.into_body();
                }
                Err(err) => {
                    tracing::warn!(error = %err, "agent run failed");
                    buffer.push_error(err.to_string());
                    return buffer.into_body();
                }
            };

            if let Err(overflow) = buffer.push(&frame) {
                tracing::warn!(
                    limit = overflow.limit,
                    frames = buffer.frame_count(),
                    "response truncated"
                );
                buffer.push_overflow_error(overflow);
                return buffer.into_body();
            }
        }

        tracing::warn!("agent stream ended without a final result");
        buffer.push_error("agent stream ended without a final result");
        buffer.into_body()
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
