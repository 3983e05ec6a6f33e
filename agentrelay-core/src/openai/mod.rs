//! OpenAI-compatible streaming runtime
//!
//! [`OpenAiRuntime`] drives a Chat Completions endpoint with `stream: true`. Text
//! deltas are forwarded as [`RunEvent::Chunk`]s as they arrive. When the model asks
//! for tools, the calls are dispatched through the runtime's [`ToolRegistry`], the
//! results are appended to the conversation and the model is called again, up to
//! [`OpenAiConfig::max_tool_rounds`] times.
//!
//! Failed tool calls are reported back to the model as tool output; only transport,
//! protocol and backend errors end the run.

mod wire;

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource, RequestBuilderExt};
use serde_json::Value;

use crate::config::OpenAiConfig;
use crate::error::AgentError;
use crate::profile::AgentProfile;
use crate::runtime::{AgentRuntime, RunEvent, RunOutput, RunStream, Usage};
use crate::tool::{ToolError, ToolRegistry};
use crate::types::Message;

use wire::{
    ChatChunk, ChatMessage, ChatRequest, ErrorBody, StreamOptions, ToolCall, ToolCallBuilder,
    ToolSpec,
};

/// Agent runtime backed by an OpenAI-compatible Chat Completions API
#[derive(Clone)]
pub struct OpenAiRuntime {
    client: reqwest::Client,
    config: Arc<OpenAiConfig>,
    name: String,
    system_prompt: Option<String>,
    tools: ToolRegistry,
}

impl std::fmt::Debug for OpenAiRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiRuntime")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("tools", &self.tools.names())
            .finish()
    }
}

impl OpenAiRuntime {
    /// Create a runtime with no system prompt and no tools
    pub fn new(config: OpenAiConfig) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            name: format!("openai:{}", config.model),
            config: Arc::new(config),
            system_prompt: None,
            tools: ToolRegistry::new(),
        })
    }

    /// Create a runtime for one of the prebuilt agents
    pub fn for_profile(config: OpenAiConfig, profile: AgentProfile) -> Result<Self, AgentError> {
        Ok(Self::new(config)?
            .with_name(profile.slug())
            .with_system_prompt(profile.system_prompt())
            .with_tools(profile.registry()))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    fn initial_messages(&self, prompt: &str, history: &[Message]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if let Some(system_prompt) = &self.system_prompt {
            messages.push(ChatMessage::text("system", system_prompt.clone()));
        }
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::text("user", prompt));
        messages
    }

    fn open_turn(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<EventSource, AgentError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            tools,
            stream: true,
            stream_options: StreamOptions {
                include_usage: true,
            },
        };

        self.client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .eventsource()
            .map_err(|e| AgentError::Configuration(format!("failed to create event source: {}", e)))
    }

    /// Run one tool call, rendering the outcome as the text handed back to the model
    fn call_tool(&self, call: &ToolCall) -> String {
        let name = call.function.name.as_str();
        let arguments = if call.function.arguments.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str(&call.function.arguments).map_err(|e| ToolError::InvalidInput {
                tool: name.to_string(),
                message: e.to_string(),
            })
        };

        match arguments.and_then(|arguments| self.tools.dispatch(name, arguments)) {
            Ok(result) => result.as_text(),
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "tool call failed");
                format!("Error: {}", err)
            }
        }
    }

    fn finish_usage(&self, usage: Option<Usage>) -> Option<Usage> {
        usage.map(|usage| match self.config.cost(usage.input_tokens, usage.output_tokens) {
            Some(cost) => usage.with_cost(cost),
            None => usage,
        })
    }
}

#[async_trait::async_trait]
impl AgentRuntime for OpenAiRuntime {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run_stream(
        &self,
        prompt: &str,
        history: Vec<Message>,
    ) -> Result<RunStream, AgentError> {
        let mut messages = self.initial_messages(prompt, &history);
        let tools: Vec<ToolSpec> = self
            .tools
            .definitions()
            .into_iter()
            .map(ToolSpec::from)
            .collect();
        let runtime = self.clone();

        tracing::debug!(
            runtime = %self.name,
            model = %self.config.model,
            history = history.len(),
            "starting run"
        );

        let stream = async_stream::stream! {
            let mut content = String::new();
            let mut usage: Option<Usage> = None;
            let mut rounds = 0;

            loop {
                let source = match runtime.open_turn(&messages, &tools) {
                    Ok(source) => source,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                let mut chunks = completion_chunks(source);
                let mut calls: BTreeMap<usize, ToolCallBuilder> = BTreeMap::new();
                let mut turn_text = String::new();

                while let Some(chunk) = chunks.next().await {
                    let chunk = match chunk {
                        Ok(chunk) => chunk,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    };

                    if let Some(reported) = chunk.usage {
                        usage
                            .get_or_insert_with(Usage::default)
                            .accumulate(&Usage::new(reported.prompt_tokens, reported.completion_tokens));
                    }

                    for choice in chunk.choices {
                        if let Some(text) = choice.delta.content.filter(|t| !t.is_empty()) {
                            turn_text.push_str(&text);
                            yield Ok(RunEvent::Chunk(text));
                        }
                        for delta in choice.delta.tool_calls {
                            calls.entry(delta.index).or_default().apply(delta);
                        }
                    }
                }

                content.push_str(&turn_text);

                if calls.is_empty() {
                    break;
                }

                if rounds >= runtime.config.max_tool_rounds {
                    yield Err(AgentError::Model(format!(
                        "exceeded {} tool rounds",
                        runtime.config.max_tool_rounds
                    )));
                    return;
                }
                rounds += 1;

                let tool_calls: Vec<ToolCall> =
                    calls.into_values().map(ToolCallBuilder::build).collect();
                let outputs: Vec<ChatMessage> = tool_calls
                    .iter()
                    .map(|call| ChatMessage::tool_output(call.id.clone(), runtime.call_tool(call)))
                    .collect();

                tracing::debug!(round = rounds, calls = tool_calls.len(), "tool round complete");

                messages.push(ChatMessage::assistant_tool_calls(turn_text, tool_calls));
                messages.extend(outputs);
            }

            yield Ok(RunEvent::Completed(RunOutput {
                content,
                usage: runtime.finish_usage(usage),
            }));
        };

        Ok(Box::pin(stream))
    }
}

/// Turn an event source into parsed completion chunks
///
/// Ends at `data: [DONE]` or when the server closes the stream. The source is
/// closed on exit so it never reconnects.
fn completion_chunks(mut source: EventSource) -> BoxStream<'static, Result<ChatChunk, AgentError>> {
    Box::pin(async_stream::stream! {
        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(message)) => {
                    let data = message.data.trim();
                    if data == "[DONE]" {
                        break;
                    }
                    if data.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ChatChunk>(data) {
                        Ok(chunk) => yield Ok(chunk),
                        Err(e) => {
                            yield Err(AgentError::Stream(format!(
                                "failed to parse completion chunk: {} (data: {})",
                                e, data
                            )));
                            break;
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(err) => {
                    yield Err(classify_stream_error(err).await);
                    break;
                }
            }
        }
        source.close();
    })
}

async fn classify_stream_error(err: reqwest_eventsource::Error) -> AgentError {
    match err {
        reqwest_eventsource::Error::InvalidStatusCode(status, response) => {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => parsed.error.message,
                Err(_) if body.trim().is_empty() => status.to_string(),
                Err(_) => body,
            };
            AgentError::from_status(status.as_u16(), message)
        }
        reqwest_eventsource::Error::InvalidContentType(content_type, _) => AgentError::Stream(
            format!("unexpected content type: {:?}", content_type),
        ),
        reqwest_eventsource::Error::Transport(e) => e.into(),
        other => AgentError::Stream(other.to_string()),
    }
}

#[cfg(test)]
mod tests;
