//! # agentrelay-core
//!
//! Agent runtimes and demo tools behind the agentrelay HTTP adapter.
//!
//! An [`AgentRuntime`] turns a prompt plus prior conversation into an ordered
//! stream of [`RunEvent`]s: text chunks followed by one completion carrying the
//! full content and optional usage/cost.
//!
//! ## Quick Start
//!
//! ```no_run
//! use agentrelay_core::{collect_run, AgentProfile, AgentRuntime, OpenAiConfig, OpenAiRuntime};
//!
//! # async fn example() -> agentrelay_core::Result<()> {
//! let runtime = OpenAiRuntime::for_profile(OpenAiConfig::from_env(), AgentProfile::WeatherChat)?;
//!
//! let stream = runtime.run_stream("What's the weather in Tokyo?", vec![]).await?;
//! let output = collect_run(stream).await?;
//! println!("{}", output.content);
//! # Ok(())
//! # }
//! ```
//!
//! ## Tools
//!
//! Tools are a closed set of [`ToolKind`]s. Each agent gets a [`ToolRegistry`]
//! naming the tools it may call:
//!
//! ```
//! use agentrelay_core::{ToolKind, ToolRegistry};
//! use serde_json::json;
//!
//! let registry = ToolRegistry::from_kinds([ToolKind::GetWeather]);
//! let result = registry.dispatch("get_weather", json!({"location": "London"})).unwrap();
//! assert!(result.as_text().contains("London, UK"));
//! ```

pub mod config;
pub mod error;
pub mod openai;
pub mod profile;
pub mod runtime;
pub mod tool;
pub mod tools;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::OpenAiConfig;
pub use error::{AgentError, Result};
pub use openai::OpenAiRuntime;
pub use profile::AgentProfile;
pub use runtime::{collect_run, AgentRuntime, RunEvent, RunOutput, RunStream, Usage};
pub use tool::{ToolDefinition, ToolError, ToolKind, ToolRegistry, ToolResult};
pub use types::{Message, Role};
