//! Tool registry
//!
//! Tools are a closed set: every tool the service can run is a [`ToolKind`]
//! variant with a typed input. A [`ToolRegistry`] is the explicit `name -> tool`
//! table an agent is allowed to call, built once when the agent is configured.
//! Dispatch looks the name up in that table and deserializes the raw JSON
//! arguments into the tool's input type before running it.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::{code, color, haiku, recipe, time, weather};

/// Result types that tools can return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolResult {
    /// Plain text response
    Text(String),

    /// Structured JSON data
    Json(Value),
}

impl ToolResult {
    /// Create a JSON result from any serializable type
    pub fn json<T: Serialize>(value: T) -> Result<Self, ToolError> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Create a text result from a string
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Render the result as the string handed back to the model
    pub fn as_text(&self) -> String {
        match self {
            ToolResult::Text(s) => s.clone(),
            ToolResult::Json(v) => v.to_string(),
        }
    }

    /// Get a reference to the text content if this is a Text variant
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ToolResult::Text(s) => Some(s),
            ToolResult::Json(_) => None,
        }
    }
}

impl From<String> for ToolResult {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ToolResult {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Errors that can occur during tool dispatch
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),

    #[error("invalid input for {tool}: {message}")]
    InvalidInput { tool: String, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Tool description advertised to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool's arguments
    pub input_schema: Value,
}

/// Every tool the service knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolKind {
    GetCurrentTime,
    SetBackgroundColor,
    GetWeather,
    CreateHaiku,
    CreateRecipe,
    CreateCodeSnippet,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::GetCurrentTime,
        ToolKind::SetBackgroundColor,
        ToolKind::GetWeather,
        ToolKind::CreateHaiku,
        ToolKind::CreateRecipe,
        ToolKind::CreateCodeSnippet,
    ];

    /// Wire name of the tool
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::GetCurrentTime => "get_current_time",
            ToolKind::SetBackgroundColor => "set_background_color",
            ToolKind::GetWeather => "get_weather",
            ToolKind::CreateHaiku => "create_haiku",
            ToolKind::CreateRecipe => "create_recipe",
            ToolKind::CreateCodeSnippet => "create_code_snippet",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::GetCurrentTime => {
                "Get the current time, in UTC or at a fixed UTC offset such as '+05:30'."
            }
            ToolKind::SetBackgroundColor => {
                "Set the background color of the application. Accepts a color name or a hex code."
            }
            ToolKind::GetWeather => "Get the current weather for a location.",
            ToolKind::CreateHaiku => "Generate a haiku, optionally on a theme.",
            ToolKind::CreateRecipe => {
                "Generate a cooking recipe for a cuisine and optional dietary preference."
            }
            ToolKind::CreateCodeSnippet => {
                "Generate a short code snippet in a language for a stated purpose."
            }
        }
    }

    /// Look a tool up by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// JSON schema of the tool's input type
    pub fn input_schema(self) -> Value {
        match self {
            ToolKind::GetCurrentTime => schema_of::<time::CurrentTimeInput>(),
            ToolKind::SetBackgroundColor => schema_of::<color::BackgroundColorInput>(),
            ToolKind::GetWeather => schema_of::<weather::WeatherInput>(),
            ToolKind::CreateHaiku => schema_of::<haiku::HaikuInput>(),
            ToolKind::CreateRecipe => schema_of::<recipe::RecipeInput>(),
            ToolKind::CreateCodeSnippet => schema_of::<code::CodeSnippetInput>(),
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }

    /// Run the tool with raw JSON arguments
    pub fn execute(self, arguments: Value) -> Result<ToolResult, ToolError> {
        match self {
            ToolKind::GetCurrentTime => Ok(time::get_current_time(self.parse(arguments)?)),
            ToolKind::SetBackgroundColor => {
                Ok(color::set_background_color(self.parse(arguments)?))
            }
            ToolKind::GetWeather => weather::get_weather(self.parse(arguments)?),
            ToolKind::CreateHaiku => haiku::create_haiku(self.parse(arguments)?),
            ToolKind::CreateRecipe => recipe::create_recipe(self.parse(arguments)?),
            ToolKind::CreateCodeSnippet => code::create_code_snippet(self.parse(arguments)?),
        }
    }

    fn parse<T: DeserializeOwned>(self, arguments: Value) -> Result<T, ToolError> {
        // Models send `null` or nothing for tools without required arguments
        let arguments = if arguments.is_null() {
            Value::Object(Default::default())
        } else {
            arguments
        };
        serde_json::from_value(arguments).map_err(|e| ToolError::InvalidInput {
            tool: self.name().to_string(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn schema_of<T: JsonSchema>() -> Value {
    schemars::schema_for!(T).to_value()
}

/// The tools an agent may call, keyed by wire name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, ToolKind>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing every known tool
    pub fn all() -> Self {
        Self::from_kinds(ToolKind::ALL)
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = ToolKind>) -> Self {
        kinds.into_iter().fold(Self::new(), Self::with_tool)
    }

    /// Add a tool to the registry
    pub fn with_tool(mut self, kind: ToolKind) -> Self {
        self.tools.insert(kind.name(), kind);
        self
    }

    pub fn get(&self, name: &str) -> Option<ToolKind> {
        self.tools.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    /// Definitions to advertise to the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|kind| kind.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run a registered tool by name
    ///
    /// Tools that exist but are not registered here are reported as not found.
    pub fn dispatch(&self, name: &str, arguments: Value) -> Result<ToolResult, ToolError> {
        let kind = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tracing::debug!(tool = name, "dispatching tool call");
        kind.execute(arguments)
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
