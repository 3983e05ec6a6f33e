//! Prebuilt demo agents
//!
//! A profile pairs a system prompt with the tools the agent may call. The slug
//! doubles as the HTTP path the agent is served at.

use crate::tool::{ToolKind, ToolRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentProfile {
    /// General chat with time lookup and background colour changes
    AgenticChat,
    /// Weather assistant
    WeatherChat,
    /// Generates haikus, recipes and code snippets for the UI to render
    ToolBasedGenerativeUi,
}

impl AgentProfile {
    pub const ALL: [AgentProfile; 3] = [
        AgentProfile::AgenticChat,
        AgentProfile::WeatherChat,
        AgentProfile::ToolBasedGenerativeUi,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            AgentProfile::AgenticChat => "agentic_chat",
            AgentProfile::WeatherChat => "weather_chat",
            AgentProfile::ToolBasedGenerativeUi => "tool_based_generative_ui",
        }
    }

    /// HTTP path the profile is mounted at
    pub fn path(self) -> String {
        format!("/{}", self.slug())
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim_start_matches('/');
        Self::ALL.into_iter().find(|profile| profile.slug() == slug)
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            AgentProfile::AgenticChat => {
                "You are a helpful AI assistant with access to tools. \
                 You can check the current time in different timezones and change the background color. \
                 Be friendly and helpful in your responses."
            }
            AgentProfile::WeatherChat => {
                "You are a helpful weather assistant. \
                 You can get current weather information for any location. \
                 Always be friendly and provide the weather info in a conversational way."
            }
            AgentProfile::ToolBasedGenerativeUi => {
                "You are a creative AI assistant that generates content including haikus, recipes, and code snippets. \
                 When users ask you to create content, call the matching tool: \
                 create_haiku(theme) for a haiku, create_recipe(cuisine, dietary) for a recipe, \
                 create_code_snippet(language, purpose) for a code snippet. \
                 Then present the result to the user."
            }
        }
    }

    pub fn tools(self) -> &'static [ToolKind] {
        match self {
            AgentProfile::AgenticChat => &[ToolKind::GetCurrentTime, ToolKind::SetBackgroundColor],
            AgentProfile::WeatherChat => &[ToolKind::GetWeather, ToolKind::GetCurrentTime],
            AgentProfile::ToolBasedGenerativeUi => &[
                ToolKind::CreateHaiku,
                ToolKind::CreateRecipe,
                ToolKind::CreateCodeSnippet,
            ],
        }
    }

    pub fn registry(self) -> ToolRegistry {
        ToolRegistry::from_kinds(self.tools().iter().copied())
    }
}

impl std::fmt::Display for AgentProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
