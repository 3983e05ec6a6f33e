//! Server and handler configuration.

use std::net::SocketAddr;

use agentrelay_core::AgentProfile;
use clap::Parser;

/// Default cap on a buffered response body (6 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// Per-handler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Upper bound on the buffered SSE body.
    pub max_body_bytes: usize,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl HandlerConfig {
    pub fn max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Command-line arguments of the `agentrelay` binary.
///
/// Model settings (`OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL`) are read
/// separately by [`agentrelay_core::OpenAiConfig::from_env`].
#[derive(Debug, Clone, Parser)]
#[command(name = "agentrelay", version, about = "Serve demo agents as buffered SSE endpoints")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "AGENTRELAY_ADDR", default_value = "0.0.0.0:9000")]
    pub addr: SocketAddr,

    /// Cap on a buffered response body, in bytes
    #[arg(long, env = "AGENTRELAY_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Agents to serve, by slug (comma-separated). Serves all when empty.
    #[arg(long, env = "AGENTRELAY_AGENTS", value_delimiter = ',')]
    pub agents: Vec<String>,
}

impl ServerConfig {
    pub fn handler_config(&self) -> HandlerConfig {
        HandlerConfig::default().max_body_bytes(self.max_body_bytes)
    }

    /// Resolve the selected agent slugs.
    pub fn profiles(&self) -> Result<Vec<AgentProfile>, String> {
        if self.agents.is_empty() {
            return Ok(AgentProfile::ALL.to_vec());
        }

        self.agents
            .iter()
            .map(|slug| {
                AgentProfile::from_slug(slug.trim()).ok_or_else(|| {
                    let known: Vec<&str> = AgentProfile::ALL.iter().map(|p| p.slug()).collect();
                    format!("unknown agent '{}' (known: {})", slug, known.join(", "))
                })
            })
            .collect()
    }
}
