//! Router builder for agentrelay HTTP endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    routing::{any, get},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::envelope::{HttpResponse, InvocationEvent};
use crate::error::BuildError;
use crate::handler::AgentHandler;
use crate::state::{AppState, IndexState};

const INDEX_PATH: &str = "/";
const HEALTH_PATH: &str = "/health";

/// Builder for configuring agentrelay HTTP endpoints.
///
/// Each agent is mounted at its own path and accepts any method; the handler
/// answers non-POST requests with 405. `GET /` lists the mounted agents and
/// `GET /health` reports liveness.
///
/// # Example
///
/// ```rust,no_run
/// use agentrelay_core::{AgentProfile, OpenAiConfig, OpenAiRuntime};
/// use agentrelay_server::{AgentHandler, RelayRouter};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let runtime = OpenAiRuntime::for_profile(OpenAiConfig::from_env(), AgentProfile::AgenticChat)?;
///
/// let app = RelayRouter::new()
///     .with_agent("/agentic_chat", AgentHandler::new(runtime))
///     .build()?;
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:9000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct RelayRouter {
    agents: Vec<(String, Arc<AgentHandler>)>,
}

impl RelayRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount an agent at the given path.
    ///
    /// A missing leading slash is added.
    pub fn with_agent(self, path: impl Into<String>, handler: AgentHandler) -> Self {
        self.with_shared_agent(path, Arc::new(handler))
    }

    /// Mount a shared handler at the given path.
    pub fn with_shared_agent(mut self, path: impl Into<String>, handler: Arc<AgentHandler>) -> Self {
        self.agents.push((normalize_path(path.into()), handler));
        self
    }

    /// Build the router with all configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoEndpoints`] if no agents were mounted, and
    /// [`BuildError::DuplicatePath`] if two agents share a path or an agent
    /// uses `/` or `/health`.
    pub fn build(self) -> Result<Router, BuildError> {
        if self.agents.is_empty() {
            return Err(BuildError::NoEndpoints);
        }

        let mut paths: Vec<String> = Vec::with_capacity(self.agents.len());
        let mut router = Router::new();

        for (path, handler) in self.agents {
            if path == INDEX_PATH || path == HEALTH_PATH || paths.contains(&path) {
                return Err(BuildError::DuplicatePath(path));
            }

            let agent_routes = Router::new()
                .route(&path, any(agent_endpoint))
                .with_state(AppState::from_arc(handler));
            router = router.merge(agent_routes);
            paths.push(path);
        }

        let index = Router::new()
            .route(INDEX_PATH, get(index_endpoint))
            .with_state(IndexState {
                paths: Arc::new(paths),
            });

        Ok(router
            .merge(index)
            .route(HEALTH_PATH, get(health_endpoint))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            ))
    }

    /// Build the router and nest it under a prefix path.
    pub fn build_nested(self, prefix: impl Into<String>) -> Result<Router, BuildError> {
        Ok(Router::new().nest(&normalize_path(prefix.into()), self.build()?))
    }
}

fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

/// Forward an HTTP request to the adapter as an invocation event.
///
/// Bodies that are not UTF-8 are passed base64-encoded, so the adapter reports
/// them as invalid rather than losing bytes.
async fn agent_endpoint(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> HttpResponse {
    let event = match std::str::from_utf8(&body) {
        Ok(_) if body.is_empty() => InvocationEvent::with_method(method.as_str(), None),
        Ok(text) => InvocationEvent::with_method(method.as_str(), Some(text.to_string())),
        Err(_) => InvocationEvent {
            http_method: Some(method.as_str().to_string()),
            body: Some(BASE64.encode(&body)),
            is_base64_encoded: true,
        },
    };

    state.handler.handle(event).await
}

async fn index_endpoint(State(state): State<IndexState>) -> Json<Value> {
    Json(json!({
        "service": "agentrelay",
        "agents": state.paths.as_slice(),
    }))
}

async fn health_endpoint() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
