//! Application state for the agentrelay server.

use std::sync::Arc;

use crate::handler::AgentHandler;

/// State of one agent endpoint.
///
/// Cloned for each request; the handler itself is shared.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<AgentHandler>,
}

impl AppState {
    pub fn from_arc(handler: Arc<AgentHandler>) -> Self {
        Self { handler }
    }
}

/// State of the index endpoint.
#[derive(Clone)]
pub struct IndexState {
    /// Mounted agent paths, in registration order.
    pub paths: Arc<Vec<String>>,
}
