//! Serverless request adapter and HTTP front-end for agentrelay agents.
//!
//! [`AgentHandler`] takes one invocation event (method, body, base64 flag),
//! runs an [`agentrelay_core::AgentRuntime`] over the conversation in the body,
//! and returns a complete response whose body is a buffered sequence of SSE
//! `data:` frames. [`RelayRouter`] mounts handlers on an axum router so the same
//! adapter can be served over plain HTTP.
//!
//! # Example
//!
//! ```rust,no_run
//! use agentrelay_core::test_utils::MockRuntime;
//! use agentrelay_server::{AgentHandler, InvocationEvent};
//!
//! # async fn example() {
//! let handler = AgentHandler::new(MockRuntime::new().with_text("Hello!"));
//!
//! let response = handler
//!     .handle(InvocationEvent::post(r#"{"messages":[{"role":"user","content":"Hi"}]}"#))
//!     .await;
//!
//! assert_eq!(response.status_code, 200);
//! print!("{}", response.body);
//! # }
//! ```
//!
//! The example needs the `test-utils` feature of `agentrelay-core`.

pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod handler;
pub mod request;
pub mod router;
pub mod sse;
pub(crate) mod state;

pub use config::{HandlerConfig, ServerConfig};
pub use envelope::{HttpResponse, InvocationEvent};
pub use error::{BuildError, ServerError, ServerResult};
pub use events::{AgentResponse, SseEvent};
pub use handler::AgentHandler;
pub use request::{Conversation, RequestMessage, RequestRole, RunRequest};
pub use router::RelayRouter;
