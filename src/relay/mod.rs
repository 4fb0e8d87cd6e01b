// src/relay/mod.rs — Pass-through to the chat-completion model
//
// `ChatRelay` is the seam the session driver talks to. Two implementations:
// `RelayService` calls the model in-process (it is also what the HTTP API
// serves), `HttpRelay` calls a running relay server.

pub mod http;
pub mod prompt;
pub mod service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infra::errors::InterpersonalError;
use crate::provider::TokenUsage;
use crate::session::Turn;

pub use http::HttpRelay;
pub use service::{RelayService, RelaySettings};

/// One in-character turn: persona prompt, prior transcript, new user text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub scenario_id: String,
    pub prompt: String,
    pub user_input: String,
    /// Requested model; unknown or missing falls back to the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub conversation_history: Vec<Turn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReply {
    pub response: String,
    pub model: String,
    pub usage: TokenUsage,
    pub cost: f64,
}

/// End-of-session reflection over the whole transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub scenario_id: String,
    pub conversation: Vec<Turn>,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Service(#[from] InterpersonalError),

    #[error("relay returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("relay unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait ChatRelay: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, RelayError>;

    async fn feedback(&self, request: FeedbackRequest) -> Result<String, RelayError>;
}
