// src/relay/http.rs — Client for a running relay server

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::{ChatRelay, CompletionReply, CompletionRequest, FeedbackRequest, RelayError};
use crate::infra::errors::InterpersonalError;
use crate::provider::TokenUsage;

/// Talks to the relay API (`/api/scenarios/...`) over HTTP.
pub struct HttpRelay {
    client: reqwest::Client,
    base: Url,
}

#[derive(Deserialize)]
struct CompletionEnvelope {
    response: String,
    metadata: CompletionMetadata,
}

#[derive(Deserialize)]
struct CompletionMetadata {
    model: String,
    #[serde(default)]
    usage: Option<UsageMetadata>,
    #[serde(default)]
    cost: f64,
}

#[derive(Deserialize)]
struct UsageMetadata {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct FeedbackEnvelope {
    feedback: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

impl HttpRelay {
    pub fn new(base_url: &str) -> Result<Self, InterpersonalError> {
        let mut raw = base_url.trim().to_string();
        // Url::join drops the last path segment unless it ends in '/'.
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw)
            .map_err(|e| InterpersonalError::Config(format!("invalid relay URL {base_url}: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, RelayError> {
        self.base.join(path).map_err(|e| {
            RelayError::Service(InterpersonalError::Config(format!(
                "invalid relay path {path}: {e}"
            )))
        })
    }

    async fn post<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, RelayError> {
        let url = self.endpoint(path)?;
        let resp = self.client.post(url).json(body).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|e| e.error)
            .unwrap_or(text);
        Err(RelayError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ChatRelay for HttpRelay {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, RelayError> {
        let resp = self.post("api/scenarios/test", &request).await?;
        let envelope: CompletionEnvelope = resp.json().await?;
        let usage = envelope
            .metadata
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();
        Ok(CompletionReply {
            response: envelope.response,
            model: envelope.metadata.model,
            usage,
            cost: envelope.metadata.cost,
        })
    }

    async fn feedback(&self, request: FeedbackRequest) -> Result<String, RelayError> {
        let resp = self.post("api/scenarios/feedback-generate", &request).await?;
        let envelope: FeedbackEnvelope = resp.json().await?;
        Ok(envelope.feedback)
    }
}
