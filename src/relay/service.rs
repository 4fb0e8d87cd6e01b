// src/relay/service.rs — Relay logic shared by the HTTP API and in-process sessions

use std::sync::Arc;

use async_trait::async_trait;

use super::{prompt, ChatRelay, CompletionReply, CompletionRequest, FeedbackRequest, RelayError};
use crate::core::cost::{calculate_cost, resolve_model};
use crate::infra::config::UpstreamConfig;
use crate::infra::errors::InterpersonalError;
use crate::provider::openai::OpenAIProvider;
use crate::provider::{ChatRequest, Message, ModelProvider};
use crate::util::log_preview;

/// Fixed generation parameters for the two calls.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub feedback_model: String,
    pub feedback_max_tokens: u32,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self::from(&UpstreamConfig::default())
    }
}

impl From<&UpstreamConfig> for RelaySettings {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            feedback_model: config.feedback_model.clone(),
            feedback_max_tokens: config.feedback_max_tokens,
        }
    }
}

pub struct RelayService {
    /// `None` when no API key was configured; every call then fails with
    /// [`InterpersonalError::NoApiKey`].
    provider: Option<Arc<dyn ModelProvider>>,
    settings: RelaySettings,
    api_key_env: String,
}

impl RelayService {
    pub fn new(provider: Arc<dyn ModelProvider>, settings: RelaySettings) -> Self {
        Self {
            provider: Some(provider),
            settings,
            api_key_env: UpstreamConfig::default().api_key_env,
        }
    }

    /// Build from config, reading the API key from the environment.
    pub fn from_config(config: &UpstreamConfig) -> Self {
        let provider = match config.api_key() {
            Some(key) => {
                let p: Arc<dyn ModelProvider> = Arc::new(OpenAIProvider::with_base_url(
                    key,
                    config.base_url.clone(),
                ));
                Some(p)
            }
            None => {
                tracing::warn!(
                    "{} is not set; relay calls will fail until it is configured",
                    config.api_key_env
                );
                None
            }
        };
        Self {
            provider,
            settings: RelaySettings::from(config),
            api_key_env: config.api_key_env.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<dyn ModelProvider>, InterpersonalError> {
        self.provider
            .as_ref()
            .ok_or_else(|| InterpersonalError::NoApiKey {
                env_var: self.api_key_env.clone(),
            })
    }

    /// Forward one turn: persona prompt as system, then history, then the
    /// new user input.
    pub async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionReply, InterpersonalError> {
        if request.scenario_id.trim().is_empty()
            || request.prompt.trim().is_empty()
            || request.user_input.trim().is_empty()
        {
            return Err(InterpersonalError::Validation(
                "Missing required fields: scenarioId, prompt, and userInput".into(),
            ));
        }
        let provider = self.provider()?;
        let model = resolve_model(request.model.as_deref());

        let chat = ChatRequest {
            model: model.to_string(),
            messages: prompt::completion_messages(
                &request.conversation_history,
                &request.user_input,
            ),
            max_tokens: Some(self.settings.max_tokens),
            temperature: Some(self.settings.temperature),
            system: Some(request.prompt),
        };

        let response = provider.chat(chat).await?;
        // Priced by the whitelisted model, not the upstream's dated variant.
        let cost = calculate_cost(model, &response.usage);

        tracing::info!(
            scenario = %request.scenario_id,
            model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Relayed turn (${:.6})",
            cost
        );

        Ok(CompletionReply {
            response: response.content,
            model: response.model,
            usage: response.usage,
            cost,
        })
    }

    /// One-shot coaching feedback over the full transcript.
    pub async fn generate_feedback(
        &self,
        request: FeedbackRequest,
    ) -> Result<String, InterpersonalError> {
        if request.conversation.is_empty() {
            return Err(InterpersonalError::Validation(
                "Missing or invalid conversation data".into(),
            ));
        }
        let provider = self.provider()?;

        let feedback_prompt = prompt::feedback_prompt(&request.conversation);
        tracing::debug!(
            scenario = %request.scenario_id,
            "Requesting feedback: {}",
            log_preview(&feedback_prompt, 100)
        );

        let chat = ChatRequest {
            model: self.settings.feedback_model.clone(),
            messages: vec![Message::user(feedback_prompt)],
            max_tokens: Some(self.settings.feedback_max_tokens),
            temperature: Some(self.settings.temperature),
            system: None,
        };

        let response = provider.chat(chat).await?;
        tracing::info!(
            scenario = %request.scenario_id,
            turns = request.conversation.len(),
            "Generated feedback ({} chars)",
            response.content.len()
        );
        Ok(response.content)
    }
}

#[async_trait]
impl ChatRelay for RelayService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, RelayError> {
        Ok(RelayService::complete(self, request).await?)
    }

    async fn feedback(&self, request: FeedbackRequest) -> Result<String, RelayError> {
        Ok(self.generate_feedback(request).await?)
    }
}
