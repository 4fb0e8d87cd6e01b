// src/provider/openai.rs — OpenAI Chat Completions provider

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, ModelProvider, TokenUsage};
use crate::infra::errors::InterpersonalError;

pub struct OpenAIProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAIProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_body(request: &ChatRequest) -> serde_json::Value {
        let mut msgs = Vec::with_capacity(request.messages.len() + 1);

        if let Some(system) = &request.system {
            msgs.push(serde_json::json!({
                "role": "system",
                "content": system,
            }));
        }

        for m in &request.messages {
            msgs.push(serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            }));
        }

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": msgs,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        body
    }
}

/// Read a token count from the usage block. Absent means zero; counts past
/// `u32::MAX` are clamped rather than wrapped.
fn token_count(usage: &serde_json::Value, key: &str) -> u32 {
    usage[key]
        .as_u64()
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, InterpersonalError> {
        let body = Self::build_body(&request);

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| InterpersonalError::Provider {
                provider: "openai".into(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(InterpersonalError::RateLimited {
                provider: "openai".into(),
            });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!("OpenAI API error: HTTP {}: {}", status, error_body);
            return Err(InterpersonalError::Provider {
                provider: "openai".into(),
                message: format!("HTTP {}: {}", status, error_body),
            });
        }

        let resp: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| InterpersonalError::Provider {
                    provider: "openai".into(),
                    message: format!("Failed to parse response: {}", e),
                })?;

        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| InterpersonalError::EmptyResponse {
                provider: "openai".into(),
            })?
            .to_string();

        let usage = TokenUsage {
            input_tokens: token_count(&resp["usage"], "prompt_tokens"),
            output_tokens: token_count(&resp["usage"], "completion_tokens"),
        };

        let model = resp["model"]
            .as_str()
            .unwrap_or(&request.model)
            .to_string();

        Ok(ChatResponse {
            model,
            content,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Message;

    #[test]
    fn test_build_body_puts_system_first() {
        let req = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![Message::assistant("Hey, can we talk?"), Message::user("Sure.")],
            max_tokens: Some(200),
            temperature: Some(0.7),
            system: Some("You are someone being broken up with.".into()),
        };
        let body = OpenAIProvider::build_body(&req);
        let msgs = body["messages"].as_array().unwrap();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0]["role"], "system");
        assert_eq!(msgs[1]["role"], "assistant");
        assert_eq!(msgs[2]["role"], "user");
        assert_eq!(msgs[2]["content"], "Sure.");
        assert_eq!(body["max_tokens"], 200);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_build_body_omits_unset_options() {
        let req = ChatRequest {
            model: "gpt-4o".into(),
            messages: vec![Message::user("hi")],
            ..Default::default()
        };
        let body = OpenAIProvider::build_body(&req);
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_token_count_clamps_and_defaults() {
        let usage = serde_json::json!({
            "prompt_tokens": 5_000_000_000u64,
            "completion_tokens": 42,
        });
        assert_eq!(token_count(&usage, "prompt_tokens"), u32::MAX);
        assert_eq!(token_count(&usage, "completion_tokens"), 42);
        assert_eq!(token_count(&usage, "total_tokens"), 0);
        assert_eq!(token_count(&serde_json::Value::Null, "prompt_tokens"), 0);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let p = OpenAIProvider::with_base_url("k".into(), "http://localhost:1/v1/".into());
        assert_eq!(p.base_url, "http://localhost:1/v1");
    }
}
