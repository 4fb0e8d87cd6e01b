// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub gate: GateConfig,
}

/// `[server]`: where the relay API listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty means same-origin only.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3001,
            allowed_origins: vec![
                "http://localhost:3000".into(),
                "http://127.0.0.1:3000".into(),
            ],
        }
    }
}

/// `[upstream]`: the chat-completion API the relay forwards to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    /// Output cap for in-character replies.
    pub max_tokens: u32,
    pub feedback_model: String,
    pub feedback_max_tokens: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            temperature: 0.7,
            max_tokens: 200,
            feedback_model: "gpt-4o-mini".into(),
            feedback_max_tokens: 300,
        }
    }
}

impl UpstreamConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

/// `[simulation]`: session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub duration_secs: u32,
    pub default_model: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_secs: crate::session::DEFAULT_DURATION_SECS,
            default_model: crate::core::cost::DEFAULT_MODEL.into(),
        }
    }
}

/// `[gate]`: the static-password access endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// `COMING_SOON_PASSWORD` overrides this at startup. `None` disables access.
    pub password: Option<String>,
    pub cookie_max_age_secs: u64,
    pub secure_cookie: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            password: Some("stervy".into()),
            cookie_max_age_secs: 60 * 60 * 24 * 7,
            secure_cookie: false,
        }
    }
}

impl GateConfig {
    /// Effective password: environment override first, then the file value.
    pub fn effective_password(&self) -> Option<String> {
        match std::env::var("COMING_SOON_PASSWORD") {
            Ok(p) => Some(p).filter(|p| !p.is_empty()),
            Err(_) => self.password.clone().filter(|p| !p.is_empty()),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        match paths::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.simulation.duration_secs == 0 {
            anyhow::bail!("simulation.duration_secs must be at least 1");
        }
        if !(0.0..=2.0).contains(&self.upstream.temperature) {
            anyhow::bail!(
                "upstream.temperature must be within 0.0-2.0, got {}",
                self.upstream.temperature
            );
        }
        url::Url::parse(&self.upstream.base_url).map_err(|e| {
            anyhow::anyhow!("upstream.base_url '{}' is invalid: {e}", self.upstream.base_url)
        })?;
        Ok(())
    }
}
