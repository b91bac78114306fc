//! Configuration loading from recipe-analyzer.toml and the environment.

use runtime::{EngineConfig, Provider, ProviderKind};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

/// HTTP listener settings.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Origins allowed by CORS. `"*"` allows any.
    pub allowed_origins: Vec<String>,

    /// Verbose logging.
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec!["*".to_string()],
            debug: false,
        }
    }
}

/// Backend provider configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    pub provider: ProviderKind,

    /// Model to use. Defaults per provider.
    pub model: Option<String>,

    pub api_key: Option<String>,

    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            api_key: None,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

impl BackendConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Environment variable holding the key for the selected provider.
    pub fn api_key_var(&self) -> &'static str {
        match self.provider {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Empty values are ignored. The provider is resolved first so the API key
    /// is read from that provider's variable.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(debug) = var("DEBUG") {
            self.server.debug = flag(&debug);
        }
        if let Some(origins) = var("ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(provider) = var("LLM_PROVIDER") {
            self.backend.provider = provider.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "LLM_PROVIDER",
                value: provider,
            })?;
        }
        if let Some(model) = var("LLM_MODEL") {
            self.backend.model = Some(model);
        }
        if let Some(temperature) = var("LLM_TEMPERATURE") {
            self.backend.temperature = parse_var("LLM_TEMPERATURE", &temperature)?;
        }
        if let Some(max_tokens) = var("LLM_MAX_TOKENS") {
            self.backend.max_tokens = parse_var("LLM_MAX_TOKENS", &max_tokens)?;
        }
        if let Some(key) = var(self.backend.api_key_var()) {
            self.backend.api_key = Some(key);
        }

        if let Some(agentic) = var("AGENTIC_MODE") {
            self.engine.agentic = flag(&agentic);
        }
        Ok(())
    }

    /// Build the configured provider.
    pub fn provider(&self) -> Result<Provider, ConfigError> {
        let backend = &self.backend;
        let api_key = backend
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey {
                var: backend.api_key_var(),
            })?;
        Ok(Provider::new(
            backend.provider,
            api_key,
            backend.model(),
            backend.temperature,
            backend.max_tokens,
        ))
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}

fn flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },

    #[error("API key not configured: set backend.api_key or {var}")]
    MissingApiKey { var: &'static str },
}
