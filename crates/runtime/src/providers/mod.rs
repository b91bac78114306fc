//! LLM provider adapters.
//!
//! Each provider implements the backend trait for its specific API.

mod anthropic;
mod gemini;

pub use anthropic::{AnthropicBackend, AnthropicBackendBuilder};
pub use gemini::{GeminiBackend, GeminiBackendBuilder};

use crate::model::{Backend, ModelError, ModelRequest, ModelResponse};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which provider API to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Anthropic,
    Gemini,
}

impl ProviderKind {
    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::Gemini => "gemini-2.5-flash",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        })
    }
}

/// Any supported provider behind one backend type.
pub enum Provider {
    Anthropic(AnthropicBackend),
    Gemini(GeminiBackend),
}

impl Provider {
    /// Build a provider with the given credentials and sampling settings.
    pub fn new(
        kind: ProviderKind,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        match kind {
            ProviderKind::Anthropic => Self::Anthropic(
                AnthropicBackend::builder(api_key, model)
                    .temperature(temperature)
                    .max_tokens(max_tokens)
                    .build(),
            ),
            ProviderKind::Gemini => Self::Gemini(
                GeminiBackend::builder(api_key, model)
                    .temperature(temperature)
                    .max_tokens(max_tokens)
                    .build(),
            ),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anthropic(backend) => backend.fmt(f),
            Self::Gemini(backend) => backend.fmt(f),
        }
    }
}

impl Backend for Provider {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        match self {
            Self::Anthropic(backend) => backend.call(request).await,
            Self::Gemini(backend) => backend.call(request).await,
        }
    }
}
