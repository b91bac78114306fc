//! The engine's single entry point.

use crate::cache::{ResponseCache, fingerprint};
use crate::fallback::{FallbackChain, GenerationResult, Strategy};
use crate::model::Backend;
use crate::tools::{ToolHost, ToolRegistry};
use crate::EngineConfig;
use recipe::GenerationRequest;
use serde::Serialize;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Primary generation mode, as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Standard,
    Agentic,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Agentic => "agentic",
        }
    }

    /// Mode label for a result: the strategy that produced it, or this mode
    /// when the canned strategy did.
    pub fn label_for(self, strategy: Strategy) -> Self {
        match strategy {
            Strategy::Agentic => Self::Agentic,
            Strategy::Direct => Self::Standard,
            Strategy::Canned => self,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces recipes for requests, choosing the primary strategy once at
/// construction.
pub struct RecipeAnalyzer<B, T = ToolRegistry> {
    chain: FallbackChain<B, T>,
    cache: Option<ResponseCache>,
    mode: Mode,
}

impl<B: Backend> RecipeAnalyzer<B> {
    /// Analyzer using the built-in tools.
    pub fn new(backend: B, config: EngineConfig) -> Self {
        Self::with_tools(backend, ToolRegistry::builtin(), config)
    }
}

impl<B: Backend, T: ToolHost> RecipeAnalyzer<B, T> {
    pub fn with_tools(backend: B, tools: T, config: EngineConfig) -> Self {
        let mode = if config.agentic {
            Mode::Agentic
        } else {
            Mode::Standard
        };
        let cache = config.cache.then(|| ResponseCache::new(config.cache_capacity, config.cache_ttl()));
        Self {
            chain: FallbackChain::new(backend, tools, config),
            cache,
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn chain(&self) -> &FallbackChain<B, T> {
        &self.chain
    }

    /// Produce 2-3 recipes for `request`. Never fails; see
    /// [`GenerationResult::status`].
    pub async fn analyze(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> GenerationResult {
        let result = match &self.cache {
            Some(cache) => {
                cache
                    .get_or_compute(fingerprint(request, self.mode), cancel, || {
                        self.chain.produce(request, cancel)
                    })
                    .await
            }
            None => self.chain.produce(request, cancel).await,
        };

        if result.is_degraded() {
            tracing::warn!(
                mode = %self.mode,
                strategy = %result.strategy,
                "returning degraded result"
            );
        }
        result
    }
}
