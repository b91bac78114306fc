//! Engine tuning knobs.

use serde::Deserialize;
use std::time::Duration;

/// Settings for strategy selection, retries, deadlines and caching.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Start the chain with the tool-using agent.
    pub agentic: bool,

    /// Model turns the agent may take before giving up.
    pub max_iterations: u32,

    /// Attempts per provider-backed strategy when the provider itself fails.
    pub provider_attempts: u32,

    /// Deadline for a single model call, in seconds.
    pub timeout_secs: u64,

    /// Deadline for a single tool call, in milliseconds.
    pub tool_timeout_ms: u64,

    /// Adapt model recipes to the request's dietary restrictions, one extra
    /// call per recipe.
    pub enhance: bool,

    /// Remember successful results per request fingerprint.
    pub cache: bool,

    /// Most results kept in the cache.
    pub cache_capacity: u64,

    /// How long a cached result stays fresh, in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            agentic: false,
            max_iterations: 6,
            provider_attempts: 1,
            timeout_secs: 60,
            tool_timeout_ms: 2000,
            enhance: true,
            cache: true,
            cache_capacity: 1_000,
            cache_ttl_secs: 3600,
        }
    }
}

impl EngineConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_millis(self.tool_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
