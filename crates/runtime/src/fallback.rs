//! Ordered generation strategies with graceful degradation.

use crate::agent::AgentLoop;
use crate::canned::canned_recipes;
use crate::direct::DirectGenerator;
use crate::model::Backend;
use crate::refine::{RecipeEnhancer, validate_ingredients};
use crate::tools::ToolHost;
use crate::{EngineConfig, EnhancementSignature, GenerationError, RecipeSignature, Result};
use recipe::{GenerationRequest, RecipeSet};
use serde::Serialize;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// One way of producing recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Tool-using agent loop.
    Agentic,
    /// Single model call.
    Direct,
    /// Local recipes, no model.
    Canned,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Agentic => "agentic",
            Self::Direct => "direct",
            Self::Canned => "canned",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the first strategy in the chain produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Success,
    DegradedFallback,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::DegradedFallback => "degraded-fallback",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recipes plus how they were made.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub recipes: RecipeSet,
    pub strategy: Strategy,
    pub status: Status,
}

impl GenerationResult {
    pub fn is_degraded(&self) -> bool {
        self.status == Status::DegradedFallback
    }
}

/// Tries each strategy in order until one yields a valid recipe set.
///
/// The last strategy is always [`Strategy::Canned`], which cannot fail, so
/// [`produce`](Self::produce) always returns a result. Model strategies see
/// the request after ingredient validation, and their recipes are adapted
/// to any dietary restrictions before they are returned.
pub struct FallbackChain<B, T> {
    backend: B,
    tools: T,
    signature: RecipeSignature,
    enhancement: EnhancementSignature,
    strategies: Vec<Strategy>,
    config: EngineConfig,
}

impl<B: Backend, T: ToolHost> FallbackChain<B, T> {
    /// `[Agentic, Direct, Canned]` when agentic mode is on, else
    /// `[Direct, Canned]`.
    pub fn new(backend: B, tools: T, config: EngineConfig) -> Self {
        let strategies = if config.agentic {
            vec![Strategy::Agentic, Strategy::Direct, Strategy::Canned]
        } else {
            vec![Strategy::Direct, Strategy::Canned]
        };
        Self {
            backend,
            tools,
            signature: RecipeSignature::default(),
            enhancement: EnhancementSignature::default(),
            strategies,
            config,
        }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn produce(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> GenerationResult {
        let validated = validate_ingredients(&self.tools, request, self.config.tool_timeout()).await;
        let prepared = validated.as_ref().unwrap_or(request);

        for (position, &strategy) in self.strategies.iter().enumerate() {
            if strategy == Strategy::Canned {
                break;
            }
            tracing::info!(%strategy, ingredients = prepared.ingredients().len(), "generating recipes");

            match self.attempt(strategy, prepared, cancel).await {
                Ok(recipes) => {
                    let recipes = self.enhance(recipes, prepared, cancel).await;
                    let status = if position == 0 {
                        Status::Success
                    } else {
                        Status::DegradedFallback
                    };
                    tracing::info!(%strategy, %status, recipes = recipes.len(), "recipes generated");
                    return GenerationResult {
                        recipes,
                        strategy,
                        status,
                    };
                }
                Err(GenerationError::Cancelled) => {
                    tracing::info!(%strategy, "generation cancelled");
                    break;
                }
                Err(e) => tracing::warn!(%strategy, error = %e, "strategy failed"),
            }
        }

        tracing::warn!("serving canned recipes");
        GenerationResult {
            recipes: canned_recipes(request),
            strategy: Strategy::Canned,
            status: Status::DegradedFallback,
        }
    }

    async fn enhance(
        &self,
        recipes: RecipeSet,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> RecipeSet {
        match request.dietary_restrictions() {
            Some(restrictions) if self.config.enhance => {
                RecipeEnhancer::new(&self.backend, &self.enhancement, self.config.provider_timeout())
                    .enhance(recipes, restrictions, cancel)
                    .await
            }
            _ => recipes,
        }
    }

    /// Run `strategy`, retrying provider failures up to the configured
    /// number of attempts.
    async fn attempt(
        &self,
        strategy: Strategy,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<RecipeSet> {
        let attempts = self.config.provider_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.run(strategy, request, cancel).await {
                Err(GenerationError::Provider(e)) if attempt < attempts => {
                    tracing::warn!(%strategy, attempt, error = %e, "provider failed, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn run(
        &self,
        strategy: Strategy,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<RecipeSet> {
        match strategy {
            Strategy::Agentic => {
                let agent = AgentLoop::new(&self.backend, &self.tools, &self.signature, &self.config);
                Ok(agent.run(request, cancel).await?.recipes)
            }
            Strategy::Direct => {
                DirectGenerator::new(&self.backend, &self.signature, self.config.provider_timeout())
                    .run(request, cancel)
                    .await
            }
            Strategy::Canned => Ok(canned_recipes(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, ScriptedBackend, recipes_json};
    use crate::tools::ToolRegistry;

    fn chain(backend: ScriptedBackend, config: EngineConfig) -> FallbackChain<ScriptedBackend, ToolRegistry> {
        FallbackChain::new(backend, ToolRegistry::builtin(), config)
    }

    fn agentic() -> EngineConfig {
        EngineConfig {
            agentic: true,
            max_iterations: 3,
            ..EngineConfig::default()
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::parse("chicken, rice", None).unwrap()
    }

    #[test]
    fn strategy_order_follows_mode() {
        let direct = chain(ScriptedBackend::failing(), EngineConfig::default());
        assert_eq!(direct.strategies(), [Strategy::Direct, Strategy::Canned]);

        let agent = chain(ScriptedBackend::failing(), agentic());
        assert_eq!(
            agent.strategies(),
            [Strategy::Agentic, Strategy::Direct, Strategy::Canned]
        );
    }

    #[tokio::test]
    async fn first_strategy_success_is_not_degraded() {
        let chain = chain(
            ScriptedBackend::text(recipes_json(&["A", "B"], "chicken")),
            EngineConfig::default(),
        );
        let result = chain.produce(&request(), &CancellationToken::new()).await;
        assert_eq!(result.strategy, Strategy::Direct);
        assert_eq!(result.status, Status::Success);
        assert_eq!(result.recipes.len(), 2);
    }

    #[tokio::test]
    async fn failing_provider_degrades_to_canned() {
        let chain = chain(ScriptedBackend::failing(), agentic());
        let result = chain.produce(&request(), &CancellationToken::new()).await;

        assert_eq!(result.strategy, Strategy::Canned);
        assert!(result.is_degraded());
        assert_eq!(result.recipes.len(), 2);
        // One agent call, one direct call.
        assert_eq!(chain.backend().calls(), 2);
    }

    #[tokio::test]
    async fn exhausted_agent_falls_back_to_direct() {
        let backend = ScriptedBackend::new(
            vec![Reply::Tools(vec![("calculate_nutrition", serde_json::json!({"ingredients": ["chicken"]}))]); 3],
            Reply::Text(recipes_json(&["A", "B", "C"], "chicken")),
        );
        let chain = chain(backend, agentic());
        let result = chain.produce(&request(), &CancellationToken::new()).await;

        assert_eq!(result.strategy, Strategy::Direct);
        assert_eq!(result.status, Status::DegradedFallback);
        assert_eq!(result.recipes.len(), 3);
        assert_eq!(chain.backend().calls(), 4);
    }

    #[tokio::test]
    async fn provider_attempts_retry_provider_errors() {
        let backend = ScriptedBackend::new(
            vec![Reply::Fail],
            Reply::Text(recipes_json(&["A", "B"], "chicken")),
        );
        let config = EngineConfig {
            provider_attempts: 2,
            ..EngineConfig::default()
        };
        let chain = chain(backend, config);
        let result = chain.produce(&request(), &CancellationToken::new()).await;

        assert_eq!(result.strategy, Strategy::Direct);
        assert_eq!(result.status, Status::Success);
        assert_eq!(chain.backend().calls(), 2);
    }

    #[tokio::test]
    async fn output_errors_are_not_retried() {
        let config = EngineConfig {
            provider_attempts: 3,
            ..EngineConfig::default()
        };
        let chain = chain(ScriptedBackend::text("nothing useful"), config);
        let result = chain.produce(&request(), &CancellationToken::new()).await;

        assert_eq!(result.strategy, Strategy::Canned);
        assert_eq!(chain.backend().calls(), 1);
    }

    #[tokio::test]
    async fn cancellation_skips_remaining_provider_strategies() {
        let chain = chain(ScriptedBackend::failing(), agentic());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = chain.produce(&request(), &cancel).await;
        assert_eq!(result.strategy, Strategy::Canned);
        assert_eq!(chain.backend().calls(), 0);
    }

    #[tokio::test]
    async fn model_strategies_see_validated_ingredients() {
        let chain = chain(
            ScriptedBackend::text(recipes_json(&["A", "B"], "rice")),
            EngineConfig::default(),
        );
        let request = GenerationRequest::parse("2 cups rice, 1 lb chicken", None).unwrap();
        chain.produce(&request, &CancellationToken::new()).await;

        let seen = chain.backend().requests();
        assert!(seen[0].prompt.contains("Ingredients: Rice, Chicken\n"));
    }

    #[tokio::test]
    async fn dietary_restrictions_adapt_model_recipes() {
        let backend = ScriptedBackend::new(
            vec![
                Reply::Text(recipes_json(&["Chicken Bowl", "Chicken Soup"], "chicken")),
                Reply::Fail,
            ],
            Reply::Text(
                serde_json::json!({
                    "name": "Tofu Soup", "ingredients": ["tofu"], "instructions": ["Simmer"]
                })
                .to_string(),
            ),
        );
        let chain = chain(backend, EngineConfig::default());
        let request = GenerationRequest::parse("chicken, rice", Some("vegan")).unwrap();
        let result = chain.produce(&request, &CancellationToken::new()).await;

        assert_eq!(result.status, Status::Success);
        let names: Vec<&str> = result.recipes.recipes().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["Chicken Bowl", "Tofu Soup"]);
        assert_eq!(chain.backend().calls(), 3);
    }

    #[tokio::test]
    async fn enhancement_can_be_disabled() {
        let config = EngineConfig {
            enhance: false,
            ..EngineConfig::default()
        };
        let chain = chain(ScriptedBackend::text(recipes_json(&["A", "B"], "chicken")), config);
        let request = GenerationRequest::parse("chicken", Some("vegan")).unwrap();
        chain.produce(&request, &CancellationToken::new()).await;
        assert_eq!(chain.backend().calls(), 1);
    }

    #[tokio::test]
    async fn canned_recipes_are_not_enhanced() {
        let chain = chain(ScriptedBackend::failing(), EngineConfig::default());
        let request = GenerationRequest::parse("tofu", Some("vegan")).unwrap();
        let result = chain.produce(&request, &CancellationToken::new()).await;

        assert_eq!(result.strategy, Strategy::Canned);
        assert_eq!(chain.backend().calls(), 1);
    }
}
