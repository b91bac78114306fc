//! Recipe generation engine.
//!
//! This crate turns a cleaned [`GenerationRequest`](recipe::GenerationRequest)
//! into two or three validated recipes by orchestrating an LLM provider.
//!
//! # Overview
//!
//! - **[`Backend`]**: trait over provider APIs; [`Provider`] wraps the
//!   Anthropic and Gemini adapters.
//! - **[`ToolRegistry`]**: deterministic tools the model may call
//!   (nutrition, cooking time, ingredient cleanup).
//! - **[`RecipeSignature`]**: the one definition every prompt is rendered from.
//! - **[`DirectGenerator`]** and **[`AgentLoop`]**: the two model-backed
//!   strategies.
//! - **[`FallbackChain`]**: tries strategies in order and ends with canned
//!   recipes, so it always produces a result.
//! - **[`RecipeAnalyzer`]**: entry point; picks the primary strategy from
//!   [`EngineConfig`] and fronts the chain with a [`ResponseCache`].
//!
//! # Example
//!
//! ```no_run
//! use recipe::GenerationRequest;
//! use runtime::{EngineConfig, Provider, ProviderKind, RecipeAnalyzer};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), recipe::RequestError> {
//! let provider = Provider::new(ProviderKind::Anthropic, "sk-ant-...", "claude-sonnet-4-20250514", 0.7, 2000);
//! let analyzer = RecipeAnalyzer::new(provider, EngineConfig::default());
//!
//! let request = GenerationRequest::parse("chicken, rice, garlic", None)?;
//! let result = analyzer.analyze(&request, &CancellationToken::new()).await;
//! println!("{} recipes via {}", result.recipes.len(), result.strategy);
//! # Ok(())
//! # }
//! ```

mod agent;
mod cache;
mod canned;
mod config;
mod direct;
mod dispatcher;
mod error;
mod fallback;
pub mod model;
pub mod providers;
mod refine;
mod signature;
#[cfg(test)]
mod testing;
pub mod tools;

pub use agent::{AgentLoop, AgentOutcome, AgentState};
pub use cache::{ResponseCache, fingerprint};
pub use canned::canned_recipes;
pub use config::EngineConfig;
pub use direct::DirectGenerator;
pub use dispatcher::{Mode, RecipeAnalyzer};
pub use error::{GenerationError, Result};
pub use fallback::{FallbackChain, GenerationResult, Status, Strategy};
pub use model::{Backend, ModelError};
pub use providers::{Provider, ProviderKind};
pub use refine::{RecipeEnhancer, validate_ingredients};
pub use signature::{EnhancementSignature, Field, RecipeSignature};
pub use tools::{ToolError, ToolRegistry};
