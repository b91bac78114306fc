//! Steps around generation: ingredient cleanup before, dietary adaptation after.
//!
//! Both are best-effort. A failed step leaves its input untouched.

use crate::model::{Backend, Message, ModelRequest, ToolCall, call_model};
use crate::tools::{ToolError, ToolHost};
use crate::{EnhancementSignature, GenerationError};
use recipe::{GenerationRequest, ParseError, RecipeSet, ValidatedRecipe, ValidationError};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

const VALIDATE_TOOL: &str = "validate_ingredients";

/// Clean the request's ingredients with the host's `validate_ingredients`
/// tool.
///
/// `None` means keep the request as given: the host has no such tool, the
/// tool failed, or nothing usable came back.
pub async fn validate_ingredients<T: ToolHost>(
    tools: &T,
    request: &GenerationRequest,
    limit: Duration,
) -> Option<GenerationRequest> {
    if !tools.declarations().iter().any(|d| d.name == VALIDATE_TOOL) {
        return None;
    }

    let call = ToolCall {
        id: format!("{VALIDATE_TOOL}-0"),
        name: VALIDATE_TOOL.to_string(),
        input: json!({ "raw_ingredients": request.joined() }),
    };
    let output = match tokio::time::timeout(limit, tools.execute(&call)).await {
        Ok(result) => result,
        Err(_) => Err(ToolError::Timeout(limit.as_millis() as u64)),
    };
    let output = match output {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!(error = %e, "ingredient validation failed, keeping request");
            return None;
        }
    };

    let names: Vec<String> = serde_json::from_value(output).ok()?;
    let cleaned = GenerationRequest::new(names, request.dietary_restrictions()).ok()?;
    tracing::debug!(
        before = request.ingredients().len(),
        after = cleaned.ingredients().len(),
        "ingredients validated"
    );
    Some(cleaned)
}

/// Why one recipe could not be adapted.
#[derive(Debug, Error)]
enum EnhanceError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("failed to encode recipe: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Adapts finished recipes to dietary restrictions, one model call per
/// recipe.
pub struct RecipeEnhancer<'a, B> {
    backend: &'a B,
    signature: &'a EnhancementSignature,
    timeout: Duration,
}

impl<'a, B: Backend> RecipeEnhancer<'a, B> {
    pub fn new(backend: &'a B, signature: &'a EnhancementSignature, timeout: Duration) -> Self {
        Self {
            backend,
            signature,
            timeout,
        }
    }

    /// Adapt every recipe to `restrictions`.
    ///
    /// A recipe whose call or reply is unusable is kept unchanged, as are all
    /// remaining recipes once `cancel` fires.
    pub async fn enhance(
        &self,
        recipes: RecipeSet,
        restrictions: &str,
        cancel: &CancellationToken,
    ) -> RecipeSet {
        let mut adapted = Vec::with_capacity(recipes.len());
        for original in &recipes {
            if cancel.is_cancelled() {
                adapted.push(original.clone());
                continue;
            }
            match self.enhance_one(original, restrictions, cancel).await {
                Ok(recipe) => adapted.push(recipe),
                Err(e) => {
                    tracing::warn!(recipe = original.name(), error = %e, "keeping recipe unenhanced");
                    adapted.push(original.clone());
                }
            }
        }
        RecipeSet::new(adapted).unwrap_or(recipes)
    }

    async fn enhance_one(
        &self,
        original: &ValidatedRecipe,
        restrictions: &str,
        cancel: &CancellationToken,
    ) -> Result<ValidatedRecipe, EnhanceError> {
        let encoded = serde_json::to_string(original)?;
        let system = self.signature.system_prompt();
        let messages = [Message::user(self.signature.render(&encoded, restrictions))];
        let response = call_model(
            self.backend,
            ModelRequest {
                system: Some(&system),
                messages: &messages,
                tools: &[],
            },
            self.timeout,
            cancel,
        )
        .await?;

        let candidate = recipe::parse(&response.message.text())?
            .into_iter()
            .next()
            .ok_or(ParseError::NoPayload)?;
        Ok(recipe::validate(candidate)?)
    }
}
