//! Single-call generation.

use crate::model::{Backend, Message, ModelRequest, call_model};
use crate::{RecipeSignature, Result};
use recipe::{GenerationRequest, RecipeSet, read_recipes};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Renders one prompt, makes one provider call.
///
/// Provider failures are returned as-is; retrying is the chain's business.
pub struct DirectGenerator<'a, B> {
    backend: &'a B,
    signature: &'a RecipeSignature,
    timeout: Duration,
}

impl<'a, B: Backend> DirectGenerator<'a, B> {
    pub fn new(backend: &'a B, signature: &'a RecipeSignature, timeout: Duration) -> Self {
        Self {
            backend,
            signature,
            timeout,
        }
    }

    /// Raw model text for `request`.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let system = self.signature.system_prompt();
        let messages = [Message::user(self.signature.render(request))];
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

        tracing::debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "direct generation returned"
        );
        Ok(response.message.text())
    }

    /// Generate, then parse and validate.
    pub async fn run(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<RecipeSet> {
        let text = self.generate(request, cancel).await?;
        Ok(read_recipes(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenerationError;
    use crate::testing::{ScriptedBackend, recipes_json};
    use recipe::OutputError;

    fn request() -> GenerationRequest {
        GenerationRequest::parse("pasta, garlic", None).unwrap()
    }

    #[tokio::test]
    async fn one_call_one_prompt() {
        let backend = ScriptedBackend::text(format!(
            "Here you go!\n{}",
            recipes_json(&["Garlic Pasta", "Aglio e Olio"], "pasta")
        ));
        let signature = RecipeSignature::default();
        let generator = DirectGenerator::new(&backend, &signature, Duration::from_secs(5));

        let set = generator.run(&request(), &CancellationToken::new()).await.unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(backend.calls(), 1);

        let seen = backend.requests();
        assert!(seen[0].tools.is_empty());
        assert!(seen[0].system.is_some());
        assert!(seen[0].prompt.contains("Ingredients: pasta, garlic"));
    }

    #[tokio::test]
    async fn provider_failure_is_not_retried() {
        let backend = ScriptedBackend::failing();
        let signature = RecipeSignature::default();
        let generator = DirectGenerator::new(&backend, &signature, Duration::from_secs(5));

        let err = generator.run(&request(), &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider(_)));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn unusable_text_is_output_error() {
        let backend = ScriptedBackend::text("Sorry, I can't help with that.");
        let signature = RecipeSignature::default();
        let generator = DirectGenerator::new(&backend, &signature, Duration::from_secs(5));

        let err = generator.run(&request(), &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Output(OutputError::Parse(_))));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let backend = ScriptedBackend::text("[]").with_delay(Duration::from_secs(30));
        let signature = RecipeSignature::default();
        let generator = DirectGenerator::new(&backend, &signature, Duration::from_millis(20));

        let err = generator.run(&request(), &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Provider(crate::ModelError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn cancelled_before_call_makes_no_call() {
        let backend = ScriptedBackend::text("[]");
        let signature = RecipeSignature::default();
        let generator = DirectGenerator::new(&backend, &signature, Duration::from_secs(5));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = generator.run(&request(), &cancel).await.unwrap_err();
        assert!(matches!(err, GenerationError::Cancelled));
        assert_eq!(backend.calls(), 0);
    }
}
