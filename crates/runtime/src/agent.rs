//! Tool-using generation loop.

use crate::model::{Backend, Message, ModelRequest, ToolCall, ToolResult, call_model};
use crate::tools::{ToolError, ToolHost};
use crate::{EngineConfig, GenerationError, RecipeSignature, Result};
use recipe::{GenerationRequest, RecipeSet, read_recipes};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Where the loop is between provider calls.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentState {
    /// Ready to ask the model for its next move.
    Drafting,
    /// The model asked for these tools, in this order.
    AwaitingToolCall(Vec<ToolCall>),
    /// The model answered without asking for tools.
    HasFinalAnswer(String),
    /// A valid recipe set was produced.
    Terminated(RecipeSet),
}

/// A successful agent run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutcome {
    pub recipes: RecipeSet,
    /// Provider calls made.
    pub iterations: u32,
    /// Tool calls executed, including failed ones.
    pub tool_calls: u32,
}

/// Drives the model ⇄ tool conversation for one request.
///
/// Each provider call counts as one iteration. Tool calls within a turn run
/// sequentially in the order the model listed them; a failing tool is
/// reported back to the model and never ends the loop.
pub struct AgentLoop<'a, B, T> {
    backend: &'a B,
    tools: &'a T,
    signature: &'a RecipeSignature,
    max_iterations: u32,
    provider_timeout: Duration,
    tool_timeout: Duration,
}

impl<'a, B: Backend, T: ToolHost> AgentLoop<'a, B, T> {
    pub fn new(
        backend: &'a B,
        tools: &'a T,
        signature: &'a RecipeSignature,
        config: &EngineConfig,
    ) -> Self {
        Self {
            backend,
            tools,
            signature,
            max_iterations: config.max_iterations,
            provider_timeout: config.provider_timeout(),
            tool_timeout: config.tool_timeout(),
        }
    }

    pub async fn run(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<AgentOutcome> {
        let system = self.signature.system_prompt();
        let mut messages = vec![Message::user(
            self.signature
                .render_agentic(request, self.tools.declarations()),
        )];
        let mut state = AgentState::Drafting;
        let mut iterations = 0;
        let mut tool_calls = 0;

        loop {
            state = match state {
                AgentState::Terminated(recipes) => {
                    tracing::debug!(iterations, tool_calls, "agent produced recipes");
                    return Ok(AgentOutcome {
                        recipes,
                        iterations,
                        tool_calls,
                    });
                }

                AgentState::Drafting => {
                    if iterations >= self.max_iterations {
                        tracing::debug!(iterations, tool_calls, "agent iteration budget spent");
                        return Err(GenerationError::AgentExhausted { iterations });
                    }
                    if cancel.is_cancelled() {
                        return Err(GenerationError::Cancelled);
                    }
                    iterations += 1;
                    tracing::debug!(iteration = iterations, "agent turn");

                    let response = call_model(
                        self.backend,
                        ModelRequest {
                            system: Some(&system),
                            messages: &messages,
                            tools: self.tools.specs(),
                        },
                        self.provider_timeout,
                        cancel,
                    )
                    .await?;

                    let calls = response.message.tool_calls();
                    let text = response.message.text();
                    if !response.message.parts.is_empty() {
                        messages.push(response.message);
                    }

                    if calls.is_empty() {
                        AgentState::HasFinalAnswer(text)
                    } else {
                        AgentState::AwaitingToolCall(calls)
                    }
                }

                AgentState::AwaitingToolCall(calls) => {
                    let mut results = Vec::with_capacity(calls.len());
                    for call in &calls {
                        if cancel.is_cancelled() {
                            return Err(GenerationError::Cancelled);
                        }
                        tool_calls += 1;
                        results.push(self.execute(call).await);
                    }
                    messages.push(Message::tool_results(results));
                    AgentState::Drafting
                }

                AgentState::HasFinalAnswer(text) => match read_recipes(&text) {
                    Ok(recipes) => AgentState::Terminated(recipes),
                    Err(e) => {
                        tracing::debug!(error = %e, "agent answer rejected");
                        messages.push(Message::user(self.signature.corrective(&e)));
                        AgentState::Drafting
                    }
                },
            };
        }
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let outcome = match tokio::time::timeout(self.tool_timeout, self.tools.execute(call)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(ToolError::Timeout(self.tool_timeout.as_millis() as u64)),
        };
        if let Err(e) = &outcome {
            tracing::debug!(tool = %call.name, error = %e, "tool call failed");
        }
        ToolResult::for_call(call, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Part, ToolSpec};
    use crate::testing::{Reply, ScriptedBackend, recipes_json};
    use crate::tools::{ToolDeclaration, ToolRegistry};
    use serde_json::{Value, json};

    fn config(max_iterations: u32) -> EngineConfig {
        EngineConfig {
            agentic: true,
            max_iterations,
            ..EngineConfig::default()
        }
    }

    fn chicken_request() -> GenerationRequest {
        GenerationRequest::parse("chicken, rice, tomatoes, onions, garlic", None).unwrap()
    }

    fn last_results(messages: &[Message]) -> Vec<ToolResult> {
        messages
            .last()
            .unwrap()
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::ToolResult(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn always_tools_exhausts_budget() {
        let backend = ScriptedBackend::always_tools();
        let tools = ToolRegistry::builtin();
        let signature = RecipeSignature::default();
        let agent = AgentLoop::new(&backend, &tools, &signature, &config(4));

        let err = agent
            .run(&chicken_request(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::AgentExhausted { iterations: 4 }));
        assert_eq!(backend.calls(), 4);
    }

    #[tokio::test]
    async fn nutrition_tool_runs_before_final_answer() {
        let backend = ScriptedBackend::new(
            vec![Reply::Tools(vec![(
                "calculate_nutrition",
                json!({"ingredients": ["chicken", "rice", "tomatoes"]}),
            )])],
            Reply::Text(recipes_json(
                &["Chicken Fried Rice", "Chicken Tomato Stew", "Garlic Chicken"],
                "chicken",
            )),
        );
        let tools = ToolRegistry::builtin();
        let signature = RecipeSignature::default();
        let agent = AgentLoop::new(&backend, &tools, &signature, &config(6));

        let outcome = agent
            .run(&chicken_request(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.tool_calls, 1);
        assert_eq!(outcome.recipes.len(), 3);
        for recipe in &outcome.recipes {
            assert!(recipe.ingredients().iter().any(|i| i == "chicken"));
        }

        let seen = backend.requests();
        assert_eq!(seen[0].tools.len(), 3);
        assert!(seen[0].prompt.contains("calculate_nutrition"));
        let results = last_results(&seen[1].messages);
        assert_eq!(results.len(), 1);
        assert!(!results[0].is_failure());
        assert_eq!(results[0].payload()["servings"], 4);
    }

    #[tokio::test]
    async fn tool_errors_are_reported_back_in_order() {
        let backend = ScriptedBackend::new(
            vec![Reply::Tools(vec![
                ("search_web", json!({"q": "recipes"})),
                ("calculate_nutrition", json!({"servings": 2})),
                ("estimate_cooking_time", json!({"ingredients": ["chicken"]})),
            ])],
            Reply::Text(recipes_json(&["A", "B"], "chicken")),
        );
        let tools = ToolRegistry::builtin();
        let signature = RecipeSignature::default();
        let agent = AgentLoop::new(&backend, &tools, &signature, &config(6));

        let outcome = agent
            .run(&chicken_request(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.tool_calls, 3);

        let results = last_results(&backend.requests()[1].messages);
        let names: Vec<_> = results.iter().map(ToolResult::tool_name).collect();
        assert_eq!(names, ["search_web", "calculate_nutrition", "estimate_cooking_time"]);
        assert!(results[0].is_failure());
        assert!(results[1].is_failure());
        assert_eq!(results[2].payload(), json!("42 minutes"));
    }

    #[tokio::test]
    async fn bad_answer_gets_corrective_turn() {
        let backend = ScriptedBackend::new(
            vec![Reply::Text("Here is one idea: chicken soup.".into())],
            Reply::Text(recipes_json(&["A", "B"], "chicken")),
        );
        let tools = ToolRegistry::builtin();
        let signature = RecipeSignature::default();
        let agent = AgentLoop::new(&backend, &tools, &signature, &config(6));

        let outcome = agent
            .run(&chicken_request(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.tool_calls, 0);

        let second = &backend.requests()[1].messages;
        assert!(second.last().unwrap().text().starts_with("Your last answer could not be used"));
    }

    #[tokio::test]
    async fn corrective_turns_count_against_budget() {
        let backend = ScriptedBackend::text("no recipes today");
        let tools = ToolRegistry::builtin();
        let signature = RecipeSignature::default();
        let agent = AgentLoop::new(&backend, &tools, &signature, &config(3));

        let err = agent
            .run(&chicken_request(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::AgentExhausted { iterations: 3 }));
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn cancellation_stops_before_next_call() {
        let backend = ScriptedBackend::always_tools();
        let tools = ToolRegistry::builtin();
        let signature = RecipeSignature::default();
        let agent = AgentLoop::new(&backend, &tools, &signature, &config(6));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = agent.run(&chicken_request(), &cancel).await.unwrap_err();
        assert!(matches!(err, GenerationError::Cancelled));
        assert_eq!(backend.calls(), 0);
    }

    struct SlowTools;

    impl ToolHost for SlowTools {
        fn declarations(&self) -> &[ToolDeclaration] {
            &[]
        }

        fn specs(&self) -> &[ToolSpec] {
            &[]
        }

        async fn execute(&self, _call: &ToolCall) -> std::result::Result<Value, ToolError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn slow_tool_times_out_into_failed_result() {
        let backend = ScriptedBackend::new(
            vec![Reply::Tools(vec![("anything", json!({}))])],
            Reply::Text(recipes_json(&["A", "B"], "chicken")),
        );
        let signature = RecipeSignature::default();
        let config = EngineConfig {
            tool_timeout_ms: 10,
            ..config(6)
        };
        let agent = AgentLoop::new(&backend, &SlowTools, &signature, &config);

        agent
            .run(&chicken_request(), &CancellationToken::new())
            .await
            .unwrap();
        let results = last_results(&backend.requests()[1].messages);
        assert!(matches!(
            &results[0],
            ToolResult::Failure { error: ToolError::Timeout(10), .. }
        ));
    }
}
