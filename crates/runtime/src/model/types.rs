use super::errors::ModelError;
use crate::tools::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// The result returned to the model for one tool call.
///
/// Both variants carry the tool name; some providers match results to calls
/// by name rather than by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolResult {
    Success {
        tool_call_id: String,
        tool_name: String,
        output: Value,
    },
    Failure {
        tool_call_id: String,
        tool_name: String,
        error: ToolError,
    },
}

impl ToolResult {
    /// Pair a call with the outcome of executing it.
    pub fn for_call(call: &ToolCall, outcome: Result<Value, ToolError>) -> Self {
        match outcome {
            Ok(output) => Self::Success {
                tool_call_id: call.id.clone(),
                tool_name: call.name.clone(),
                output,
            },
            Err(error) => Self::Failure {
                tool_call_id: call.id.clone(),
                tool_name: call.name.clone(),
                error,
            },
        }
    }

    pub fn tool_call_id(&self) -> &str {
        match self {
            Self::Success { tool_call_id, .. } | Self::Failure { tool_call_id, .. } => tool_call_id,
        }
    }

    pub fn tool_name(&self) -> &str {
        match self {
            Self::Success { tool_name, .. } | Self::Failure { tool_name, .. } => tool_name,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// The payload as the model should see it: the tool output, or
    /// `{"error": "..."}` for failures.
    pub fn payload(&self) -> Value {
        match self {
            Self::Success { output, .. } => output.clone(),
            Self::Failure { error, .. } => serde_json::json!({ "error": error.to_string() }),
        }
    }
}

/// A part of a message, which can be text or a tool interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    Text(String),
    ToolCall(ToolCall),
    ToolResult(ToolResult),
}

/// A message, consisting of a role and one or more parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Message {
    /// A user message with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// A user message carrying tool results back to the model.
    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        Self {
            role: Role::User,
            parts: results.into_iter().map(Part::ToolResult).collect(),
        }
    }

    /// Get combined text content from all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract all tool calls from this message.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::ToolCall(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }
}

/// A tool definition in the form providers consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub schema: Value,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Everything needed for a model request.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub system: Option<&'a str>,
    pub messages: &'a [Message],
    pub tools: &'a [ToolSpec],
}

/// The response from a model.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub message: Message,
    pub usage: Usage,
}

/// Trait for LLM provider backends.
pub trait Backend: Send + Sync {
    fn call(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<ModelResponse, ModelError>> + Send;
}

impl<B: Backend> Backend for Arc<B> {
    fn call(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<ModelResponse, ModelError>> + Send {
        (**self).call(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_text_extraction() {
        let msg = Message {
            role: Role::Assistant,
            parts: vec![
                Part::Text("Here are ".into()),
                Part::ToolCall(ToolCall {
                    id: "1".into(),
                    name: "calculate_nutrition".into(),
                    input: Value::Null,
                }),
                Part::Text("two recipes".into()),
            ],
        };
        assert_eq!(msg.text(), "Here are two recipes");
    }

    #[test]
    fn message_tool_calls_extraction() {
        let msg = Message {
            role: Role::Assistant,
            parts: vec![
                Part::Text("Let me check".into()),
                Part::ToolCall(ToolCall {
                    id: "1".into(),
                    name: "calculate_nutrition".into(),
                    input: serde_json::json!({"ingredients": ["rice"]}),
                }),
                Part::ToolCall(ToolCall {
                    id: "2".into(),
                    name: "estimate_cooking_time".into(),
                    input: serde_json::json!({"ingredients": ["rice"]}),
                }),
            ],
        };
        let calls = msg.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "calculate_nutrition");
        assert_eq!(calls[1].name, "estimate_cooking_time");
    }

    #[test]
    fn failed_tool_result_payload_carries_error_text() {
        let call = ToolCall {
            id: "t1".into(),
            name: "missing".into(),
            input: Value::Null,
        };
        let result = ToolResult::for_call(&call, Err(ToolError::NotFound("missing".into())));
        assert!(result.is_failure());
        assert_eq!(result.tool_call_id(), "t1");
        assert_eq!(result.tool_name(), "missing");
        assert_eq!(
            result.payload(),
            serde_json::json!({"error": "tool not found: missing"})
        );
    }
}
