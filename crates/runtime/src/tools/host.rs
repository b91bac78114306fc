//! Tool and tool host traits.

use super::{ToolArguments, ToolDeclaration, ToolError};
use crate::model::{ToolCall, ToolSpec};
use serde_json::Value;
use std::future::Future;

/// A single named capability the model may invoke.
///
/// Tools are deterministic and side-effect free; they run inline on the
/// calling task.
pub trait Tool: Send + Sync {
    fn declaration(&self) -> &ToolDeclaration;

    /// Run with arguments already checked against [`Tool::declaration`].
    fn run(&self, args: &ToolArguments) -> Result<Value, ToolError>;
}

/// Trait for tool execution hosts.
///
/// Implementations provide tool declarations and execute tool calls.
/// This is the boundary between the agent loop and tool code.
pub trait ToolHost: Send + Sync {
    /// Declarations, for rendering into prompts.
    fn declarations(&self) -> &[ToolDeclaration];

    /// Provider-facing tool specifications.
    fn specs(&self) -> &[ToolSpec];

    /// Execute a tool call.
    fn execute(&self, call: &ToolCall) -> impl Future<Output = Result<Value, ToolError>> + Send;
}
