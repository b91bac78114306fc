//! LLM protocol types and backend trait.

mod call;
pub mod errors;
pub mod types;

pub(crate) use call::call_model;
pub use errors::ModelError;
pub use types::{
    Backend, Message, ModelRequest, ModelResponse, Part, Role, ToolCall, ToolResult, ToolSpec,
    Usage,
};
