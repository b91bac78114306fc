//! Tool declarations, the registry, and built-in tools.

pub mod builtin;
pub mod errors;
mod host;
mod registry;
mod types;

pub use errors::ToolError;
pub use host::{Tool, ToolHost};
pub use registry::ToolRegistry;
pub use types::{ParamSpec, ParamType, ToolArguments, ToolDeclaration};
