use crate::model::ModelError;
use recipe::OutputError;
use thiserror::Error;

/// Why a generation strategy failed.
///
/// The fallback chain consumes these; callers of the engine only see them in
/// logs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    /// The provider call failed, timed out, or returned garbage.
    #[error(transparent)]
    Provider(#[from] ModelError),

    /// The model answered but the answer was not a usable recipe set.
    #[error("unusable model output: {0}")]
    Output(#[from] OutputError),

    /// The agent hit its iteration limit without a valid final answer.
    #[error("agent exhausted {iterations} iterations without a valid answer")]
    AgentExhausted { iterations: u32 },

    /// The caller went away.
    #[error("generation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, GenerationError>;
