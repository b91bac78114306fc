//! Recipe error types.

use thiserror::Error;

/// A request was rejected before generation started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RequestError {
    /// No usable ingredient remained after trimming and deduplication.
    #[error("ingredients cannot be empty")]
    EmptyIngredients,
}

/// Model output did not contain a usable recipe payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// No JSON array or object could be located in the text.
    #[error("no structured payload found in model output")]
    NoPayload,

    /// A payload was found but it is not a recipe, a recipe list, or a
    /// `{"recipes": [...]}` wrapper.
    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),
}

/// A single candidate failed schema checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("recipe name is empty")]
    EmptyName,

    #[error("recipe '{0}' has no ingredients")]
    NoIngredients(String),

    #[error("recipe '{0}' has no instructions")]
    NoInstructions(String),
}

/// Failure to turn raw model output into a usable recipe set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum OutputError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Fewer than two candidates survived validation.
    ///
    /// `rejected` holds the reason each dropped candidate failed.
    #[error("expected 2-3 valid recipes, got {valid} ({} rejected)", rejected.len())]
    InsufficientRecipes {
        valid: usize,
        rejected: Vec<ValidationError>,
    },
}
