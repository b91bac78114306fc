//! Recipe data model and model-output validation.
//!
//! This crate holds everything about recipes that does not touch the network:
//! the cleaned [`GenerationRequest`], the lenient [`RecipeCandidate`] decoded
//! from model text, the strict [`ValidatedRecipe`], and the [`RecipeSet`] that
//! guarantees a result carries two or three of them.
//!
//! # Overview
//!
//! Model output goes through two stages:
//!
//! 1. **Parse** — [`parse`] locates a JSON payload inside free-form text
//!    (prose, code fences, wrapper objects) and decodes candidates.
//! 2. **Validate** — [`validate`] checks one candidate: non-empty name,
//!    ingredients and steps, canonical [`Difficulty`], non-negative
//!    [`Nutrition`].
//!
//! [`read_recipes`] runs both and enforces the 2-3 recipe bound.
//!
//! # Example
//!
//! ```
//! use recipe::{GenerationRequest, read_recipes};
//!
//! let request = GenerationRequest::parse("pasta, garlic, butter", None)?;
//! assert_eq!(request.ingredients().len(), 3);
//!
//! let text = r#"Here are two ideas:
//! [{"name": "Garlic Pasta", "ingredients": ["pasta", "garlic"], "instructions": ["Boil", "Toss"]},
//!  {"name": "Buttered Noodles", "ingredients": ["pasta", "butter"], "instructions": ["Boil", "Butter"]}]"#;
//! let recipes = read_recipes(text).unwrap();
//! assert_eq!(recipes.len(), 2);
//! # Ok::<(), recipe::RequestError>(())
//! ```

mod candidate;
mod error;
mod parse;
mod request;
mod set;
mod validate;

pub use candidate::{NutritionCandidate, RecipeCandidate};
pub use error::{OutputError, ParseError, RequestError, ValidationError};
pub use parse::{parse, read_recipes};
pub use request::GenerationRequest;
pub use set::{MAX_RECIPES, MIN_RECIPES, RecipeSet};
pub use validate::{DEFAULT_COOKING_TIME, Difficulty, Nutrition, ValidatedRecipe, validate};
