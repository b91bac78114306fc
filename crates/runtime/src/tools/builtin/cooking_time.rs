//! Cooking time estimates.

use crate::tools::{ParamSpec, ParamType, Tool, ToolArguments, ToolDeclaration, ToolError};
use serde_json::{Value, json};

/// Base cooking minutes, in lookup order.
const BASE_MINUTES: &[(&str, u32)] = &[
    ("chicken", 25),
    ("beef", 30),
    ("pork", 25),
    ("fish", 15),
    ("salmon", 20),
    ("tuna", 10),
    ("eggs", 5),
    ("tofu", 10),
    ("rice", 20),
    ("pasta", 12),
    ("quinoa", 15),
    ("oats", 5),
    ("tomatoes", 5),
    ("onions", 8),
    ("garlic", 2),
    ("carrots", 10),
    ("broccoli", 8),
    ("spinach", 3),
    ("bell peppers", 6),
    ("mushrooms", 5),
    ("cheese", 0),
    ("parmesan", 0),
    ("milk", 0),
    ("butter", 0),
    ("olive oil", 0),
    ("salt", 0),
    ("pepper", 0),
    ("herbs", 0),
];

const UNKNOWN_MINUTES: u32 = 10;

/// `(multiplier, prep minutes)` for a complexity label.
fn factors(complexity: &str) -> (f64, u32) {
    match complexity.trim().to_lowercase().as_str() {
        "easy" => (1.0, 5),
        "medium" => (1.3, 10),
        "hard" => (1.8, 15),
        _ => (1.0, 10),
    }
}

fn base_minutes(ingredient: &str) -> u32 {
    let ingredient = ingredient.trim().to_lowercase();
    BASE_MINUTES
        .iter()
        .find(|(name, _)| ingredient.contains(name))
        .map_or(UNKNOWN_MINUTES, |(_, minutes)| *minutes)
}

/// Total minutes: the slowest ingredient scaled by complexity, plus prep.
///
/// Complexity is `easy`, `medium` or `hard`; anything else counts as an
/// unscaled recipe with ten minutes of prep.
pub fn estimate_cooking_time<S: AsRef<str>>(ingredients: &[S], complexity: &str) -> u32 {
    let slowest = ingredients
        .iter()
        .map(|i| base_minutes(i.as_ref()))
        .max()
        .unwrap_or(0);
    let (multiplier, prep) = factors(complexity);
    (f64::from(slowest) * multiplier) as u32 + prep
}

/// `estimate_cooking_time(ingredients, complexity = "medium")`.
#[derive(Debug, Clone)]
pub struct CookingTimeTool {
    declaration: ToolDeclaration,
}

impl Default for CookingTimeTool {
    fn default() -> Self {
        Self {
            declaration: ToolDeclaration {
                name: "estimate_cooking_time",
                description: "Estimate total cooking time in minutes, including prep, \
                              for a list of ingredients.",
                params: vec![
                    ParamSpec::required(
                        "ingredients",
                        ParamType::StringList,
                        "Ingredient names, one per entry",
                    ),
                    ParamSpec::optional(
                        "complexity",
                        ParamType::String,
                        "Recipe complexity: easy, medium or hard (default medium)",
                    ),
                ],
            },
        }
    }
}

impl Tool for CookingTimeTool {
    fn declaration(&self) -> &ToolDeclaration {
        &self.declaration
    }

    fn run(&self, args: &ToolArguments) -> Result<Value, ToolError> {
        let ingredients = args.string_list("ingredients");
        let complexity = args.string("complexity").unwrap_or("medium");
        let minutes = estimate_cooking_time(&ingredients, complexity);
        Ok(json!(format!("{minutes} minutes")))
    }
}
