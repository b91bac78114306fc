//! Ingredient list cleanup.

use crate::tools::{ParamSpec, ParamType, Tool, ToolArguments, ToolDeclaration, ToolError};
use serde_json::{Value, json};

/// Words containing any of these are dropped.
const NOISE: &[&str] = &[
    "cup", "cups", "tbsp", "tsp", "tablespoon", "tablespoons", "teaspoon", "teaspoons", "lb",
    "lbs", "oz", "ounce", "ounces", "pound", "pounds", "gram", "grams", "kg", "kilogram",
    "kilograms", "fresh", "dried", "chopped", "diced", "sliced", "minced", "large", "small",
    "medium", "whole", "half", "quarter",
];

fn is_noise(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit()) || NOISE.iter().any(|term| word.contains(term))
}

/// Capitalize the first letter of each whitespace-separated word.
pub(crate) fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a comma-separated list, strip quantities and preparation words, and
/// title-case what is left.
///
/// Entries that end up one character or shorter are dropped.
pub fn clean_ingredients(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|entry| {
            let entry = entry.trim().to_lowercase();
            let words: Vec<&str> = entry.split_whitespace().filter(|w| !is_noise(w)).collect();
            let cleaned = words.join(" ");
            (cleaned.chars().count() > 1).then(|| title_case(&cleaned))
        })
        .collect()
}

/// `validate_ingredients(raw_ingredients)`.
#[derive(Debug, Clone)]
pub struct IngredientsTool {
    declaration: ToolDeclaration,
}

impl Default for IngredientsTool {
    fn default() -> Self {
        Self {
            declaration: ToolDeclaration {
                name: "validate_ingredients",
                description: "Clean a comma-separated ingredient list: drop quantities, \
                              units and preparation words, return the ingredient names.",
                params: vec![ParamSpec::required(
                    "raw_ingredients",
                    ParamType::String,
                    "Comma-separated ingredients, e.g. \"2 cups rice, 1 lb chicken\"",
                )],
            },
        }
    }
}

impl Tool for IngredientsTool {
    fn declaration(&self) -> &ToolDeclaration {
        &self.declaration
    }

    fn run(&self, args: &ToolArguments) -> Result<Value, ToolError> {
        let raw = args.string("raw_ingredients").unwrap_or_default();
        let cleaned = clean_ingredients(raw);
        if cleaned.is_empty() {
            return Err(ToolError::Execution(format!(
                "no ingredient names left in '{raw}'"
            )));
        }
        Ok(json!(cleaned))
    }
}
