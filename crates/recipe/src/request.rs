//! Generation requests.

use crate::RequestError;
use serde::Serialize;
use std::collections::HashSet;

/// A cleaned request for recipe generation.
///
/// Ingredients are trimmed, non-empty, and deduplicated case-insensitively
/// (first spelling wins, order preserved). There is always at least one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    ingredients: Vec<String>,
    dietary_restrictions: Option<String>,
}

impl GenerationRequest {
    /// Build a request from a comma-separated ingredient string.
    pub fn parse(
        ingredients: &str,
        dietary_restrictions: Option<&str>,
    ) -> Result<Self, RequestError> {
        Self::new(ingredients.split(','), dietary_restrictions)
    }

    /// Build a request from individual ingredient entries.
    pub fn new<I, S>(ingredients: I, dietary_restrictions: Option<&str>) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let ingredients: Vec<String> = ingredients
            .into_iter()
            .filter_map(|raw| {
                let item = raw.as_ref().trim();
                if item.is_empty() || !seen.insert(item.to_lowercase()) {
                    return None;
                }
                Some(item.to_string())
            })
            .collect();

        if ingredients.is_empty() {
            return Err(RequestError::EmptyIngredients);
        }

        let dietary_restrictions = dietary_restrictions
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            ingredients,
            dietary_restrictions,
        })
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn dietary_restrictions(&self) -> Option<&str> {
        self.dietary_restrictions.as_deref()
    }

    /// The first ingredient, used to name canned recipes.
    pub fn lead_ingredient(&self) -> &str {
        // Non-empty by construction.
        &self.ingredients[0]
    }

    /// Ingredients joined back into the comma-separated wire form.
    pub fn joined(&self) -> String {
        self.ingredients.join(", ")
    }
}
