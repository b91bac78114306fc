//! Schema and range checks.

use crate::{GenerationRequest, NutritionCandidate, RecipeCandidate, ValidationError};
use serde::Serialize;
use serde_json::Value;

/// Cooking time used when the model leaves it out.
pub const DEFAULT_COOKING_TIME: &str = "30 minutes";

/// Canonical recipe difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive match on the three canonical names; anything else is
    /// `Medium`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            _ => Self::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-serving nutrition. Fields the model did not supply are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Nutrition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    /// Grams, rendered like `"12g"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    /// Grams, rendered like `"60g"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<String>,
}

impl Nutrition {
    /// Build from already-computed values.
    pub fn new(calories: u32, protein_g: f64, carbs_g: f64) -> Self {
        Self {
            calories: Some(calories),
            protein: Some(grams(protein_g)),
            carbs: Some(grams(carbs_g)),
        }
    }

    fn coerce(candidate: &NutritionCandidate) -> Self {
        Self {
            calories: candidate
                .calories
                .as_ref()
                .and_then(leading_number)
                .map(|n| n.max(0.0).round() as u32),
            protein: candidate.protein.as_ref().and_then(leading_number).map(grams),
            carbs: candidate.carbs.as_ref().and_then(leading_number).map(grams),
        }
    }
}

/// A recipe that passed validation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedRecipe {
    name: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    #[serde(rename = "cookingTime")]
    cooking_time: String,
    difficulty: Difficulty,
    nutrition: Nutrition,
}

impl ValidatedRecipe {
    /// Build a recipe around a request's own ingredients.
    ///
    /// Used for locally produced recipes that never pass through a model.
    /// `name` and `instructions` must be non-empty.
    pub fn from_request(
        request: &GenerationRequest,
        name: impl Into<String>,
        instructions: &[&str],
        cooking_time: impl Into<String>,
        difficulty: Difficulty,
        nutrition: Nutrition,
    ) -> Self {
        debug_assert!(!instructions.is_empty());
        Self {
            name: name.into(),
            ingredients: request.ingredients().to_vec(),
            instructions: instructions.iter().map(|s| s.to_string()).collect(),
            cooking_time: cooking_time.into(),
            difficulty,
            nutrition,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn cooking_time(&self) -> &str {
        &self.cooking_time
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn nutrition(&self) -> &Nutrition {
        &self.nutrition
    }
}

/// Check a candidate against the recipe schema.
pub fn validate(candidate: RecipeCandidate) -> Result<ValidatedRecipe, ValidationError> {
    let name = candidate
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or(ValidationError::EmptyName)?;

    let ingredients = non_empty_entries(candidate.ingredients);
    if ingredients.is_empty() {
        return Err(ValidationError::NoIngredients(name));
    }

    let instructions = non_empty_entries(candidate.instructions);
    if instructions.is_empty() {
        return Err(ValidationError::NoInstructions(name));
    }

    let cooking_time = match candidate.cooking_time {
        Some(t) if t.chars().all(|c| c.is_ascii_digit()) => format!("{t} minutes"),
        Some(t) => t,
        None => DEFAULT_COOKING_TIME.to_string(),
    };

    let difficulty = candidate
        .difficulty
        .as_deref()
        .map(Difficulty::normalize)
        .unwrap_or_default();

    let nutrition = candidate
        .nutrition
        .as_ref()
        .map(Nutrition::coerce)
        .unwrap_or_default();

    Ok(ValidatedRecipe {
        name,
        ingredients,
        instructions,
        cooking_time,
        difficulty,
        nutrition,
    })
}

fn non_empty_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Read the number a value starts with: `450`, `"450 kcal"`, `"12.5g"`.
fn leading_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            let end = s
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
                .map_or(s.len(), |(i, _)| i);
            s[..end].parse().ok()
        }
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn grams(value: f64) -> String {
    let value = (value.max(0.0) * 10.0).round() / 10.0;
    if value.fract() == 0.0 {
        format!("{value:.0}g")
    } else {
        format!("{value:.1}g")
    }
}
