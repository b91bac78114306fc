//! Parsed but unvalidated recipes.
//!
//! Models do not reliably follow the requested schema, so every field is
//! deserialized leniently: wrong types degrade to "absent" instead of failing
//! the whole payload. Whether the result is usable is decided later by
//! [`validate`](crate::validate).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A recipe as the model wrote it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecipeCandidate {
    #[serde(deserialize_with = "loose_text")]
    pub name: Option<String>,

    #[serde(deserialize_with = "ingredient_list")]
    pub ingredients: Vec<String>,

    #[serde(alias = "steps", deserialize_with = "step_list")]
    pub instructions: Vec<String>,

    #[serde(
        rename = "cookingTime",
        alias = "cooking_time",
        deserialize_with = "loose_text"
    )]
    pub cooking_time: Option<String>,

    #[serde(deserialize_with = "loose_text")]
    pub difficulty: Option<String>,

    #[serde(deserialize_with = "nutrition_object")]
    pub nutrition: Option<NutritionCandidate>,
}

/// Nutrition values exactly as written; coerced during validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NutritionCandidate {
    pub calories: Option<Value>,
    pub protein: Option<Value>,
    pub carbs: Option<Value>,
}

impl RecipeCandidate {
    /// Decode a candidate from a JSON value.
    ///
    /// Returns `None` for anything that is not a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn loose_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(text_of(&value))
}

fn ingredient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(list_item).collect(),
        Value::String(s) => s
            .split([',', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

fn step_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Array(items) => items
            .iter()
            .filter_map(list_item)
            .map(|s| strip_numbering(&s).to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .lines()
            .map(strip_numbering)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

/// Accept strings and numbers, plus objects that wrap their text in a
/// `name`, `item` or `text` field.
fn list_item(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => ["name", "item", "text"]
            .iter()
            .find_map(|key| map.get(*key).and_then(text_of)),
        other => text_of(other),
    }
}

/// Drop a leading "1." / "2)" / "-" marker from a step.
fn strip_numbering(line: &str) -> &str {
    let line = line.trim();
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() < line.len() {
        if let Some(stripped) = rest.strip_prefix(['.', ')']) {
            return stripped.trim_start();
        }
    }
    line.strip_prefix(['-', '*']).map_or(line, str::trim_start)
}

fn nutrition_object<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<NutritionCandidate>, D::Error> {
    let value = Value::deserialize(d)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
