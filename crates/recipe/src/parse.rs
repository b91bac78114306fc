//! Locating and decoding recipe payloads in model output.

use crate::{OutputError, ParseError, RecipeCandidate, RecipeSet, validate};
use serde_json::Value;

/// Parse raw model text into recipe candidates.
///
/// The payload may be surrounded by prose or wrapped in a fenced code block.
/// Accepted shapes: an array of recipes, `{"recipes": [...]}`, or a single
/// recipe object. Structured spans that hold no recipe, such as a bracketed
/// `[2]` in the prose, are skipped.
pub fn parse(text: &str) -> Result<Vec<RecipeCandidate>, ParseError> {
    let mut first_error = None;
    for payload in payloads(text) {
        match candidates_in(payload) {
            Ok(candidates) => return Ok(candidates),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    Err(first_error.unwrap_or(ParseError::NoPayload))
}

fn candidates_in(payload: Value) -> Result<Vec<RecipeCandidate>, ParseError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("recipes") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ParseError::UnexpectedShape(format!(
                    "`recipes` is {}",
                    kind(&other)
                )));
            }
            None => vec![Value::Object(map)],
        },
        other => return Err(ParseError::UnexpectedShape(kind(&other).to_string())),
    };

    let candidates: Vec<_> = items
        .into_iter()
        .filter_map(RecipeCandidate::from_value)
        .filter(|c| *c != RecipeCandidate::default())
        .collect();

    if candidates.is_empty() {
        return Err(ParseError::UnexpectedShape("no recipe objects".into()));
    }
    Ok(candidates)
}

/// Parse and validate model text into a 2-3 recipe set.
///
/// Candidates that fail validation are dropped individually; the set is
/// rejected only if fewer than two survive.
pub fn read_recipes(text: &str) -> Result<RecipeSet, OutputError> {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();

    for candidate in parse(text)? {
        match validate(candidate) {
            Ok(recipe) => valid.push(recipe),
            Err(e) => {
                tracing::debug!(error = %e, "dropping invalid recipe candidate");
                rejected.push(e);
            }
        }
    }

    let count = valid.len();
    RecipeSet::new(valid).ok_or(OutputError::InsufficientRecipes {
        valid: count,
        rejected,
    })
}

/// Structured values in `text`, most likely payload first.
///
/// Yields, in order: the whole text, each fenced code block, then every
/// balanced `[...]` / `{...}` span from left to right. Only spans that decode
/// as a JSON array or object are yielded.
fn payloads(text: &str) -> impl Iterator<Item = Value> + '_ {
    let trimmed = text.trim();
    let spans = trimmed
        .char_indices()
        .filter(|&(_, c)| c == '[' || c == '{')
        .filter_map(move |(start, _)| balanced_span(&trimmed[start..]));

    std::iter::once(trimmed)
        .chain(fenced_blocks(trimmed))
        .chain(spans)
        .filter_map(decode_structured)
}

fn decode_structured(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => Some(value),
        _ => None,
    }
}

/// Bodies of ``` fenced blocks, with any language tag removed.
fn fenced_blocks(text: &str) -> impl Iterator<Item = &str> {
    text.split("```")
        .skip(1)
        .step_by(2)
        .map(|block| match block.split_once('\n') {
            Some((tag, body)) if !tag.trim().contains(['{', '[']) => body,
            _ => block,
        })
}

/// The shortest prefix of `text` whose opening bracket is balanced,
/// ignoring brackets inside JSON strings.
fn balanced_span(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
