//! Tool declarations and argument checking.

use super::ToolError;
use crate::model::ToolSpec;
use serde_json::{Map, Value, json};

/// Type of a single tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    StringList,
}

impl ParamType {
    fn schema(self) -> Value {
        match self {
            Self::String => json!({"type": "string"}),
            Self::Integer => json!({"type": "integer"}),
            Self::Number => json!({"type": "number"}),
            Self::Boolean => json!({"type": "boolean"}),
            Self::StringList => json!({"type": "array", "items": {"type": "string"}}),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::StringList => "array of strings",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

/// One named parameter of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamType,
    pub required: bool,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind,
            required: false,
        }
    }
}

/// A tool as advertised to models: name, description, typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

impl ToolDeclaration {
    /// JSON schema for the parameter object.
    pub fn schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                let mut schema = p.kind.schema();
                schema["description"] = Value::String(p.description.to_string());
                (p.name.to_string(), schema)
            })
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Provider-facing form of this declaration.
    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.to_string(),
            description: self.description.to_string(),
            schema: self.schema(),
        }
    }

    /// Plain-text description for prompts, one line per parameter.
    pub fn describe(&self) -> String {
        let mut text = format!("- {}: {}", self.name, self.description);
        for p in &self.params {
            let presence = if p.required { "required" } else { "optional" };
            text.push_str(&format!(
                "\n    {} ({}, {}): {}",
                p.name,
                p.kind.label(),
                presence,
                p.description
            ));
        }
        text
    }

    /// Check raw model input against the declared parameters.
    ///
    /// Unknown keys are ignored. A missing required key or a value of the
    /// wrong type is an [`ToolError::InvalidInput`].
    pub fn check(&self, input: &Value) -> Result<ToolArguments, ToolError> {
        let empty = Map::new();
        let map = match input {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(ToolError::InvalidInput(format!(
                    "expected an object, got {other}"
                )));
            }
        };

        let mut args = Map::new();
        for p in &self.params {
            match map.get(p.name) {
                None | Some(Value::Null) if p.required => {
                    return Err(ToolError::InvalidInput(format!(
                        "missing required parameter '{}'",
                        p.name
                    )));
                }
                None | Some(Value::Null) => {}
                Some(value) if p.kind.accepts(value) => {
                    args.insert(p.name.to_string(), value.clone());
                }
                Some(value) => {
                    return Err(ToolError::InvalidInput(format!(
                        "'{}' must be {}, got {value}",
                        p.name,
                        p.kind.label()
                    )));
                }
            }
        }
        Ok(ToolArguments(args))
    }
}

/// Arguments that passed [`ToolDeclaration::check`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    pub fn string(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    pub fn string_list(&self, name: &str) -> Vec<String> {
        self.0
            .get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nutrition() -> ToolDeclaration {
        ToolDeclaration {
            name: "calculate_nutrition",
            description: "Estimate nutrition per serving.",
            params: vec![
                ParamSpec::required("ingredients", ParamType::StringList, "Ingredient names"),
                ParamSpec::optional("servings", ParamType::Integer, "Number of servings"),
            ],
        }
    }

    #[test]
    fn schema_lists_properties_and_required() {
        let schema = nutrition().schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["ingredients"]["type"], "array");
        assert_eq!(schema["properties"]["ingredients"]["items"]["type"], "string");
        assert_eq!(schema["properties"]["servings"]["type"], "integer");
        assert_eq!(schema["required"], json!(["ingredients"]));
    }

    #[test]
    fn describe_names_every_parameter() {
        let text = nutrition().describe();
        assert!(text.starts_with("- calculate_nutrition: "));
        assert!(text.contains("ingredients (array of strings, required)"));
        assert!(text.contains("servings (integer, optional)"));
    }

    #[test]
    fn check_accepts_valid_input() {
        let args = nutrition()
            .check(&json!({"ingredients": ["rice", "eggs"], "servings": 2, "extra": true}))
            .unwrap();
        assert_eq!(args.string_list("ingredients"), ["rice", "eggs"]);
        assert_eq!(args.integer("servings"), Some(2));
        assert_eq!(args.string("extra"), None);
    }

    #[test]
    fn check_rejects_missing_and_mistyped() {
        let decl = nutrition();
        assert!(matches!(
            decl.check(&json!({"servings": 2})),
            Err(ToolError::InvalidInput(msg)) if msg.contains("ingredients")
        ));
        assert!(matches!(
            decl.check(&json!({"ingredients": "rice"})),
            Err(ToolError::InvalidInput(_))
        ));
        assert!(matches!(
            decl.check(&json!({"ingredients": ["rice"], "servings": 2.5})),
            Err(ToolError::InvalidInput(_))
        ));
        assert!(matches!(decl.check(&json!("rice")), Err(ToolError::InvalidInput(_))));
    }
}
