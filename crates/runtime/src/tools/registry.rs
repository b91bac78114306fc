//! Named tool lookup and invocation.

use super::builtin::{CookingTimeTool, IngredientsTool, NutritionTool};
use super::{Tool, ToolDeclaration, ToolError, ToolHost};
use crate::model::{ToolCall, ToolSpec};
use serde_json::Value;
use std::fmt;

/// Tools keyed by name. Names are unique; registering a tool under an
/// existing name replaces the old one.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    declarations: Vec<ToolDeclaration>,
    specs: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the nutrition, cooking-time and ingredient tools.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(NutritionTool::default());
        registry.register(CookingTimeTool::default());
        registry.register(IngredientsTool::default());
        registry
    }

    /// Add a tool, returning the one it replaced.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Option<Box<dyn Tool>> {
        let name = tool.declaration().name;
        let tool: Box<dyn Tool> = Box::new(tool);
        let replaced = match self.position(name) {
            Some(index) => Some(std::mem::replace(&mut self.tools[index], tool)),
            None => {
                self.tools.push(tool);
                None
            }
        };
        self.declarations = self.tools.iter().map(|t| t.declaration().clone()).collect();
        self.specs = self.declarations.iter().map(ToolDeclaration::spec).collect();
        replaced
    }

    /// Declarations in registration order.
    pub fn list(&self) -> &[ToolDeclaration] {
        &self.declarations
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.position(name).map(|index| self.tools[index].as_ref())
    }

    /// Look up `name`, check `input` against its declaration, and run it.
    pub fn invoke(&self, name: &str, input: &Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        let args = tool.declaration().check(input)?;
        tool.run(&args)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tools.iter().position(|t| t.declaration().name == name)
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.declarations.iter().map(|d| d.name))
            .finish()
    }
}

impl ToolHost for ToolRegistry {
    fn declarations(&self) -> &[ToolDeclaration] {
        self.list()
    }

    fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        tracing::debug!(tool = %call.name, id = %call.id, "executing tool");
        self.invoke(&call.name, &call.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ParamSpec, ParamType, ToolArguments};
    use serde_json::json;

    struct Echo(ToolDeclaration);

    impl Echo {
        fn named(name: &'static str) -> Self {
            Self(ToolDeclaration {
                name,
                description: "Echo the text back.",
                params: vec![ParamSpec::required("text", ParamType::String, "Text")],
            })
        }
    }

    impl Tool for Echo {
        fn declaration(&self) -> &ToolDeclaration {
            &self.0
        }

        fn run(&self, args: &ToolArguments) -> Result<Value, ToolError> {
            Ok(json!(args.string("text")))
        }
    }

    #[test]
    fn builtin_tools_are_listed_in_order() {
        let registry = ToolRegistry::builtin();
        let names: Vec<_> = registry.list().iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            ["calculate_nutrition", "estimate_cooking_time", "validate_ingredients"]
        );
        assert_eq!(registry.specs().len(), 3);
        assert_eq!(registry.specs()[0].schema["required"], json!(["ingredients"]));
    }

    #[test]
    fn invoke_dispatches_by_name() {
        let registry = ToolRegistry::builtin();
        let output = registry
            .invoke("estimate_cooking_time", &json!({"ingredients": ["eggs"], "complexity": "easy"}))
            .unwrap();
        assert_eq!(output, json!("10 minutes"));
    }

    #[test]
    fn unknown_tool_and_bad_arguments_are_errors() {
        let registry = ToolRegistry::builtin();
        assert_eq!(
            registry.invoke("search_web", &json!({})),
            Err(ToolError::NotFound("search_web".into()))
        );
        assert!(matches!(
            registry.invoke("calculate_nutrition", &json!({"servings": 2})),
            Err(ToolError::InvalidInput(_))
        ));
    }

    #[test]
    fn registering_same_name_replaces() {
        let mut registry = ToolRegistry::new();
        assert!(registry.register(Echo::named("echo")).is_none());
        assert!(registry.register(Echo::named("echo")).is_some());
        registry.register(Echo::named("other"));
        assert_eq!(registry.list().len(), 2);
        assert_eq!(format!("{registry:?}"), r#"["echo", "other"]"#);
    }

    #[tokio::test]
    async fn host_execute_matches_invoke() {
        let registry = ToolRegistry::builtin();
        let call = ToolCall {
            id: "c1".into(),
            name: "validate_ingredients".into(),
            input: json!({"raw_ingredients": "2 cups rice"}),
        };
        assert_eq!(registry.execute(&call).await.unwrap(), json!(["Rice"]));
    }
}
