//! Prompt framing for "ingredients → recipes".

use crate::tools::ToolDeclaration;
use recipe::{GenerationRequest, MAX_RECIPES, MIN_RECIPES, OutputError};
use std::fmt::Write;

/// A named field of the task, with the hint shown to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub hint: &'static str,
}

/// Declarative input/output contract for recipe generation.
///
/// Every prompt the engine sends is rendered from this one definition, so
/// the direct and agentic paths ask for exactly the same output shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSignature {
    pub task: &'static str,
    pub inputs: [Field; 2],
    pub output: Field,
    pub schema: &'static str,
}

const RECIPE_SCHEMA: &str = r#"[
  {
    "name": "Recipe name",
    "ingredients": ["ingredient", "..."],
    "instructions": ["Step one", "..."],
    "cookingTime": "25 minutes",
    "difficulty": "Easy | Medium | Hard",
    "nutrition": {"calories": 450, "protein": "12g", "carbs": "60g"}
  }
]"#;

impl Default for RecipeSignature {
    fn default() -> Self {
        Self {
            task: "Generate creative, practical recipes from a list of available ingredients, \
                   with nutritional information per serving.",
            inputs: [
                Field {
                    name: "Ingredients",
                    hint: "comma-separated ingredients the cook has",
                },
                Field {
                    name: "Dietary restrictions",
                    hint: "restrictions every recipe must respect",
                },
            ],
            output: Field {
                name: "Recipes",
                hint: "a JSON array of recipe objects",
            },
            schema: RECIPE_SCHEMA,
        }
    }
}

impl RecipeSignature {
    /// System prompt shared by every call.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are an expert chef and nutritionist. {} Always answer with valid JSON \
             in the exact schema you are given.",
            self.task
        )
    }

    /// Prompt for a single-call generation.
    pub fn render(&self, request: &GenerationRequest) -> String {
        let mut prompt = self.frame(request);
        self.push_output_rules(&mut prompt, request);
        prompt
    }

    /// Prompt for the tool-using agent: the direct prompt plus the tool
    /// catalogue and how to use it.
    pub fn render_agentic(&self, request: &GenerationRequest, tools: &[ToolDeclaration]) -> String {
        let mut prompt = self.frame(request);

        prompt.push_str("\nYou can call these tools:\n");
        for tool in tools {
            prompt.push_str(&tool.describe());
            prompt.push('\n');
        }
        if tools.iter().any(|t| t.name == "calculate_nutrition") {
            prompt.push_str(
                "\nBefore giving your final answer, call calculate_nutrition with each \
                 recipe's ingredients and use its numbers in the nutrition field.\n",
            );
        }

        self.push_output_rules(&mut prompt, request);
        prompt.push_str("When you are done calling tools, reply with only the JSON array.\n");
        prompt
    }

    /// Follow-up sent when a final answer could not be used.
    pub fn corrective(&self, error: &OutputError) -> String {
        format!(
            "Your last answer could not be used: {error}. Reply again with only a JSON \
             array of {MIN_RECIPES} to {MAX_RECIPES} recipes matching this schema:\n{}",
            self.schema
        )
    }

    fn frame(&self, request: &GenerationRequest) -> String {
        let [ingredients, dietary] = &self.inputs;
        let mut prompt = format!("{}\n\n---\n", self.task);
        // Infallible for String.
        let _ = writeln!(prompt, "{}: {}", ingredients.name, request.joined());
        let _ = writeln!(
            prompt,
            "{}: {}",
            dietary.name,
            request.dietary_restrictions().unwrap_or("none")
        );
        prompt.push_str("---\n");
        prompt
    }

    fn push_output_rules(&self, prompt: &mut String, request: &GenerationRequest) {
        let _ = write!(
            prompt,
            "\n{}: {} with {MIN_RECIPES} to {MAX_RECIPES} entries, exactly in this schema:\n{}\n\n\
             Rules:\n\
             - Build every recipe around the listed ingredients; each recipe's ingredients \
             must include \"{}\".\n\
             - difficulty is one of Easy, Medium, Hard.\n\
             - protein and carbs are grams per serving written like \"12g\".\n",
            self.output.name,
            self.output.hint,
            self.schema,
            request.lead_ingredient(),
        );
        if let Some(restriction) = request.dietary_restrictions() {
            let _ = writeln!(prompt, "- Every recipe must be {restriction}.");
        }
    }
}

/// Contract for adapting one finished recipe to dietary restrictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementSignature {
    pub task: &'static str,
    pub inputs: [Field; 2],
    pub output: Field,
}

impl Default for EnhancementSignature {
    fn default() -> Self {
        Self {
            task: "Adapt a recipe to dietary restrictions, substituting ingredients where \
                   needed and keeping the rest of the recipe as it is.",
            inputs: [
                Field {
                    name: "Recipe",
                    hint: "the original recipe as JSON",
                },
                Field {
                    name: "Dietary restrictions",
                    hint: "restrictions the adapted recipe must respect",
                },
            ],
            output: Field {
                name: "Enhanced recipe",
                hint: "one JSON recipe object",
            },
        }
    }
}

impl EnhancementSignature {
    pub fn system_prompt(&self) -> String {
        format!(
            "You are an expert chef and nutritionist. {} Always answer with valid JSON.",
            self.task
        )
    }

    /// Prompt for adapting `recipe`, already encoded as JSON.
    pub fn render(&self, recipe: &str, restrictions: &str) -> String {
        let [original, dietary] = &self.inputs;
        let mut prompt = format!("{}\n\n---\n", self.task);
        let _ = writeln!(prompt, "{}: {recipe}", original.name);
        let _ = writeln!(prompt, "{}: {restrictions}", dietary.name);
        let _ = write!(
            prompt,
            "---\n\n{}: {} with the same fields as the original. Keep the name unless a \
             substitution changes the dish, and recompute nutrition if ingredients change. \
             Reply with only the JSON object.\n",
            self.output.name, self.output.hint,
        );
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;

    fn request(dietary: Option<&str>) -> GenerationRequest {
        GenerationRequest::parse("chicken, rice, tomatoes", dietary).unwrap()
    }

    #[test]
    fn render_embeds_request() {
        let prompt = RecipeSignature::default().render(&request(Some("gluten-free")));
        assert!(prompt.contains("Ingredients: chicken, rice, tomatoes\n"));
        assert!(prompt.contains("Dietary restrictions: gluten-free\n"));
        assert!(prompt.contains("- Every recipe must be gluten-free."));
        assert!(prompt.contains("2 to 3 entries"));
        assert!(prompt.contains("\"cookingTime\""));
        assert!(prompt.contains("must include \"chicken\""));
    }

    #[test]
    fn render_is_deterministic() {
        let signature = RecipeSignature::default();
        assert_eq!(signature.render(&request(None)), signature.render(&request(None)));
        assert!(signature.render(&request(None)).contains("Dietary restrictions: none"));
    }

    #[test]
    fn agentic_prompt_lists_tools() {
        let registry = ToolRegistry::builtin();
        let prompt = RecipeSignature::default().render_agentic(&request(None), registry.list());
        for decl in registry.list() {
            assert!(prompt.contains(&decl.describe()));
        }
        assert!(prompt.contains("call calculate_nutrition"));
        assert!(prompt.ends_with("reply with only the JSON array.\n"));
    }

    #[test]
    fn corrective_names_the_problem() {
        let error = OutputError::InsufficientRecipes {
            valid: 1,
            rejected: Vec::new(),
        };
        let text = RecipeSignature::default().corrective(&error);
        assert!(text.contains("expected 2-3 valid recipes, got 1"));
        assert!(text.contains("\"instructions\""));
    }

    #[test]
    fn enhancement_prompt_embeds_recipe_and_restrictions() {
        let signature = EnhancementSignature::default();
        let prompt = signature.render(r#"{"name":"Chicken Rice"}"#, "vegan");
        assert!(prompt.contains("Recipe: {\"name\":\"Chicken Rice\"}\n"));
        assert!(prompt.contains("Dietary restrictions: vegan\n"));
        assert!(prompt.ends_with("Reply with only the JSON object.\n"));
        assert!(signature.system_prompt().contains("substituting ingredients"));
    }
}
