//! Per-serving nutrition estimates from a fixed reference table.

use crate::tools::{ParamSpec, ParamType, Tool, ToolArguments, ToolDeclaration, ToolError};
use recipe::Nutrition;
use serde_json::{Value, json};

/// Servings assumed when the caller does not say.
pub const DEFAULT_SERVINGS: u32 = 4;

/// Nutrition per 100g of one ingredient.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Per100g {
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

const fn per_100g(calories: f64, protein: f64, carbs: f64, fat: f64) -> Per100g {
    Per100g {
        calories,
        protein,
        carbs,
        fat,
    }
}

/// Reference values, in lookup order for partial matches.
const TABLE: &[(&str, Per100g)] = &[
    ("chicken", per_100g(165.0, 31.0, 0.0, 3.6)),
    ("beef", per_100g(250.0, 26.0, 0.0, 15.0)),
    ("pork", per_100g(242.0, 27.0, 0.0, 14.0)),
    ("fish", per_100g(206.0, 22.0, 0.0, 12.0)),
    ("salmon", per_100g(208.0, 20.0, 0.0, 13.0)),
    ("tuna", per_100g(132.0, 28.0, 0.0, 1.0)),
    ("eggs", per_100g(155.0, 13.0, 1.0, 11.0)),
    ("tofu", per_100g(76.0, 8.0, 2.0, 5.0)),
    ("rice", per_100g(130.0, 3.0, 28.0, 0.3)),
    ("pasta", per_100g(131.0, 5.0, 25.0, 1.1)),
    ("bread", per_100g(265.0, 9.0, 49.0, 3.2)),
    ("quinoa", per_100g(222.0, 8.0, 39.0, 3.6)),
    ("oats", per_100g(389.0, 17.0, 66.0, 7.0)),
    ("tomatoes", per_100g(18.0, 0.9, 3.9, 0.2)),
    ("onions", per_100g(40.0, 1.1, 9.3, 0.1)),
    ("garlic", per_100g(149.0, 6.4, 33.0, 0.5)),
    ("carrots", per_100g(41.0, 0.9, 10.0, 0.2)),
    ("broccoli", per_100g(34.0, 2.8, 7.0, 0.4)),
    ("spinach", per_100g(23.0, 2.9, 3.6, 0.4)),
    ("bell peppers", per_100g(31.0, 1.0, 7.0, 0.3)),
    ("mushrooms", per_100g(22.0, 3.1, 3.3, 0.3)),
    ("cheese", per_100g(113.0, 7.0, 1.0, 9.0)),
    ("parmesan", per_100g(110.0, 10.0, 1.0, 7.0)),
    ("milk", per_100g(42.0, 3.4, 5.0, 1.0)),
    ("butter", per_100g(717.0, 0.9, 0.1, 81.0)),
    ("yogurt", per_100g(59.0, 10.0, 3.6, 0.4)),
    ("olive oil", per_100g(884.0, 0.0, 0.0, 100.0)),
    ("coconut oil", per_100g(862.0, 0.0, 0.0, 100.0)),
    ("salt", per_100g(0.0, 0.0, 0.0, 0.0)),
    ("pepper", per_100g(251.0, 10.0, 64.0, 3.0)),
    ("basil", per_100g(22.0, 3.2, 2.6, 0.6)),
    ("oregano", per_100g(265.0, 9.0, 69.0, 4.3)),
    ("thyme", per_100g(101.0, 5.6, 24.0, 1.7)),
    ("parsley", per_100g(36.0, 3.0, 6.0, 0.8)),
];

const UNKNOWN: Per100g = per_100g(50.0, 2.0, 8.0, 1.0);

/// Exact name first, then the first entry that contains or is contained in
/// the ingredient.
fn lookup(ingredient: &str) -> Per100g {
    if let Some((_, values)) = TABLE.iter().find(|(name, _)| *name == ingredient) {
        return *values;
    }
    TABLE
        .iter()
        .find(|(name, _)| ingredient.contains(name) || name.contains(ingredient))
        .map_or(UNKNOWN, |(_, values)| *values)
}

/// Nutrition for one serving, assuming 100g of each ingredient overall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutritionEstimate {
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub servings: u32,
}

impl NutritionEstimate {
    /// The subset carried on recipes.
    pub fn nutrition(&self) -> Nutrition {
        Nutrition::new(self.calories, self.protein, self.carbs)
    }

    fn to_json(self) -> Value {
        json!({
            "calories": self.calories,
            "protein": format!("{:.1}g", self.protein),
            "carbs": format!("{:.1}g", self.carbs),
            "fat": format!("{:.1}g", self.fat),
            "servings": self.servings,
        })
    }
}

/// Sum table values over `ingredients` and divide by `servings`.
///
/// Blank entries are skipped. `servings` below one is treated as one.
pub fn calculate_nutrition<S: AsRef<str>>(ingredients: &[S], servings: u32) -> NutritionEstimate {
    let servings = servings.max(1);
    let total = ingredients
        .iter()
        .map(|i| i.as_ref().trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .map(|i| lookup(&i))
        .fold(per_100g(0.0, 0.0, 0.0, 0.0), |acc, v| {
            per_100g(
                acc.calories + v.calories,
                acc.protein + v.protein,
                acc.carbs + v.carbs,
                acc.fat + v.fat,
            )
        });

    let share = f64::from(servings);
    let one_decimal = |v: f64| (v / share * 10.0).round() / 10.0;
    NutritionEstimate {
        calories: (total.calories / share).round() as u32,
        protein: one_decimal(total.protein),
        carbs: one_decimal(total.carbs),
        fat: one_decimal(total.fat),
        servings,
    }
}

/// `calculate_nutrition(ingredients, servings = 4)`.
#[derive(Debug, Clone)]
pub struct NutritionTool {
    declaration: ToolDeclaration,
}

impl Default for NutritionTool {
    fn default() -> Self {
        Self {
            declaration: ToolDeclaration {
                name: "calculate_nutrition",
                description: "Estimate calories, protein, carbs and fat per serving for a \
                              list of ingredients, assuming about 100g of each.",
                params: vec![
                    ParamSpec::required(
                        "ingredients",
                        ParamType::StringList,
                        "Ingredient names, one per entry",
                    ),
                    ParamSpec::optional(
                        "servings",
                        ParamType::Integer,
                        "Number of servings the recipe makes (default 4)",
                    ),
                ],
            },
        }
    }
}

impl Tool for NutritionTool {
    fn declaration(&self) -> &ToolDeclaration {
        &self.declaration
    }

    fn run(&self, args: &ToolArguments) -> Result<Value, ToolError> {
        let servings = match args.integer("servings") {
            None => DEFAULT_SERVINGS,
            Some(n) if n >= 1 => u32::try_from(n)
                .map_err(|_| ToolError::InvalidInput(format!("servings out of range: {n}")))?,
            Some(n) => {
                return Err(ToolError::InvalidInput(format!(
                    "servings must be at least 1, got {n}"
                )));
            }
        };
        let ingredients = args.string_list("ingredients");
        Ok(calculate_nutrition(&ingredients, servings).to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_partial_matches() {
        assert_eq!(lookup("chicken"), TABLE[0].1);
        assert_eq!(lookup("chicken breast"), TABLE[0].1);
        assert_eq!(lookup("parmesan cheese"), lookup("cheese"));
        assert_eq!(lookup("dragonfruit"), UNKNOWN);
    }

    #[test]
    fn chicken_and_rice_for_four() {
        let estimate = calculate_nutrition(&["Chicken", "rice"], DEFAULT_SERVINGS);
        // (165 + 130) / 4 = 73.75
        assert_eq!(estimate.calories, 74);
        assert_eq!(estimate.protein, 8.5);
        assert_eq!(estimate.carbs, 7.0);
        assert_eq!(estimate.fat, 1.0);
        assert_eq!(estimate.servings, 4);
    }

    #[test]
    fn tool_output_shape() {
        let tool = NutritionTool::default();
        let args = tool
            .declaration()
            .check(&json!({"ingredients": ["pasta", "garlic"], "servings": 2}))
            .unwrap();
        let output = tool.run(&args).unwrap();
        assert_eq!(
            output,
            json!({
                "calories": 140,
                "protein": "5.7g",
                "carbs": "29.0g",
                "fat": "0.8g",
                "servings": 2,
            })
        );
    }

    #[test]
    fn zero_servings_is_invalid() {
        let tool = NutritionTool::default();
        let args = tool
            .declaration()
            .check(&json!({"ingredients": ["rice"], "servings": 0}))
            .unwrap();
        assert!(matches!(tool.run(&args), Err(ToolError::InvalidInput(_))));
    }

    #[test]
    fn estimate_converts_to_recipe_nutrition() {
        let nutrition = calculate_nutrition(&["tofu", "broccoli"], 2).nutrition();
        assert_eq!(nutrition.calories, Some(55));
        assert_eq!(nutrition.protein.as_deref(), Some("5.4g"));
        assert_eq!(nutrition.carbs.as_deref(), Some("4.5g"));
    }
}
