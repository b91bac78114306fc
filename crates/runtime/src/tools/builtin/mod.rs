//! Deterministic tools shipped with the engine.

mod cooking_time;
mod ingredients;
mod nutrition;

pub use cooking_time::{CookingTimeTool, estimate_cooking_time};
pub use ingredients::{IngredientsTool, clean_ingredients};
pub(crate) use ingredients::title_case;
pub use nutrition::{DEFAULT_SERVINGS, NutritionEstimate, NutritionTool, calculate_nutrition};
