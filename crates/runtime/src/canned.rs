//! Last-resort recipes built without a model.

use crate::tools::builtin::{
    DEFAULT_SERVINGS, calculate_nutrition, estimate_cooking_time, title_case,
};
use recipe::{Difficulty, GenerationRequest, RecipeSet, ValidatedRecipe};

const SKILLET_STEPS: &[&str] = &[
    "Prepare and chop all ingredients",
    "Heat a large pan over medium heat with a little oil",
    "Cook the ingredients, starting with the ones that take longest",
    "Season to taste and serve hot",
];

const BAKE_STEPS: &[&str] = &[
    "Preheat the oven to 200°C (400°F)",
    "Prepare and chop all ingredients",
    "Combine everything in a baking dish and season well",
    "Bake until cooked through and golden, then serve",
];

/// Two generic recipes around the request's own ingredients.
///
/// Nutrition and cooking times come from the built-in tools, so the result
/// is deterministic for a given request.
pub fn canned_recipes(request: &GenerationRequest) -> RecipeSet {
    let lead = title_case(request.lead_ingredient());
    let ingredients = request.ingredients();
    let nutrition = calculate_nutrition(ingredients, DEFAULT_SERVINGS).nutrition();

    let skillet = ValidatedRecipe::from_request(
        request,
        format!("Simple {lead} Skillet"),
        SKILLET_STEPS,
        format!("{} minutes", estimate_cooking_time(ingredients, "easy")),
        Difficulty::Easy,
        nutrition.clone(),
    );
    let bake = ValidatedRecipe::from_request(
        request,
        format!("Rustic {lead} Bake"),
        BAKE_STEPS,
        format!("{} minutes", estimate_cooking_time(ingredients, "medium")),
        Difficulty::Medium,
        nutrition,
    );

    RecipeSet::pair(skillet, bake)
}
