//! Bounded recipe collections.

use crate::ValidatedRecipe;
use serde::Serialize;

/// Fewest recipes a result may carry.
pub const MIN_RECIPES: usize = 2;
/// Most recipes a result may carry.
pub const MAX_RECIPES: usize = 3;

/// Two or three validated recipes, in the order they were produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecipeSet(Vec<ValidatedRecipe>);

impl RecipeSet {
    /// Keep the first three recipes; `None` if there are fewer than two.
    pub fn new(mut recipes: Vec<ValidatedRecipe>) -> Option<Self> {
        if recipes.len() < MIN_RECIPES {
            return None;
        }
        recipes.truncate(MAX_RECIPES);
        Some(Self(recipes))
    }

    /// A set of exactly two recipes.
    pub fn pair(first: ValidatedRecipe, second: ValidatedRecipe) -> Self {
        Self(vec![first, second])
    }

    pub fn recipes(&self) -> &[ValidatedRecipe] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<ValidatedRecipe> {
        self.0
    }
}

impl<'a> IntoIterator for &'a RecipeSet {
    type Item = &'a ValidatedRecipe;
    type IntoIter = std::slice::Iter<'a, ValidatedRecipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
