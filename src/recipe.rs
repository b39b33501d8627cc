use serde::{Deserialize, Serialize};

use crate::recipe_normalizer::synthesize_instructions;

/// Canonical recipe record shared by search results, the fallback catalog
/// and the favorites store.
///
/// `is_saved` is a view annotation. It is recomputed from favorites-store
/// membership on every search and must never be treated as the source of
/// truth for whether a recipe is saved.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub ready_in_minutes: u32,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub is_saved: bool,
}

fn default_servings() -> u32 {
    1
}

impl Recipe {
    /// Instructions to show for this recipe. Falls back to a generic
    /// sequence derived from the ingredient list when the source carried
    /// no steps.
    pub fn display_instructions(&self) -> Vec<String> {
        if self.instructions.is_empty() {
            synthesize_instructions(&self.ingredients)
        } else {
            self.instructions.clone()
        }
    }
}

/// Optional upper/lower bounds applied by [`filter_recipes`]. A `None`
/// bound is unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecipeFilter {
    pub max_time: Option<u32>,
    pub max_calories: Option<f64>,
    pub min_servings: Option<u32>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.max_time.map_or(true, |max| recipe.ready_in_minutes <= max)
            && self.max_calories.map_or(true, |max| recipe.calories <= max)
            && self.min_servings.map_or(true, |min| recipe.servings >= min)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.max_time.is_none() && self.max_calories.is_none() && self.min_servings.is_none()
    }
}

pub fn filter_recipes(recipes: &[Recipe], filter: &RecipeFilter) -> Vec<Recipe> {
    recipes
        .iter()
        .filter(|recipe| filter.matches(recipe))
        .cloned()
        .collect()
}
