use serde::{Deserialize, Serialize};

use crate::recipe::Recipe;

pub fn total_calories(recipes: &[Recipe]) -> f64 {
    recipes.iter().map(|r| r.calories).sum()
}

pub fn total_servings(recipes: &[Recipe]) -> u64 {
    recipes.iter().map(|r| u64::from(r.servings)).sum()
}

/// Calories per serving across the whole collection; 0.0 when there are no
/// servings to divide by.
pub fn average_calories_per_serving(recipes: &[Recipe]) -> f64 {
    let servings = total_servings(recipes);
    if servings > 0 {
        total_calories(recipes) / servings as f64
    } else {
        0.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct NutritionSummary {
    pub recipe_count: usize,
    pub total_calories: f64,
    pub total_servings: u64,
    pub average_calories_per_serving: f64,
}

impl NutritionSummary {
    pub fn of(recipes: &[Recipe]) -> Self {
        Self {
            recipe_count: recipes.len(),
            total_calories: total_calories(recipes),
            total_servings: total_servings(recipes),
            average_calories_per_serving: average_calories_per_serving(recipes),
        }
    }
}
