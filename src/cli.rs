use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DATA_DIR_ENV_VAR;
use crate::recipe::{Recipe, RecipeFilter};
use crate::recipe_aggregator::NutritionSummary;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding saved recipes
    #[arg(long, global = true, env = DATA_DIR_ENV_VAR)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find recipes that use the given ingredients
    Search {
        #[arg(required = true)]
        ingredients: Vec<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Free-text recipe search
    Query {
        #[arg(required = true)]
        text: Vec<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// List the built-in offline catalog
    Catalog {
        #[arg(long)]
        details: bool,
    },
    /// List saved recipes with nutrition totals
    Saved {
        #[arg(long)]
        details: bool,
    },
    /// Remove a saved recipe by id
    Remove { id: String },
    /// Forget every saved recipe
    Clear,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Save (or unsave) the result with this id after searching
    #[arg(long, value_name = "ID")]
    pub toggle: Option<String>,

    #[arg(long, value_name = "MINUTES")]
    pub max_time: Option<u32>,

    #[arg(long, value_name = "KCAL")]
    pub max_calories: Option<f64>,

    #[arg(long, value_name = "COUNT")]
    pub min_servings: Option<u32>,

    /// Print ingredients and instructions
    #[arg(long)]
    pub details: bool,
}

impl ViewArgs {
    pub fn filter(&self) -> RecipeFilter {
        RecipeFilter {
            max_time: self.max_time,
            max_calories: self.max_calories,
            min_servings: self.min_servings,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Drops `<...>` tags from provider summaries.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn render_recipe(recipe: &Recipe, details: bool) -> String {
    let marker = if recipe.is_saved { "*" } else { " " };
    let mut out = format!(
        "{} [{}] {} ({} min, {} servings, {:.0} kcal)",
        marker, recipe.id, recipe.title, recipe.ready_in_minutes, recipe.servings, recipe.calories
    );
    if !details {
        return out;
    }

    let summary = strip_markup(&recipe.summary);
    if !summary.is_empty() {
        out.push_str(&format!("\n    {}", summary));
    }
    out.push_str("\n    Ingredients:");
    for ingredient in &recipe.ingredients {
        out.push_str(&format!("\n      - {}", ingredient));
    }
    out.push_str("\n    Instructions:");
    for (idx, step) in recipe.display_instructions().iter().enumerate() {
        out.push_str(&format!("\n      {}. {}", idx + 1, step));
    }
    out
}

pub fn render_summary(summary: &NutritionSummary) -> String {
    format!(
        "{} recipes, {:.0} kcal over {} servings ({:.1} kcal/serving)",
        summary.recipe_count,
        summary.total_calories,
        summary.total_servings,
        summary.average_calories_per_serving
    )
}
