use anyhow::{anyhow, bail, Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_stash::api_connection::RecipeGateway;
use recipe_stash::cli::{parse_args, render_recipe, render_summary, Command, ViewArgs};
use recipe_stash::config::{load_provider_config, resolve_data_dir};
use recipe_stash::fallback_catalog;
use recipe_stash::favorites_store::FavoritesStore;
use recipe_stash::recipe_aggregator::NutritionSummary;
use recipe_stash::recipe_coordinator::RecipeCoordinator;
use recipe_stash::storage::FileStorage;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_stash=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = parse_args();
    let data_dir = resolve_data_dir(cli.data_dir.clone());
    info!(data_dir = %data_dir.display(), "using data directory");

    let store = FavoritesStore::new(Arc::new(FileStorage::new(data_dir.clone())));
    let coordinator = RecipeCoordinator::new(RecipeGateway::new(load_provider_config()), store.clone());

    match cli.command {
        Command::Search { ingredients, view } => {
            coordinator.search(ingredients.as_slice()).await;
            show_results(&coordinator, &view).await?;
        }
        Command::Query { text, view } => {
            coordinator.search_by_query(&text.join(" ")).await;
            show_results(&coordinator, &view).await?;
        }
        Command::Catalog { details } => {
            for recipe in fallback_catalog::all() {
                println!("{}", render_recipe(&recipe, details));
            }
        }
        Command::Saved { details } => {
            let saved = store.get_all().await.context("Failed to load saved recipes")?;
            if saved.is_empty() {
                println!("No saved recipes.");
            }
            for recipe in &saved {
                println!("{}", render_recipe(recipe, details));
            }
            println!("\n{}", render_summary(&NutritionSummary::of(&saved)));
        }
        Command::Remove { id } => {
            store
                .remove(&id)
                .await
                .with_context(|| format!("Failed to remove saved recipe '{}'", id))?;
            println!("Removed {} (if it was saved).", id);
        }
        Command::Clear => {
            store.clear().await.context("Failed to clear saved recipes")?;
            println!("Cleared all saved recipes.");
        }
    }

    Ok(())
}

async fn show_results(coordinator: &RecipeCoordinator, view: &ViewArgs) -> Result<()> {
    if let Some(error) = coordinator.error() {
        return Err(anyhow!(error));
    }

    if let Some(id) = &view.toggle {
        let Some(recipe) = coordinator.recipes().into_iter().find(|r| &r.id == id) else {
            bail!("No result with id '{}' to save or unsave", id);
        };
        coordinator.toggle_save(&recipe).await;
        if let Some(error) = coordinator.error() {
            return Err(anyhow!(error));
        }
        let verb = if recipe.is_saved { "Removed" } else { "Saved" };
        println!("{} '{}'.\n", verb, recipe.title);
    }

    let shown = coordinator.filtered_recipes(&view.filter());
    if shown.is_empty() {
        println!("No recipes found.");
    }
    for recipe in &shown {
        println!("{}", render_recipe(recipe, view.details));
    }
    println!("\n{}", render_summary(&NutritionSummary::of(&shown)));
    Ok(())
}
