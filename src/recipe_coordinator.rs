//! Glue between search, the favorites store and the nutrition aggregates,
//! shaped for a UI that wants one observable state object.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api_connection::RecipeGateway;
use crate::favorites_store::FavoritesStore;
use crate::recipe::{filter_recipes, Recipe, RecipeFilter};
use crate::recipe_aggregator;

/// Snapshot published to subscribers after every state change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatorState {
    pub recipes: Vec<Recipe>,
    pub saved_recipes: Vec<Recipe>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct RecipeCoordinator {
    gateway: RecipeGateway,
    store: FavoritesStore,
    state: watch::Sender<CoordinatorState>,
    /// Searches started and not yet finished; `is_loading` mirrors `> 0`.
    in_flight: AtomicUsize,
}

impl RecipeCoordinator {
    pub fn new(gateway: RecipeGateway, store: FavoritesStore) -> Self {
        let (state, _) = watch::channel(CoordinatorState::default());
        Self {
            gateway,
            store,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Receiver that observes every published [`CoordinatorState`].
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CoordinatorState {
        self.state.borrow().clone()
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.state.borrow().recipes.clone()
    }

    pub fn saved_recipes(&self) -> Vec<Recipe> {
        self.state.borrow().saved_recipes.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    /// Searches by ingredients and replaces the current results. A list
    /// with no non-blank ingredient is ignored.
    pub async fn search<S: AsRef<str>>(&self, ingredients: &[S]) {
        if ingredients.iter().all(|i| i.as_ref().trim().is_empty()) {
            debug!("ignoring search without ingredients");
            return;
        }
        self.begin_loading();
        let results = self.gateway.search_by_ingredients(ingredients).await;
        self.finish_search(results).await;
    }

    /// Free-text search. A blank query is ignored.
    pub async fn search_by_query(&self, text: &str) {
        if text.trim().is_empty() {
            debug!("ignoring empty query");
            return;
        }
        self.begin_loading();
        let results = self.gateway.search_by_query(text).await;
        self.finish_search(results).await;
    }

    /// Saves `recipe` if it is marked unsaved, otherwise removes it, then
    /// reloads the saved set.
    pub async fn toggle_save(&self, recipe: &Recipe) {
        let outcome = if recipe.is_saved {
            self.store.remove(&recipe.id).await
        } else {
            self.store.save(recipe).await
        };

        if let Err(e) = outcome {
            self.record_error(format!("Could not update saved recipes: {}", e));
            return;
        }

        let now_saved = !recipe.is_saved;
        self.state.send_modify(|state| {
            for r in state.recipes.iter_mut().filter(|r| r.id == recipe.id) {
                r.is_saved = now_saved;
            }
        });
        self.load_saved_recipes().await;
    }

    /// Refreshes `saved_recipes` from the store and re-derives the saved
    /// flag of every current result from store membership.
    pub async fn load_saved_recipes(&self) {
        match self.store.get_all().await {
            Ok(saved) => {
                self.state.send_modify(|state| {
                    let ids: HashSet<&str> = saved.iter().map(|r| r.id.as_str()).collect();
                    for r in state.recipes.iter_mut() {
                        r.is_saved = ids.contains(r.id.as_str());
                    }
                    state.saved_recipes = saved.clone();
                });
            }
            Err(e) => self.record_error(format!("Could not load saved recipes: {}", e)),
        }
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    pub fn total_calories(&self, recipes: &[Recipe]) -> f64 {
        recipe_aggregator::total_calories(recipes)
    }

    pub fn total_servings(&self, recipes: &[Recipe]) -> u64 {
        recipe_aggregator::total_servings(recipes)
    }

    pub fn average_calories_per_serving(&self, recipes: &[Recipe]) -> f64 {
        recipe_aggregator::average_calories_per_serving(recipes)
    }

    /// Current results that satisfy every bound in `filter`.
    pub fn filtered_recipes(&self, filter: &RecipeFilter) -> Vec<Recipe> {
        filter_recipes(&self.state.borrow().recipes, filter)
    }

    fn begin_loading(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    /// Marks one search as finished and reports whether others are still
    /// running.
    fn end_search(&self) -> bool {
        self.in_flight.fetch_sub(1, Ordering::SeqCst) > 1
    }

    async fn finish_search(&self, mut results: Vec<Recipe>) {
        let saved = match self.store.get_all().await {
            Ok(saved) => saved,
            Err(e) => {
                let still_loading = self.end_search();
                self.publish_error(format!("Could not check saved recipes: {}", e), still_loading);
                return;
            }
        };

        {
            let ids: HashSet<&str> = saved.iter().map(|r| r.id.as_str()).collect();
            for r in results.iter_mut() {
                r.is_saved = ids.contains(r.id.as_str());
            }
        }
        debug!(count = results.len(), saved = saved.len(), "search results annotated");

        let still_loading = self.end_search();
        self.state.send_modify(|state| {
            state.recipes = results;
            state.saved_recipes = saved;
            state.is_loading = still_loading;
        });
    }

    fn record_error(&self, message: String) {
        let still_loading = self.in_flight.load(Ordering::SeqCst) > 0;
        self.publish_error(message, still_loading);
    }

    fn publish_error(&self, message: String, still_loading: bool) {
        warn!(error = %message, "coordinator operation failed");
        self.state.send_modify(|state| {
            state.error = Some(message);
            state.is_loading = still_loading;
        });
    }
}
