//! Durable set of the user's saved recipes.
//!
//! The whole set lives as one JSON array under [`SAVED_RECIPES_KEY`]. Every
//! operation reads, modifies and rewrites the entire array while holding
//! the store's lock, so concurrent callers sharing a store never lose an
//! update.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::recipe::Recipe;
use crate::storage::{KeyValueStorage, StoreError};

pub const SAVED_RECIPES_KEY: &str = "saved_recipes";

/// Cloned handles share the medium and the lock.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStorage>,
    lock: Arc<Mutex<()>>,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Saves a copy of `recipe` with `is_saved` set. An existing entry with
    /// the same id is replaced, so the set never holds duplicate ids.
    pub async fn save(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut saved = self.load().await?;
        saved.retain(|r| r.id != recipe.id);

        let mut copy = recipe.clone();
        copy.is_saved = true;
        saved.push(copy);

        self.write(&saved).await?;
        info!(id = %recipe.id, title = %recipe.title, "saved recipe");
        Ok(())
    }

    /// Removes every entry with `recipe_id`. Removing an unknown id leaves
    /// the set untouched.
    pub async fn remove(&self, recipe_id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut saved = self.load().await?;
        let before = saved.len();
        saved.retain(|r| r.id != recipe_id);

        if saved.len() == before {
            debug!(id = recipe_id, "recipe was not saved, nothing to remove");
            return Ok(());
        }
        self.write(&saved).await?;
        info!(id = recipe_id, "removed saved recipe");
        Ok(())
    }

    /// All saved recipes in the order they were saved. Empty when nothing
    /// has been stored yet.
    pub async fn get_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    pub async fn is_saved(&self, recipe_id: &str) -> Result<bool, StoreError> {
        Ok(self.get_all().await?.iter().any(|r| r.id == recipe_id))
    }

    /// Deletes the storage key itself.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.storage.remove(SAVED_RECIPES_KEY).await?;
        info!("cleared saved recipes");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Recipe>, StoreError> {
        let Some(raw) = self.storage.get(SAVED_RECIPES_KEY).await? else {
            return Ok(Vec::new());
        };
        let mut saved: Vec<Recipe> = serde_json::from_str(&raw)?;
        // Membership is what makes a recipe saved, whatever the flag says.
        for recipe in &mut saved {
            recipe.is_saved = true;
        }
        Ok(saved)
    }

    async fn write(&self, saved: &[Recipe]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(saved)?;
        self.storage.set(SAVED_RECIPES_KEY, &raw).await
    }
}
