pub mod api_connection;
pub mod cli;
pub mod config;
pub mod fallback_catalog;
pub mod favorites_store;
pub mod recipe;
pub mod recipe_aggregator;
pub mod recipe_coordinator;
pub mod recipe_normalizer;
pub mod storage;

pub use api_connection::{ApiConnectionError, ProviderConfig, RecipeGateway};
pub use favorites_store::FavoritesStore;
pub use recipe::{Recipe, RecipeFilter};
pub use recipe_coordinator::{CoordinatorState, RecipeCoordinator};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StoreError};
