pub mod connection;
pub mod endpoints;

pub use connection::{ApiConnectionError, RecipeGateway};
pub use endpoints::{ProviderConfig, DEFAULT_RECIPE_API_URL};
