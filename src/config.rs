//! Runtime configuration: provider credentials and the data directory.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use tracing::debug;

use crate::api_connection::{ProviderConfig, DEFAULT_RECIPE_API_URL};

pub const API_URL_ENV_VAR: &str = "RECIPE_API_URL";
pub const APP_ID_ENV_VAR: &str = "EDAMAM_APP_ID";
pub const APP_KEY_ENV_VAR: &str = "EDAMAM_APP_KEY";
pub const DATA_DIR_ENV_VAR: &str = "RECIPE_STASH_DATA_DIR";

const DATA_DIR_NAME: &str = "recipe-stash";

/// Provider settings from the environment (and `.env`, if present).
/// Missing credentials are left as `None`; the gateway then serves the
/// fallback catalog.
pub fn load_provider_config() -> ProviderConfig {
    dotenv().ok();
    let base_url = env::var(API_URL_ENV_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_RECIPE_API_URL.to_string());
    let app_id = non_empty_var(APP_ID_ENV_VAR);
    let app_key = non_empty_var(APP_KEY_ENV_VAR);

    if app_id.is_none() || app_key.is_none() {
        debug!(
            "{} / {} not set; searches will use the built-in catalog",
            APP_ID_ENV_VAR, APP_KEY_ENV_VAR
        );
    }
    ProviderConfig::new(base_url, app_id, app_key)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Where saved recipes live, in priority order:
/// 1. explicit path (command line or `RECIPE_STASH_DATA_DIR`)
/// 2. the platform data directory
/// 3. `./data`
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    dirs::data_dir()
        .map(|d| d.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("data"))
}
