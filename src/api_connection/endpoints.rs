use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_RECIPE_API_URL: &str = "https://api.edamam.com/api/recipes/v2";

/// Credentials and endpoint of the remote recipe provider.
#[derive(Clone, Debug, Default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub app_id: Option<String>,
    pub app_key: Option<String>,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, app_id: Option<String>, app_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            app_id,
            app_key,
        }
    }
}

/// Query string of a single search call.
#[derive(Debug, Serialize, Clone)]
pub struct SearchRequest {
    #[serde(rename = "type")]
    pub search_type: &'static str,
    pub q: String,
    pub app_id: String,
    pub app_key: String,
    pub random: bool,
}

impl SearchRequest {
    pub fn public(q: String, app_id: String, app_key: String) -> Self {
        Self {
            search_type: "public",
            q,
            app_id,
            app_key,
            random: true,
        }
    }
}

/// Success envelope: `{ "hits": [ { "recipe": { ... } }, ... ] }`.
/// A body without a `hits` array fails to deserialize and counts as a
/// provider failure. Individual hits stay untyped so one odd entry cannot
/// sink the rest of the list.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchResponse {
    pub hits: Vec<Value>,
}
