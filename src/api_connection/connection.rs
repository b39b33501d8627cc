use reqwest::Client;
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use tracing::{debug, info, warn};

use super::endpoints::{ProviderConfig, SearchRequest, SearchResponse};
use crate::fallback_catalog;
use crate::recipe::Recipe;
use crate::recipe_normalizer::normalize;

/// Reasons a provider search produced no usable hit list. Never escapes
/// the public search methods; they answer from the catalog instead.
#[derive(Debug)]
pub enum ApiConnectionError {
    /// `app_id` or `app_key` is not configured.
    MissingCredentials(&'static str),
    ProviderUnreachable {
        query: String,
        source: reqwest::Error,
    },
    /// The provider answered with something other than `200 OK`.
    ProviderRejected {
        query: String,
        status: reqwest::StatusCode,
        body: String,
    },
    /// The body was not JSON, or had no `hits` array.
    MalformedHitList(serde_json::Error),
}

impl fmt::Display for ApiConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiConnectionError::MissingCredentials(which) => {
                write!(f, "recipe provider {} is not configured", which)
            }
            ApiConnectionError::ProviderUnreachable { query, source } => {
                write!(f, "recipe provider unreachable while searching '{}': {}", query, source)
            }
            ApiConnectionError::ProviderRejected { query, status, body } => {
                write!(f, "recipe provider rejected search '{}' with {}: {}", query, status, body)
            }
            ApiConnectionError::MalformedHitList(err) => {
                write!(f, "recipe provider returned an unreadable hit list: {}", err)
            }
        }
    }
}

impl Error for ApiConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiConnectionError::ProviderUnreachable { source, .. } => Some(source),
            ApiConnectionError::MalformedHitList(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiConnectionError {
    fn from(err: serde_json::Error) -> Self {
        ApiConnectionError::MalformedHitList(err)
    }
}

/// Parses a provider response body into canonical recipes.
///
/// Hits whose payload cannot be normalized are dropped, as are later hits
/// repeating an id already in the list. Ids for hits without a natural key
/// are `<id_prefix>-<position>`.
pub fn parse_search_response(body: &str, id_prefix: &str) -> Result<Vec<Recipe>, ApiConnectionError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let total = response.hits.len();

    let mut seen = HashSet::new();
    let mut recipes = Vec::with_capacity(total);
    let mut unreadable = 0usize;

    for (idx, hit) in response.hits.iter().enumerate() {
        let fallback_id = format!("{}-{}", id_prefix, idx);
        let Some(recipe) = hit
            .get("recipe")
            .and_then(|payload| normalize(payload, &fallback_id))
        else {
            unreadable += 1;
            continue;
        };
        if !seen.insert(recipe.id.clone()) {
            warn!(id = %recipe.id, position = idx, "dropping provider hit with repeated id");
            continue;
        }
        recipes.push(recipe);
    }

    if unreadable > 0 {
        warn!(
            dropped = unreadable,
            total, "dropped provider hits that could not be normalized"
        );
    }
    Ok(recipes)
}

/// Single-shot search against the remote provider.
///
/// The public search methods never fail: any provider problem is logged
/// and answered from the built-in catalog instead.
#[derive(Clone, Debug)]
pub struct RecipeGateway {
    client: Client,
    config: ProviderConfig,
}

impl RecipeGateway {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Recipes using the given ingredients. Blank entries are ignored; an
    /// input with no usable ingredient returns an empty list without any
    /// network traffic.
    pub async fn search_by_ingredients<S: AsRef<str>>(&self, ingredients: &[S]) -> Vec<Recipe> {
        let cleaned: Vec<&str> = ingredients
            .iter()
            .map(|i| i.as_ref().trim())
            .filter(|i| !i.is_empty())
            .collect();
        if cleaned.is_empty() {
            debug!("ignoring ingredient search with no ingredients");
            return Vec::new();
        }

        let q = cleaned.join(",");
        match self.fetch(&q).await {
            Ok(recipes) => {
                info!(query = %q, count = recipes.len(), "provider search succeeded");
                recipes
            }
            Err(e) => {
                warn!(query = %q, error = %e, "provider search failed, serving fallback catalog");
                fallback_catalog::filter_by_ingredients(cleaned.as_slice())
            }
        }
    }

    /// Free-text search. A blank query returns an empty list without any
    /// network traffic.
    pub async fn search_by_query(&self, query: &str) -> Vec<Recipe> {
        let q = query.trim();
        if q.is_empty() {
            debug!("ignoring empty free-text search");
            return Vec::new();
        }

        match self.fetch(q).await {
            Ok(recipes) => {
                info!(query = %q, count = recipes.len(), "provider search succeeded");
                recipes
            }
            Err(e) => {
                warn!(query = %q, error = %e, "provider search failed, serving fallback catalog");
                fallback_catalog::all()
            }
        }
    }

    /// Issues one request and normalizes the hits. Non-200 statuses,
    /// transport errors and malformed bodies are all errors here.
    pub async fn fetch(&self, q: &str) -> Result<Vec<Recipe>, ApiConnectionError> {
        let app_id = self
            .config
            .app_id
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or(ApiConnectionError::MissingCredentials("app id"))?;
        let app_key = self
            .config
            .app_key
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or(ApiConnectionError::MissingCredentials("app key"))?;

        let request = SearchRequest::public(q.to_string(), app_id, app_key);
        debug!(url = %self.config.base_url, q, "sending provider search");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&request)
            .send()
            .await
            .map_err(|source| ApiConnectionError::ProviderUnreachable {
                query: q.to_string(),
                source,
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ApiConnectionError::ProviderRejected {
                query: q.to_string(),
                status,
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ApiConnectionError::ProviderUnreachable {
                query: q.to_string(),
                source,
            })?;
        let id_prefix = chrono::Utc::now().timestamp_millis().to_string();
        parse_search_response(&body, &id_prefix)
    }
}
