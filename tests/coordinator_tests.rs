use axum::{extract::Query, routing::get, Json, Router};
use recipe_stash::{
    FavoritesStore, FileStorage, MemoryStorage, ProviderConfig, RecipeCoordinator, RecipeFilter,
    RecipeGateway,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn offline_coordinator() -> RecipeCoordinator {
    let gateway = RecipeGateway::new(ProviderConfig::new("http://127.0.0.1:9", None, None));
    RecipeCoordinator::new(gateway, FavoritesStore::new(Arc::new(MemoryStorage::new())))
}

#[tokio::test]
async fn test_offline_chicken_search_returns_unsaved_chicken_recipes() {
    let coordinator = offline_coordinator();
    coordinator.search(&["chicken"]).await;

    let state = coordinator.state();
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
    assert!(!state.recipes.is_empty());
    assert!(state
        .recipes
        .iter()
        .any(|r| r.title == "Asian Chicken Stir Fry"));
    assert!(state.recipes.iter().all(|r| !r.is_saved));
}

#[tokio::test]
async fn test_toggle_save_adds_then_removes() {
    let coordinator = offline_coordinator();
    coordinator.search(&["chicken"]).await;
    let first = coordinator.recipes()[0].clone();

    coordinator.toggle_save(&first).await;
    let saved = coordinator.saved_recipes();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, first.id);
    assert!(saved[0].is_saved);
    assert!(coordinator.recipes()[0].is_saved);
    assert!(coordinator.store().is_saved(&first.id).await.unwrap());

    let now_saved = coordinator.recipes()[0].clone();
    coordinator.toggle_save(&now_saved).await;
    assert!(coordinator.saved_recipes().is_empty());
    assert!(!coordinator.recipes()[0].is_saved);
    assert!(!coordinator.store().is_saved(&first.id).await.unwrap());
}

#[tokio::test]
async fn test_saved_recipe_round_trips_through_the_store() {
    let coordinator = offline_coordinator();
    coordinator.search_by_query("anything").await;
    let original = coordinator
        .recipes()
        .into_iter()
        .find(|r| r.title == "Chicken Tikka Masala")
        .unwrap();

    coordinator.toggle_save(&original).await;
    coordinator.load_saved_recipes().await;

    let reloaded = coordinator.saved_recipes().remove(0);
    assert_eq!(reloaded.id, original.id);
    assert_eq!(reloaded.title, original.title);
    assert_eq!(reloaded.ingredients, original.ingredients);
    assert_eq!(reloaded.instructions, original.instructions);
    assert_eq!(reloaded.ready_in_minutes, original.ready_in_minutes);
    assert_eq!(reloaded.servings, original.servings);
    assert_eq!(reloaded.calories, original.calories);
    assert_eq!(reloaded.summary, original.summary);
    assert!(reloaded.is_saved);
}

#[tokio::test]
async fn test_new_search_annotates_previously_saved_results() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = RecipeGateway::new(ProviderConfig::new("http://127.0.0.1:9", None, None));

    let first = RecipeCoordinator::new(
        gateway.clone(),
        FavoritesStore::new(Arc::new(FileStorage::new(dir.path()))),
    );
    first.search(&["pasta"]).await;
    let carbonara = first
        .recipes()
        .into_iter()
        .find(|r| r.title == "Spaghetti Carbonara")
        .unwrap();
    first.toggle_save(&carbonara).await;

    let second = RecipeCoordinator::new(
        gateway,
        FavoritesStore::new(Arc::new(FileStorage::new(dir.path()))),
    );
    second.search(&["pasta"]).await;
    let flags: Vec<(String, bool)> = second
        .recipes()
        .into_iter()
        .map(|r| (r.title, r.is_saved))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("Creamy Garlic Pasta".to_string(), false),
            ("Spaghetti Carbonara".to_string(), true),
        ]
    );
    assert_eq!(second.saved_recipes().len(), 1);
}

#[tokio::test]
async fn test_filtered_recipes_and_aggregates() {
    let coordinator = offline_coordinator();
    coordinator.search_by_query("everything").await;
    let all = coordinator.recipes();

    let quick = coordinator.filtered_recipes(&RecipeFilter {
        max_time: Some(15),
        ..RecipeFilter::default()
    });
    assert!(!quick.is_empty());
    assert!(quick.iter().all(|r| r.ready_in_minutes <= 15));

    let hearty = coordinator.filtered_recipes(&RecipeFilter {
        max_time: None,
        max_calories: Some(400.0),
        min_servings: Some(4),
    });
    assert!(hearty.iter().all(|r| r.calories <= 400.0 && r.servings >= 4));
    assert_eq!(
        coordinator.filtered_recipes(&RecipeFilter::default()).len(),
        all.len()
    );

    assert_eq!(coordinator.total_calories(&[]), 0.0);
    assert_eq!(coordinator.total_servings(&[]), 0);
    assert_eq!(coordinator.average_calories_per_serving(&[]), 0.0);

    let total = coordinator.total_calories(&all);
    let servings = coordinator.total_servings(&all);
    assert!(servings > 0);
    assert!((coordinator.average_calories_per_serving(&all) - total / servings as f64).abs() < 1e-9);
}

#[tokio::test]
async fn test_subscribers_see_search_and_save_updates() {
    let coordinator = offline_coordinator();
    let mut rx = coordinator.subscribe();

    coordinator.search(&["salad"]).await;
    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.recipes.len(), 1);
    assert!(!snapshot.is_loading);

    coordinator.toggle_save(&snapshot.recipes[0]).await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().saved_recipes.len(), 1);
}

#[tokio::test]
async fn test_provider_results_keep_stable_ids_across_searches() {
    let app = Router::new().route(
        "/search",
        get(|| async {
            Json(json!({
                "hits": [ { "recipe": {
                    "uri": "http://www.edamam.com/ontologies/edamam.owl#recipe_77aa",
                    "label": "Shakshuka",
                    "ingredientLines": ["4 eggs", "1 can tomatoes"],
                    "yield": 2
                } } ]
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let gateway = RecipeGateway::new(ProviderConfig::new(
        format!("http://{}/search", addr),
        Some("id".to_string()),
        Some("key".to_string()),
    ));
    let coordinator =
        RecipeCoordinator::new(gateway, FavoritesStore::new(Arc::new(MemoryStorage::new())));

    coordinator.search(&["eggs"]).await;
    let shakshuka = coordinator.recipes()[0].clone();
    assert_eq!(shakshuka.id, "77aa");
    assert!(shakshuka.instructions.is_empty());
    assert!(shakshuka
        .display_instructions()
        .last()
        .unwrap()
        .contains("season"));

    coordinator.toggle_save(&shakshuka).await;
    coordinator.search(&["tomatoes"]).await;
    assert!(coordinator.recipes()[0].is_saved);
}

#[tokio::test]
async fn test_loading_stays_on_until_every_search_finishes() {
    let app = Router::new().route(
        "/search",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let q = params.get("q").cloned().unwrap_or_default();
            if q == "slow" {
                tokio::time::sleep(Duration::from_millis(400)).await;
            }
            Json(json!({
                "hits": [ { "recipe": { "uri": format!("x#recipe_{}", q), "label": q } } ]
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let gateway = RecipeGateway::new(ProviderConfig::new(
        format!("http://{}/search", addr),
        Some("id".to_string()),
        Some("key".to_string()),
    ));
    let coordinator =
        RecipeCoordinator::new(gateway, FavoritesStore::new(Arc::new(MemoryStorage::new())));

    let (_, loading_after_fast) = tokio::join!(coordinator.search(&["slow"]), async {
        coordinator.search(&["fast"]).await;
        coordinator.is_loading()
    });

    assert!(loading_after_fast);
    assert!(!coordinator.is_loading());
    assert_eq!(coordinator.recipes()[0].title, "slow");
}
