//! Conversion of provider payloads into canonical [`Recipe`] records.
//!
//! Two upstream shapes are understood:
//! - the *detailed* shape (`title`, `extendedIngredients`,
//!   `analyzedInstructions`, `nutrition.nutrients`, `readyInMinutes`,
//!   `servings`, `summary`), and
//! - the *ingredient-line* shape returned in search hits (`label`,
//!   `ingredients[].text` / `ingredientLines`, `totalTime`, `yield`,
//!   `digest`).
//!
//! Every field is read through an optional intermediate struct and coerced
//! with [`safe_to_int`] / [`safe_to_double`], so a missing or oddly typed
//! field degrades to its default instead of rejecting the whole record.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::recipe::Recipe;

const DEFAULT_MINUTES: i64 = 0;
const DEFAULT_SERVINGS: i64 = 1;
const DEFAULT_CALORIES: f64 = 0.0;
const CALORIES_LABEL: &str = "calories";
const URI_ID_MARKER: &str = "#recipe_";

/// Coerces an integer, float or numeric string into an `i64`.
/// Floats are truncated toward zero. Anything else yields `default`.
pub fn safe_to_int(value: Option<&Value>, default: i64) -> i64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
                    .unwrap_or(default)
            }
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                        .map(|f| f.trunc() as i64)
                })
                .unwrap_or(default)
        }
        _ => default,
    }
}

/// Coerces an integer, float or numeric string into a finite `f64`.
/// Anything else yields `default`.
pub fn safe_to_double(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(default)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DetailedPayload {
    id: Option<Value>,
    title: Option<Value>,
    image: Option<Value>,
    ready_in_minutes: Option<Value>,
    servings: Option<Value>,
    summary: Option<Value>,
    extended_ingredients: Option<Value>,
    analyzed_instructions: Option<Value>,
    nutrition: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IngredientLinePayload {
    uri: Option<Value>,
    label: Option<Value>,
    image: Option<Value>,
    ingredients: Option<Value>,
    ingredient_lines: Option<Value>,
    instruction_lines: Option<Value>,
    total_time: Option<Value>,
    #[serde(rename = "yield")]
    servings: Option<Value>,
    digest: Option<Value>,
    calories: Option<Value>,
    summary: Option<Value>,
}

#[derive(Debug)]
enum UpstreamRecipe {
    Detailed(DetailedPayload),
    IngredientLines(IngredientLinePayload),
}

impl UpstreamRecipe {
    fn classify(payload: &Value) -> Option<Self> {
        let obj = payload.as_object()?;
        let detailed = ["extendedIngredients", "analyzedInstructions", "nutrition"]
            .iter()
            .any(|key| obj.contains_key(*key));
        let line_based = ["label", "ingredientLines"]
            .iter()
            .any(|key| obj.contains_key(*key));

        if detailed || (!line_based && obj.contains_key("title")) {
            serde_json::from_value(payload.clone())
                .ok()
                .map(UpstreamRecipe::Detailed)
        } else if line_based {
            serde_json::from_value(payload.clone())
                .ok()
                .map(UpstreamRecipe::IngredientLines)
        } else {
            None
        }
    }
}

/// Builds a canonical recipe from a provider payload.
///
/// `fallback_id` is used when the payload carries no natural key. Returns
/// `None` when the payload is not an object of a known shape or has no
/// usable title, so a caller can drop it and keep the rest of a batch.
pub fn normalize(payload: &Value, fallback_id: &str) -> Option<Recipe> {
    let recipe = match UpstreamRecipe::classify(payload) {
        Some(UpstreamRecipe::Detailed(p)) => from_detailed(p, fallback_id),
        Some(UpstreamRecipe::IngredientLines(p)) => from_ingredient_lines(p, fallback_id),
        None => {
            debug!("payload is not a recognised recipe shape");
            return None;
        }
    };
    if recipe.is_none() {
        debug!(fallback_id, "payload has no usable title");
    }
    recipe
}

fn from_detailed(p: DetailedPayload, fallback_id: &str) -> Option<Recipe> {
    let title = non_empty_string(p.title.as_ref())?;
    let id = match p.id.as_ref() {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => fallback_id.to_string(),
    };
    let calories = p
        .nutrition
        .as_ref()
        .and_then(|n| n.get("nutrients"))
        .and_then(find_calories)
        .unwrap_or(DEFAULT_CALORIES);

    Some(Recipe {
        id,
        title,
        image: string_or_empty(p.image.as_ref()),
        ingredients: ingredient_texts(p.extended_ingredients.as_ref(), "original"),
        instructions: flatten_steps(p.analyzed_instructions.as_ref()),
        ready_in_minutes: coerce_minutes(p.ready_in_minutes.as_ref()),
        servings: coerce_servings(p.servings.as_ref()),
        calories: clamp_calories(calories),
        summary: string_or_empty(p.summary.as_ref()),
        is_saved: false,
    })
}

fn from_ingredient_lines(p: IngredientLinePayload, fallback_id: &str) -> Option<Recipe> {
    let title = non_empty_string(p.label.as_ref())?;
    let id = p
        .uri
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|uri| uri.split_once(URI_ID_MARKER))
        .map(|(_, key)| key.trim())
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback_id.to_string());

    let mut ingredients = ingredient_texts(p.ingredients.as_ref(), "text");
    if ingredients.is_empty() {
        ingredients = string_list(p.ingredient_lines.as_ref());
    }

    let calories = p
        .digest
        .as_ref()
        .and_then(find_calories)
        .unwrap_or_else(|| safe_to_double(p.calories.as_ref(), DEFAULT_CALORIES));

    Some(Recipe {
        id,
        title,
        image: string_or_empty(p.image.as_ref()),
        ingredients,
        instructions: string_list(p.instruction_lines.as_ref()),
        ready_in_minutes: coerce_minutes(p.total_time.as_ref()),
        servings: coerce_servings(p.servings.as_ref()),
        calories: clamp_calories(calories),
        summary: string_or_empty(p.summary.as_ref()),
        is_saved: false,
    })
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_or_empty(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

/// String form of an arbitrary JSON value without surrounding quotes for
/// plain strings.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn ingredient_texts(entries: Option<&Value>, text_field: &str) -> Vec<String> {
    let Some(entries) = entries.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| match entry.get(text_field).and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None => value_text(entry),
        })
        .collect()
}

fn string_list(entries: Option<&Value>) -> Vec<String> {
    entries
        .and_then(Value::as_array)
        .map(|items| items.iter().map(value_text).collect())
        .unwrap_or_default()
}

/// Flattens `[{ "steps": [{ "step": "..." }] }]` into one ordered list.
fn flatten_steps(groups: Option<&Value>) -> Vec<String> {
    let Some(groups) = groups.and_then(Value::as_array) else {
        return Vec::new();
    };
    groups
        .iter()
        .filter_map(|group| group.get("steps").and_then(Value::as_array))
        .flatten()
        .filter_map(|step| non_empty_string(step.get("step")))
        .collect()
}

/// Looks for a `Calories` entry in a nutrient or digest list. Entries name
/// themselves with either `name` or `label` and carry the value in
/// `amount`, `total` or `quantity`.
fn find_calories(list: &Value) -> Option<f64> {
    list.as_array()?
        .iter()
        .find(|entry| {
            entry
                .get("name")
                .or_else(|| entry.get("label"))
                .and_then(Value::as_str)
                .is_some_and(|name| name.trim().eq_ignore_ascii_case(CALORIES_LABEL))
        })
        .map(|entry| {
            let amount = entry
                .get("amount")
                .or_else(|| entry.get("total"))
                .or_else(|| entry.get("quantity"));
            safe_to_double(amount, DEFAULT_CALORIES)
        })
}

fn coerce_minutes(value: Option<&Value>) -> u32 {
    let minutes = safe_to_int(value, DEFAULT_MINUTES);
    u32::try_from(minutes).unwrap_or(DEFAULT_MINUTES as u32)
}

fn coerce_servings(value: Option<&Value>) -> u32 {
    let servings = safe_to_int(value, DEFAULT_SERVINGS);
    match u32::try_from(servings) {
        Ok(s) if s >= 1 => s,
        _ => DEFAULT_SERVINGS as u32,
    }
}

fn clamp_calories(calories: f64) -> f64 {
    if calories.is_finite() && calories >= 0.0 {
        calories
    } else {
        DEFAULT_CALORIES
    }
}

/// Generic preparation steps for a recipe whose source carried none.
///
/// Always starts with gathering ingredients and preparing equipment, adds
/// hints for ingredient classes that need special handling, and ends with
/// a serve-and-season step.
pub fn synthesize_instructions(ingredients: &[String]) -> Vec<String> {
    let lowered: Vec<String> = ingredients.iter().map(|i| i.to_lowercase()).collect();
    let mentions = |needle: &str| lowered.iter().any(|line| line.contains(needle));
    // Whole words only, so "eggplant" is not an egg.
    let names = |word: &str| {
        let plural = format!("{}s", word);
        lowered.iter().any(|line| {
            line.split(|c: char| !c.is_alphabetic())
                .any(|token| token == word || token == plural)
        })
    };

    let mut steps = vec![
        "Gather and measure all ingredients.".to_string(),
        "Prepare your cooking equipment and work area.".to_string(),
    ];
    if mentions("chicken") {
        steps.push(
            "Handle raw chicken separately and cook it until it reaches an internal temperature of 165°F (74°C)."
                .to_string(),
        );
    }
    if names("beef") {
        steps.push("Brown the beef over medium-high heat, breaking it up as it cooks.".to_string());
    }
    if names("pasta") || names("spaghetti") {
        steps.push("Cook the pasta in salted boiling water until al dente, then drain.".to_string());
    }
    if names("egg") {
        steps.push("Whisk the eggs before combining them with the other ingredients.".to_string());
    }
    steps.push("Combine the ingredients following the usual method for this dish.".to_string());
    steps.push("Serve warm and season to taste.".to_string());
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_to_int_accepts_numbers_and_numeric_strings() {
        assert_eq!(safe_to_int(Some(&json!(42)), 0), 42);
        assert_eq!(safe_to_int(Some(&json!(4.9)), 0), 4);
        assert_eq!(safe_to_int(Some(&json!("17")), 0), 17);
        assert_eq!(safe_to_int(Some(&json!(" 2.5 ")), 0), 2);
    }

    #[test]
    fn test_safe_to_int_falls_back_to_default() {
        assert_eq!(safe_to_int(None, 1), 1);
        assert_eq!(safe_to_int(Some(&Value::Null), 1), 1);
        assert_eq!(safe_to_int(Some(&json!("soon")), 1), 1);
        assert_eq!(safe_to_int(Some(&json!([3])), 1), 1);
        assert_eq!(safe_to_int(Some(&json!(true)), 1), 1);
        assert_eq!(safe_to_int(Some(&json!(1e300)), 1), 1);
    }

    #[test]
    fn test_safe_to_double_behaviour() {
        assert_eq!(safe_to_double(Some(&json!(3)), 0.0), 3.0);
        assert_eq!(safe_to_double(Some(&json!(512.25)), 0.0), 512.25);
        assert_eq!(safe_to_double(Some(&json!("99.5")), 0.0), 99.5);
        assert_eq!(safe_to_double(Some(&json!("NaN")), 7.0), 7.0);
        assert_eq!(safe_to_double(Some(&json!({"amount": 1})), 7.0), 7.0);
        assert_eq!(safe_to_double(None, 7.0), 7.0);
    }

    #[test]
    fn test_normalize_ingredient_line_shape() {
        let payload = json!({
            "uri": "http://www.edamam.com/ontologies/edamam.owl#recipe_abc123",
            "label": "Lemon Chicken",
            "image": "https://img.example/lemon.jpg",
            "ingredients": [
                { "text": "2 chicken breasts", "weight": 400.0 },
                { "text": "1 lemon" },
                { "food": "salt" }
            ],
            "totalTime": 35.0,
            "yield": "4",
            "digest": [
                { "label": "Fat", "total": 20.0 },
                { "label": "Calories", "total": 812.4 }
            ]
        });

        let recipe = normalize(&payload, "fallback").unwrap();
        assert_eq!(recipe.id, "abc123");
        assert_eq!(recipe.title, "Lemon Chicken");
        assert_eq!(recipe.image, "https://img.example/lemon.jpg");
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0], "2 chicken breasts");
        assert!(recipe.ingredients[2].contains("salt"));
        assert_eq!(recipe.ready_in_minutes, 35);
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.calories, 812.4);
        assert!(recipe.instructions.is_empty());
        assert!(!recipe.is_saved);
    }

    #[test]
    fn test_normalize_falls_back_to_ingredient_lines_and_synthesized_id() {
        let payload = json!({
            "label": "Plain Rice",
            "ingredientLines": ["1 cup rice", "2 cups water"],
            "calories": 410
        });
        let recipe = normalize(&payload, "1700000000000-3").unwrap();
        assert_eq!(recipe.id, "1700000000000-3");
        assert_eq!(recipe.ingredients, vec!["1 cup rice", "2 cups water"]);
        assert_eq!(recipe.calories, 410.0);
    }

    #[test]
    fn test_normalize_detailed_shape() {
        let payload = json!({
            "id": 715538,
            "title": "Bruschetta Style Pork",
            "image": "https://img.example/715538.jpg",
            "readyInMinutes": "35",
            "servings": 2,
            "summary": "<b>Tasty</b> pork",
            "extendedIngredients": [
                { "original": "2 pork chops" },
                { "original": "1 cup cherry tomatoes" },
                "basil"
            ],
            "analyzedInstructions": [
                { "name": "", "steps": [ { "number": 1, "step": "Season the pork." } ] },
                { "name": "Topping", "steps": [
                    { "number": 1, "step": "Chop the tomatoes." },
                    { "number": 2, "step": "Spoon over the pork." }
                ] }
            ],
            "nutrition": { "nutrients": [
                { "name": "Protein", "amount": 40 },
                { "name": "Calories", "amount": 523.1, "unit": "kcal" }
            ] }
        });

        let recipe = normalize(&payload, "unused").unwrap();
        assert_eq!(recipe.id, "715538");
        assert_eq!(recipe.ready_in_minutes, 35);
        assert_eq!(recipe.servings, 2);
        assert_eq!(recipe.calories, 523.1);
        assert_eq!(recipe.summary, "<b>Tasty</b> pork");
        assert_eq!(recipe.ingredients[2], "basil");
        assert_eq!(
            recipe.instructions,
            vec!["Season the pork.", "Chop the tomatoes.", "Spoon over the pork."]
        );
    }

    #[test]
    fn test_normalize_missing_numeric_fields_use_defaults() {
        for payload in [
            json!({ "label": "Mystery Stew", "ingredientLines": ["stock"] }),
            json!({ "title": "Mystery Stew", "extendedIngredients": [] }),
        ] {
            let recipe = normalize(&payload, "x").unwrap();
            assert_eq!(recipe.ready_in_minutes, 0);
            assert_eq!(recipe.servings, 1);
            assert_eq!(recipe.calories, 0.0);
        }
    }

    #[test]
    fn test_normalize_clamps_out_of_range_numbers() {
        let payload = json!({
            "label": "Odd Numbers",
            "totalTime": -5,
            "yield": 0,
            "calories": -100.0
        });
        let recipe = normalize(&payload, "x").unwrap();
        assert_eq!(recipe.ready_in_minutes, 0);
        assert_eq!(recipe.servings, 1);
        assert_eq!(recipe.calories, 0.0);
    }

    #[test]
    fn test_normalize_rejects_invalid_payloads() {
        assert!(normalize(&json!("not an object"), "x").is_none());
        assert!(normalize(&json!([1, 2, 3]), "x").is_none());
        assert!(normalize(&json!({ "image": "only.jpg" }), "x").is_none());
        assert!(normalize(&json!({ "label": "   " }), "x").is_none());
        assert!(normalize(&json!({ "label": 12 }), "x").is_none());
    }

    #[test]
    fn test_synthesized_instructions_include_chicken_hint() {
        let steps = synthesize_instructions(&["2 lbs Chicken thighs".to_string()]);
        assert!(steps[0].contains("Gather"));
        assert!(steps.iter().any(|s| s.contains("165°F")));
        assert_eq!(steps.last().unwrap(), "Serve warm and season to taste.");

        let plain = synthesize_instructions(&["1 cup rice".to_string()]);
        assert!(!plain.iter().any(|s| s.contains("chicken")));
        assert_eq!(plain.len(), 4);
    }

    #[test]
    fn test_egg_hint_needs_the_whole_word() {
        let lookalikes = synthesize_instructions(&[
            "1 large eggplant, cubed".to_string(),
            "2 cups veggie stock".to_string(),
        ]);
        assert!(!lookalikes.iter().any(|s| s.contains("Whisk the eggs")));

        let eggs = synthesize_instructions(&["3 Eggs, beaten".to_string()]);
        assert!(eggs.iter().any(|s| s.contains("Whisk the eggs")));
        let egg = synthesize_instructions(&["1 egg".to_string()]);
        assert!(egg.iter().any(|s| s.contains("Whisk the eggs")));
    }
}
