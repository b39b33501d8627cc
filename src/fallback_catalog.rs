//! Built-in recipes served when the provider is unreachable, and for
//! offline browsing.

use std::collections::HashSet;

use crate::recipe::Recipe;

struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    image: &'static str,
    ingredients: &'static [&'static str],
    instructions: &'static [&'static str],
    ready_in_minutes: u32,
    servings: u32,
    calories: f64,
    summary: &'static str,
}

impl CatalogEntry {
    fn to_recipe(&self) -> Recipe {
        Recipe {
            id: self.id.to_string(),
            title: self.title.to_string(),
            image: self.image.to_string(),
            ingredients: self.ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: self.instructions.iter().map(|s| s.to_string()).collect(),
            ready_in_minutes: self.ready_in_minutes,
            servings: self.servings,
            calories: self.calories,
            summary: self.summary.to_string(),
            is_saved: false,
        }
    }
}

const ENTRIES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "1",
        title: "Asian Chicken Stir Fry",
        image: "https://images.unsplash.com/photo-1603133872878-684f208fb84b?w=800",
        ingredients: &[
            "2 chicken breasts, sliced",
            "1 red bell pepper, sliced",
            "1 cup broccoli florets",
            "3 tbsp soy sauce",
            "1 tbsp sesame oil",
            "2 cloves garlic, minced",
            "1 tsp grated ginger",
        ],
        instructions: &[
            "Heat the sesame oil in a wok over high heat.",
            "Stir fry the chicken until golden and cooked through, about 6 minutes.",
            "Add the garlic, ginger, pepper and broccoli and cook for 3 minutes.",
            "Stir in the soy sauce and toss until everything is glazed.",
            "Serve over steamed rice.",
        ],
        ready_in_minutes: 25,
        servings: 4,
        calories: 320.0,
        summary: "A quick <b>weeknight</b> stir fry with crisp vegetables and a savory soy glaze.",
    },
    CatalogEntry {
        id: "2",
        title: "Creamy Garlic Pasta",
        image: "https://images.unsplash.com/photo-1621996346565-e3dbc646d9a9?w=800",
        ingredients: &[
            "12 oz penne pasta",
            "4 cloves garlic, minced",
            "2 tbsp butter",
            "1 cup heavy cream",
            "1/2 cup grated parmesan",
            "Salt and pepper",
        ],
        instructions: &[
            "Cook the pasta in salted boiling water until al dente.",
            "Melt the butter and gently fry the garlic until fragrant.",
            "Pour in the cream and simmer for 3 minutes.",
            "Stir in the parmesan, then toss with the drained pasta.",
            "Season with salt and pepper and serve.",
        ],
        ready_in_minutes: 20,
        servings: 4,
        calories: 540.0,
        summary: "Comforting pasta in a rich <i>garlic parmesan</i> sauce.",
    },
    CatalogEntry {
        id: "3",
        title: "Beef Tacos",
        image: "https://images.unsplash.com/photo-1565299585323-38d6b0865b47?w=800",
        ingredients: &[
            "1 lb ground beef",
            "8 small tortillas",
            "1 packet taco seasoning",
            "1 cup shredded lettuce",
            "1 cup shredded cheddar",
            "1/2 cup salsa",
        ],
        instructions: &[
            "Brown the ground beef in a skillet and drain the fat.",
            "Add the taco seasoning with a splash of water and simmer for 5 minutes.",
            "Warm the tortillas.",
            "Fill the tortillas with beef, lettuce, cheese and salsa.",
        ],
        ready_in_minutes: 20,
        servings: 4,
        calories: 450.0,
        summary: "Classic <b>taco night</b> with seasoned beef and fresh toppings.",
    },
    CatalogEntry {
        id: "4",
        title: "Hearty Vegetable Soup",
        image: "https://images.unsplash.com/photo-1547592166-23ac45744acd?w=800",
        ingredients: &[
            "2 carrots, diced",
            "2 celery stalks, diced",
            "1 onion, diced",
            "1 can diced tomatoes",
            "4 cups vegetable broth",
            "1 cup green beans",
            "1 tsp dried thyme",
        ],
        instructions: &[
            "Sweat the onion, carrot and celery in a little oil for 5 minutes.",
            "Add the tomatoes, broth and thyme and bring to a boil.",
            "Add the green beans and simmer for 20 minutes.",
            "Season and serve hot.",
        ],
        ready_in_minutes: 40,
        servings: 6,
        calories: 150.0,
        summary: "A light, warming soup packed with <i>garden vegetables</i>.",
    },
    CatalogEntry {
        id: "5",
        title: "Classic Caesar Salad",
        image: "https://images.unsplash.com/photo-1550304943-4f24f54ddde9?w=800",
        ingredients: &[
            "1 head romaine lettuce",
            "1 cup croutons",
            "1/2 cup shaved parmesan",
            "1/3 cup caesar dressing",
            "1 lemon",
        ],
        instructions: &[
            "Wash, dry and chop the lettuce.",
            "Toss the lettuce with the dressing and a squeeze of lemon.",
            "Top with croutons and parmesan.",
        ],
        ready_in_minutes: 15,
        servings: 2,
        calories: 280.0,
        summary: "Crisp romaine with a tangy dressing and crunchy croutons.",
    },
    CatalogEntry {
        id: "6",
        title: "Fluffy Buttermilk Pancakes",
        image: "https://images.unsplash.com/photo-1567620905732-2d1ec7ab7445?w=800",
        ingredients: &[
            "2 cups all-purpose flour",
            "2 eggs",
            "1 1/2 cups milk",
            "2 tbsp sugar",
            "2 tsp baking powder",
            "3 tbsp melted butter",
        ],
        instructions: &[
            "Whisk the flour, sugar and baking powder together.",
            "Beat the eggs with the milk and melted butter.",
            "Fold the wet ingredients into the dry until just combined.",
            "Cook ladlefuls on a hot griddle until bubbles form, then flip.",
        ],
        ready_in_minutes: 25,
        servings: 4,
        calories: 350.0,
        summary: "Tall, tender <b>breakfast</b> pancakes.",
    },
    CatalogEntry {
        id: "7",
        title: "Chicken Tikka Masala",
        image: "https://images.unsplash.com/photo-1565557623262-b51c2513a641?w=800",
        ingredients: &[
            "1.5 lbs chicken thighs, cubed",
            "1 cup plain yogurt",
            "2 tbsp garam masala",
            "1 can tomato sauce",
            "1 cup heavy cream",
            "1 onion, diced",
            "3 cloves garlic, minced",
        ],
        instructions: &[
            "Marinate the chicken in yogurt and half the garam masala for 30 minutes.",
            "Sear the chicken until charred at the edges and set aside.",
            "Soften the onion and garlic, then add the remaining spices.",
            "Add the tomato sauce and cream and simmer for 10 minutes.",
            "Return the chicken to the sauce and cook through.",
        ],
        ready_in_minutes: 60,
        servings: 4,
        calories: 490.0,
        summary: "Tender chicken in a creamy, spiced <i>tomato</i> sauce.",
    },
    CatalogEntry {
        id: "8",
        title: "Spaghetti Carbonara",
        image: "https://images.unsplash.com/photo-1612874742237-6526221588e3?w=800",
        ingredients: &[
            "12 oz spaghetti pasta",
            "4 oz pancetta, diced",
            "3 egg yolks",
            "1 cup grated pecorino",
            "Black pepper",
        ],
        instructions: &[
            "Cook the spaghetti until al dente, reserving a cup of pasta water.",
            "Crisp the pancetta in a large pan.",
            "Whisk the yolks with the pecorino and plenty of pepper.",
            "Off the heat, toss the pasta with the pancetta and egg mixture, loosening with pasta water.",
        ],
        ready_in_minutes: 25,
        servings: 4,
        calories: 610.0,
        summary: "Roman-style pasta with a silky egg and cheese sauce.",
    },
    CatalogEntry {
        id: "9",
        title: "Greek Salad",
        image: "https://images.unsplash.com/photo-1540420773420-3366772f4999?w=800",
        ingredients: &[
            "2 tomatoes, cut into wedges",
            "1 cucumber, sliced",
            "1/2 red onion, sliced",
            "1/2 cup kalamata olives",
            "4 oz feta cheese",
            "3 tbsp olive oil",
        ],
        instructions: &[
            "Combine the tomatoes, cucumber, onion and olives in a bowl.",
            "Top with the feta.",
            "Drizzle with olive oil and season with oregano.",
        ],
        ready_in_minutes: 10,
        servings: 2,
        calories: 260.0,
        summary: "A bright <b>Mediterranean</b> salad.",
    },
    CatalogEntry {
        id: "10",
        title: "Lemon Herb Salmon",
        image: "https://images.unsplash.com/photo-1467003909585-2f8a72700288?w=800",
        ingredients: &[
            "4 salmon fillets",
            "2 lemons",
            "2 tbsp chopped dill",
            "2 tbsp olive oil",
            "2 cloves garlic, minced",
        ],
        instructions: &[
            "Heat the oven to 400°F (200°C).",
            "Lay the salmon on a lined tray and brush with oil, garlic and lemon juice.",
            "Bake for 12 to 15 minutes until it flakes easily.",
            "Scatter with dill and serve with lemon wedges.",
        ],
        ready_in_minutes: 20,
        servings: 4,
        calories: 380.0,
        summary: "Oven-baked salmon with fresh <i>lemon and dill</i>.",
    },
    CatalogEntry {
        id: "11",
        title: "Chocolate Chip Cookies",
        image: "https://images.unsplash.com/photo-1499636136210-6f4ee915583e?w=800",
        ingredients: &[
            "2 1/4 cups flour",
            "1 cup butter, softened",
            "3/4 cup brown sugar",
            "2 eggs",
            "2 cups chocolate chips",
            "1 tsp baking soda",
        ],
        instructions: &[
            "Cream the butter and sugar until fluffy.",
            "Beat in the eggs, then mix in the flour and baking soda.",
            "Fold in the chocolate chips.",
            "Bake spoonfuls at 375°F (190°C) for 9 to 11 minutes.",
        ],
        ready_in_minutes: 30,
        servings: 24,
        calories: 180.0,
        summary: "Chewy <b>dessert</b> cookies loaded with chocolate.",
    },
    CatalogEntry {
        id: "12",
        title: "Berry Yogurt Parfait",
        image: "https://images.unsplash.com/photo-1488477181946-6428a0291777?w=800",
        ingredients: &[
            "2 cups greek yogurt",
            "1 cup mixed berries",
            "1/2 cup granola",
            "2 tbsp honey",
        ],
        instructions: &[
            "Layer yogurt, berries and granola in glasses.",
            "Drizzle with honey and serve immediately.",
        ],
        ready_in_minutes: 5,
        servings: 2,
        calories: 300.0,
        summary: "A no-cook <i>breakfast</i> of yogurt, fruit and crunch.",
    },
];

/// Ingredient keyword to catalog positions. Matching is by substring, so
/// "chicken breast" hits the `chicken` row.
const KEYWORD_INDEX: &[(&str, &[usize])] = &[
    ("chicken", &[0, 6]),
    ("pasta", &[1, 7]),
    ("spaghetti", &[7]),
    ("beef", &[2]),
    ("vegetable", &[3]),
    ("tomato", &[3]),
    ("salad", &[4]),
    ("lettuce", &[4]),
    ("flour", &[5]),
    ("egg", &[5]),
    ("milk", &[5]),
];

/// The full built-in catalog in display order.
pub fn all() -> Vec<Recipe> {
    ENTRIES.iter().map(CatalogEntry::to_recipe).collect()
}

pub fn find_by_id(id: &str) -> Option<Recipe> {
    ENTRIES
        .iter()
        .find(|entry| entry.id == id)
        .map(CatalogEntry::to_recipe)
}

/// Catalog entries matching any of `keywords`.
///
/// Never returns an empty list: when nothing matches, the whole catalog
/// is returned instead.
pub fn filter_by_ingredients<S: AsRef<str>>(keywords: &[S]) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    for keyword in keywords {
        let keyword = keyword.as_ref().trim().to_lowercase();
        if keyword.is_empty() {
            continue;
        }
        for (key, indices) in KEYWORD_INDEX {
            if !keyword.contains(key) {
                continue;
            }
            for &index in indices.iter() {
                if seen.insert(index) {
                    if let Some(entry) = ENTRIES.get(index) {
                        matched.push(entry.to_recipe());
                    }
                }
            }
        }
    }

    if matched.is_empty() {
        all()
    } else {
        matched
    }
}
