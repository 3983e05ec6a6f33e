use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tool::{ToolError, ToolResult};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RecipeInput {
    /// Type of cuisine, e.g. "Italian" or "Japanese". Defaults to Italian.
    #[serde(default)]
    pub cuisine: Option<String>,
    /// Dietary preference, e.g. "vegetarian". Defaults to "regular".
    #[serde(default)]
    pub dietary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub prep_time: String,
    pub servings: u32,
    pub dietary: String,
}

pub fn create_recipe(input: RecipeInput) -> Result<ToolResult, ToolError> {
    ToolResult::json(build(input))
}

pub(crate) fn build(input: RecipeInput) -> Recipe {
    let dietary = input
        .dietary
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| "regular".to_string());

    let cuisine = input.cuisine.unwrap_or_default().to_lowercase();
    match cuisine.trim() {
        "japanese" => Recipe {
            name: "Simple Chicken Teriyaki".to_string(),
            ingredients: strings(&[
                "2 chicken breasts",
                "1/4 cup soy sauce",
                "2 tbsp mirin",
                "1 tbsp sugar",
                "1 tsp sesame oil",
                "Green onions for garnish",
            ]),
            steps: strings(&[
                "Cut chicken into bite-sized pieces",
                "Mix soy sauce, mirin, and sugar for sauce",
                "Cook chicken in sesame oil until golden",
                "Add sauce and simmer until glazed",
                "Garnish with chopped green onions",
            ]),
            prep_time: "15 minutes".to_string(),
            servings: 2,
            dietary,
        },
        // Italian is also the fallback for unknown cuisines
        _ => Recipe {
            name: "Classic Pasta Marinara".to_string(),
            ingredients: strings(&[
                "2 cups penne pasta",
                "1 cup marinara sauce",
                "1/2 cup parmesan cheese",
                "Fresh basil leaves",
                "2 tbsp olive oil",
                "2 cloves garlic",
            ]),
            steps: strings(&[
                "Boil salted water and cook pasta al dente",
                "Heat olive oil and sauté minced garlic",
                "Add marinara sauce and simmer",
                "Toss pasta with sauce",
                "Top with parmesan and fresh basil",
            ]),
            prep_time: "20 minutes".to_string(),
            servings: 4,
            dietary,
        },
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
