use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Difficulty {
    #[serde(alias = "easy", alias = "EASY")]
    Easy,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "hard", alias = "HARD")]
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

/// A suggested recipe. `available_ingredients` and `missing_ingredients`
/// are expected to partition `total_ingredients`; the model asserts this,
/// nothing here checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    pub name: String,
    pub total_ingredients: Vec<String>,
    pub available_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    /// Percentage (0-100) of the required ingredients already available.
    pub completeness_score: f64,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub cooking_time: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeSet {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

/// One row of the recipe statistics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeAnalysisRow {
    pub recipe_name: String,
    pub completeness: f64,
    pub available_count: usize,
    pub missing_count: usize,
    pub total_ingredients: usize,
    pub cooking_time: String,
    pub difficulty: Difficulty,
}

impl From<&Recipe> for RecipeAnalysisRow {
    fn from(recipe: &Recipe) -> Self {
        Self {
            recipe_name: recipe.name.clone(),
            completeness: recipe.completeness_score,
            available_count: recipe.available_ingredients.len(),
            missing_count: recipe.missing_ingredients.len(),
            total_ingredients: recipe.total_ingredients.len(),
            cooking_time: recipe.cooking_time.clone(),
            difficulty: recipe.difficulty,
        }
    }
}

impl RecipeSet {
    pub fn analyze(&self) -> Vec<RecipeAnalysisRow> {
        self.recipes.iter().map(RecipeAnalysisRow::from).collect()
    }
}

/// Persisted and returned result of a recipe generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipesArtifact {
    pub items: Vec<Recipe>,
    pub analysis: Vec<RecipeAnalysisRow>,
    pub ingredient_count: usize,
}

impl RecipesArtifact {
    pub fn new(recipe_set: RecipeSet, ingredient_count: usize) -> Self {
        Self {
            analysis: recipe_set.analyze(),
            items: recipe_set.recipes,
            ingredient_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OMELETTE: &str = r#"{
        "recipes": [{
            "name": "Spinach Omelette",
            "total_ingredients": ["eggs", "spinach", "feta"],
            "available_ingredients": ["eggs", "spinach"],
            "missing_ingredients": ["feta"],
            "completeness_score": 67,
            "instructions": ["Whisk eggs", "Cook with spinach"],
            "cooking_time": "15 minutes",
            "difficulty": "easy"
        }]
    }"#;

    #[test]
    fn test_analysis_projects_counts() {
        let set: RecipeSet = serde_json::from_str(OMELETTE).unwrap();

        let rows = set.analyze();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].recipe_name, "Spinach Omelette");
        assert_eq!(rows[0].completeness, 67.0);
        assert_eq!(rows[0].available_count, 2);
        assert_eq!(rows[0].missing_count, 1);
        assert_eq!(rows[0].total_ingredients, 3);
        assert_eq!(rows[0].difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_empty_set_has_empty_analysis() {
        let set: RecipeSet = serde_json::from_str(r#"{"recipes": []}"#).unwrap();
        assert!(set.analyze().is_empty());
        assert!(RecipeSet::default().analyze().is_empty());
    }

    #[test]
    fn test_artifact_wraps_items_and_analysis() {
        let set: RecipeSet = serde_json::from_str(OMELETTE).unwrap();

        let artifact = RecipesArtifact::new(set, 12);
        let value = serde_json::to_value(&artifact).unwrap();

        assert_eq!(value["ingredient_count"], 12);
        assert_eq!(value["items"][0]["difficulty"], "Easy");
        assert_eq!(value["analysis"][0]["missing_count"], 1);
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let raw = OMELETTE.replace("\"easy\"", "\"Impossible\"");
        assert!(serde_json::from_str::<RecipeSet>(&raw).is_err());
    }
}
