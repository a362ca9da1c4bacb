use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Categorized ingredients as reported by the vision model.
///
/// Category names and items are free-form model text. A response without an
/// `ingredients` key decodes as an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientSet {
    #[serde(default)]
    pub ingredients: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientSummary {
    pub total_count: usize,
    pub category_count: usize,
    pub counts_by_category: BTreeMap<String, usize>,
}

impl IngredientSet {
    pub fn summarize(&self) -> IngredientSummary {
        let counts_by_category: BTreeMap<String, usize> = self
            .ingredients
            .iter()
            .map(|(category, items)| (category.clone(), items.len()))
            .collect();

        IngredientSummary {
            total_count: counts_by_category.values().sum(),
            category_count: counts_by_category.len(),
            counts_by_category,
        }
    }

    /// All items across categories, in category order.
    pub fn flatten(&self) -> Vec<String> {
        self.ingredients.values().flatten().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fridge() -> IngredientSet {
        serde_json::from_str(
            r#"{"ingredients": {"Dairy": ["milk", "cheese"], "Produce": ["apple"]}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let summary = fridge().summarize();

        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.category_count, 2);
        assert_eq!(summary.counts_by_category["Dairy"], 2);
        assert_eq!(summary.counts_by_category["Produce"], 1);
    }

    #[test]
    fn test_missing_ingredients_key_is_empty() {
        let set: IngredientSet = serde_json::from_str(r#"{"note": "blurry photo"}"#).unwrap();

        assert!(set.ingredients.is_empty());
        assert_eq!(set.summarize(), IngredientSummary::default());
    }

    #[test]
    fn test_flatten_keeps_duplicates() {
        let mut set = fridge();
        set.ingredients
            .get_mut("Produce")
            .unwrap()
            .push("apple".to_string());

        assert_eq!(set.flatten(), vec!["milk", "cheese", "apple", "apple"]);
    }
}
