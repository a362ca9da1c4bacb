use std::future::Future;

use crate::domain::{common::entities::app_errors::CoreError, recipe::entities::RecipeSet};

/// Recipe collaborator: suggests recipes for a list of ingredients.
pub trait RecipeService: Send + Sync {
    /// `num_recipes` is a hint; the model may return fewer or more.
    fn generate_recipes(
        &self,
        ingredients: Vec<String>,
        num_recipes: u32,
    ) -> impl Future<Output = Result<RecipeSet, CoreError>> + Send;
}
