use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    ingredients::entities::IngredientSet,
    kitchen::value_objects::{AnalysisOutcome, SubmitImageInput},
    recipe::entities::RecipesArtifact,
    request::entities::{RequestLookup, RequestPaths, RequestStatus},
};

/// Request lifecycle: upload, analysis, recipe generation and retrieval.
#[cfg_attr(test, mockall::automock)]
pub trait KitchenService: Send + Sync {
    /// Allocates a request, stores the image and marks it pending.
    fn submit_image(
        &self,
        input: SubmitImageInput,
    ) -> impl Future<Output = Result<RequestPaths, CoreError>> + Send;

    /// Runs the vision model on a stored image and persists the ingredients.
    /// The status record ends up `complete` or `failed`.
    fn analyze_request(
        &self,
        paths: &RequestPaths,
    ) -> impl Future<Output = Result<AnalysisOutcome, CoreError>> + Send;

    fn get_ingredients(
        &self,
        lookup: RequestLookup,
    ) -> impl Future<Output = Result<(RequestPaths, IngredientSet), CoreError>> + Send;

    fn get_recipes(
        &self,
        lookup: RequestLookup,
    ) -> impl Future<Output = Result<(RequestPaths, RecipesArtifact), CoreError>> + Send;

    /// Generates recipes from the persisted ingredients and overwrites the
    /// recipes artifact.
    fn suggest_recipes(
        &self,
        lookup: RequestLookup,
        num_recipes: u32,
    ) -> impl Future<Output = Result<(RequestPaths, RecipesArtifact), CoreError>> + Send;

    fn get_status(
        &self,
        lookup: RequestLookup,
    ) -> impl Future<Output = Result<RequestStatus, CoreError>> + Send;
}
