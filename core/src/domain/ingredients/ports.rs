use std::future::Future;

use crate::domain::{common::entities::app_errors::CoreError, ingredients::entities::IngredientSet};

/// Vision collaborator: turns a photograph into categorized ingredients.
pub trait VisionService: Send + Sync {
    /// One blocking model call, no retry. Transport and decoding failures
    /// surface as `CoreError::Analysis`.
    fn analyze_image(
        &self,
        image_data: Vec<u8>,
    ) -> impl Future<Output = Result<IngredientSet, CoreError>> + Send;
}
