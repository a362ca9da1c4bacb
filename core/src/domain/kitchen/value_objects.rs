use bytes::Bytes;

use crate::domain::{
    ingredients::entities::{IngredientSet, IngredientSummary},
    request::entities::RequestPaths,
};

#[derive(Debug, Clone)]
pub struct SubmitImageInput {
    /// Client supplied name of the upload, used to derive the request suffix.
    pub filename: Option<String>,
    pub image_data: Bytes,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub paths: RequestPaths,
    pub ingredients: IngredientSet,
    pub summary: IngredientSummary,
}
