use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_NUM_RECIPES: u32 = 5;

fn default_num_recipes() -> u32 {
    DEFAULT_NUM_RECIPES
}

#[derive(Debug, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RequestIdParams {
    /// Request to read; the most recent one when omitted
    #[schema(example = "fridge_1717171717_abc123")]
    pub request_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AnalyzeImageParams {
    /// Run the analysis in the background and answer 202 immediately
    #[serde(default)]
    pub async_processing: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct GenerateRecipesRequest {
    #[serde(default = "default_num_recipes")]
    #[validate(range(min = 1, max = 20, message = "num_recipes must be between 1 and 20"))]
    #[schema(example = 5)]
    pub num_recipes: u32,
    #[serde(default)]
    pub request_id: Option<String>,
}

impl Default for GenerateRecipesRequest {
    fn default() -> Self {
        Self {
            num_recipes: DEFAULT_NUM_RECIPES,
            request_id: None,
        }
    }
}
