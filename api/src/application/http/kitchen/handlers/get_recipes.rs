use axum::extract::{Query, State};
use fridgechef_core::domain::{
    kitchen::ports::KitchenService, recipe::entities::RecipesArtifact,
    request::entities::RequestLookup,
};

use crate::application::http::{
    kitchen::validators::RequestIdParams,
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    get,
    path = "/recipes",
    tag = "kitchen",
    summary = "Get generated recipes",
    params(RequestIdParams),
    responses(
        (status = 200, body = RecipesArtifact),
        (status = 404, body = ApiErrorResponse)
    ),
)]
pub async fn get_recipes(
    State(state): State<AppState>,
    Query(params): Query<RequestIdParams>,
) -> Result<Response<RecipesArtifact>, ApiError> {
    let (_, recipes) = state
        .service
        .get_recipes(RequestLookup::from(params.request_id))
        .await?;

    Ok(Response::OK(recipes))
}
