use axum::extract::{Query, State};
use fridgechef_core::domain::{
    ingredients::entities::IngredientSet, kitchen::ports::KitchenService,
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
    path = "/ingredients",
    tag = "kitchen",
    summary = "Get detected ingredients",
    params(RequestIdParams),
    responses(
        (status = 200, body = IngredientSet),
        (status = 404, body = ApiErrorResponse)
    ),
)]
pub async fn get_ingredients(
    State(state): State<AppState>,
    Query(params): Query<RequestIdParams>,
) -> Result<Response<IngredientSet>, ApiError> {
    let (_, ingredients) = state
        .service
        .get_ingredients(RequestLookup::from(params.request_id))
        .await?;

    Ok(Response::OK(ingredients))
}
