use axum::extract::{Query, State};
use fridgechef_core::domain::{
    kitchen::ports::KitchenService,
    request::entities::{RequestLookup, RequestStatus},
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
    path = "/status",
    tag = "kitchen",
    summary = "Get analysis progress",
    description = "Pending while a background analysis runs, then complete or failed with a reason",
    params(RequestIdParams),
    responses(
        (status = 200, body = RequestStatus),
        (status = 404, body = ApiErrorResponse)
    ),
)]
pub async fn get_status(
    State(state): State<AppState>,
    Query(params): Query<RequestIdParams>,
) -> Result<Response<RequestStatus>, ApiError> {
    let status = state
        .service
        .get_status(RequestLookup::from(params.request_id))
        .await?;

    Ok(Response::OK(status))
}
