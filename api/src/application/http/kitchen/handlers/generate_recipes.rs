use axum::extract::State;
use bytes::Bytes;
use fridgechef_core::domain::{
    kitchen::ports::KitchenService, recipe::entities::RecipesArtifact,
    request::entities::RequestLookup,
};
use validator::Validate;

use crate::application::http::{
    kitchen::validators::GenerateRecipesRequest,
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/generate-recipes",
    tag = "kitchen",
    summary = "Generate recipes",
    description = "Suggests recipes from the stored ingredients of a request and overwrites its recipes",
    request_body = GenerateRecipesRequest,
    responses(
        (status = 200, body = RecipesArtifact),
        (status = 400, body = ApiErrorResponse),
        (status = 404, body = ApiErrorResponse),
        (status = 500, body = ApiErrorResponse)
    ),
)]
pub async fn generate_recipes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response<RecipesArtifact>, ApiError> {
    let payload = parse_payload(&body)?;

    let (_, recipes) = state
        .service
        .suggest_recipes(RequestLookup::from(payload.request_id), payload.num_recipes)
        .await?;

    Ok(Response::OK(recipes))
}

/// An empty body asks for the defaults.
fn parse_payload(body: &[u8]) -> Result<GenerateRecipesRequest, ApiError> {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateRecipesRequest::default()
    } else {
        serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?
    };

    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_uses_defaults() {
        let payload = parse_payload(b"").unwrap();
        assert_eq!(payload.num_recipes, 5);
        assert!(payload.request_id.is_none());
    }

    #[test]
    fn test_invalid_bodies_are_rejected() {
        assert!(matches!(
            parse_payload(b"{not json"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            parse_payload(br#"{"num_recipes": 50}"#),
            Err(ApiError::BadRequest(_))
        ));
    }
}
