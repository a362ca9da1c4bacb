use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Response as AxumResponse},
};
use fridgechef_core::domain::{
    ingredients::entities::{IngredientSet, IngredientSummary},
    kitchen::{ports::KitchenService, value_objects::SubmitImageInput},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::{
    kitchen::validators::AnalyzeImageParams,
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
        http_server::MAX_UPLOAD_BYTES,
    },
};

/// Multipart form of the upload.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageUpload {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeImageResponse {
    pub status: String,
    pub result: IngredientSet,
    pub summary: IngredientSummary,
    pub image_filename: String,
    pub request_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeImageAccepted {
    pub status: String,
    pub message: String,
    pub image_filename: String,
    pub request_id: String,
}

#[utoipa::path(
    post,
    path = "/analyze-image",
    tag = "kitchen",
    summary = "Analyze a fridge photo",
    description = "Stores the uploaded image under a new request and detects its ingredients",
    params(AnalyzeImageParams),
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = AnalyzeImageResponse),
        (status = 202, body = AnalyzeImageAccepted),
        (status = 400, body = ApiErrorResponse),
        (status = 500, body = ApiErrorResponse)
    ),
)]
pub async fn analyze_image(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeImageParams>,
    mut multipart: Multipart,
) -> Result<AxumResponse, ApiError> {
    let mut upload: Option<SubmitImageInput> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        if filename.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ApiError::BadRequest("No file selected".to_string()));
        }

        let image_data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;

        if image_data.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::BadRequest(format!(
                "Image too large. Max size is {} bytes",
                MAX_UPLOAD_BYTES
            )));
        }

        upload = Some(SubmitImageInput {
            filename,
            image_data,
        });
    }

    let upload =
        upload.ok_or_else(|| ApiError::BadRequest("No file part in the request".to_string()))?;

    let paths = state.service.submit_image(upload).await?;
    let image_filename = paths.image_name().to_string();

    if params.async_processing {
        let service = state.service.clone();
        let background_paths = paths.clone();
        tokio::spawn(async move {
            if let Err(e) = service.analyze_request(&background_paths).await {
                tracing::error!(
                    request_id = %background_paths.request_id,
                    error = %e,
                    "Background analysis failed"
                );
            }
        });

        return Ok(Response::Accepted(AnalyzeImageAccepted {
            status: "processing".to_string(),
            message: "Image uploaded. Analysis is running in the background.".to_string(),
            image_filename,
            request_id: paths.request_id,
        })
        .into_response());
    }

    let outcome = state.service.analyze_request(&paths).await?;

    Ok(Response::OK(AnalyzeImageResponse {
        status: "complete".to_string(),
        result: outcome.ingredients,
        summary: outcome.summary,
        image_filename,
        request_id: outcome.paths.request_id,
    })
    .into_response())
}
