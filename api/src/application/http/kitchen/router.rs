use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;

use super::handlers::{
    analyze_image::{__path_analyze_image, analyze_image},
    generate_recipes::{__path_generate_recipes, generate_recipes},
    get_ingredients::{__path_get_ingredients, get_ingredients},
    get_recipes::{__path_get_recipes, get_recipes},
    get_status::{__path_get_status, get_status},
};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(
    analyze_image,
    get_ingredients,
    get_recipes,
    generate_recipes,
    get_status
))]
pub struct KitchenApiDoc;

pub fn kitchen_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(&format!("{}/analyze-image", root_path), post(analyze_image))
        .route(&format!("{}/ingredients", root_path), get(get_ingredients))
        .route(&format!("{}/recipes", root_path), get(get_recipes))
        .route(
            &format!("{}/generate-recipes", root_path),
            post(generate_recipes),
        )
        .route(&format!("{}/status", root_path), get(get_status))
}
