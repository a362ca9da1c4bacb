use utoipa::OpenApi;

use crate::application::http::{health::__path_health, kitchen::router::KitchenApiDoc};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FridgeChef API"
    ),
    paths(health)
)]
pub struct ApiDoc;

/// Full document: the base [`ApiDoc`] with every feature router's paths.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.merge(KitchenApiDoc::openapi());
    openapi
}
