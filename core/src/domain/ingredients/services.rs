use tracing::instrument;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    ingredients::{
        entities::IngredientSet,
        ports::VisionService,
        prompts::{VISION_MAX_TOKENS, VISION_SYSTEM_PROMPT, VISION_USER_PROMPT},
    },
    llm::ports::LLMClient,
    storage::ports::ArtifactStore,
};

impl<S, L> VisionService for Service<S, L>
where
    S: ArtifactStore,
    L: LLMClient,
{
    #[instrument(skip(self, image_data), fields(size = image_data.len()))]
    async fn analyze_image(&self, image_data: Vec<u8>) -> Result<IngredientSet, CoreError> {
        let raw_response = self
            .llm_client
            .generate_with_image(
                VISION_SYSTEM_PROMPT.to_string(),
                VISION_USER_PROMPT.to_string(),
                image_data,
                VISION_MAX_TOKENS,
            )
            .await
            .map_err(|e| CoreError::Analysis(e.to_string()))?;

        let ingredients = parse_ingredients(&raw_response)?;

        tracing::info!(
            categories = ingredients.ingredients.len(),
            "Image analyzed"
        );

        Ok(ingredients)
    }
}

fn parse_ingredients(raw_response: &str) -> Result<IngredientSet, CoreError> {
    serde_json::from_str(raw_response).map_err(|e| {
        tracing::error!("Failed to parse vision response: {}", e);
        CoreError::Analysis(format!("Failed to parse model response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{llm::ports::MockLLMClient, storage::ports::MockArtifactStore};

    fn service_replying(
        reply: Result<String, CoreError>,
    ) -> Service<MockArtifactStore, MockLLMClient> {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_image()
            .withf(|system_prompt, _, image_data, max_tokens| {
                system_prompt == VISION_SYSTEM_PROMPT
                    && image_data.as_slice() == b"jpeg"
                    && *max_tokens == VISION_MAX_TOKENS
            })
            .times(1)
            .return_once(move |_, _, _, _| Box::pin(async move { reply }));
        llm.expect_generate_with_text().never();

        Service::new(MockArtifactStore::new(), llm)
    }

    #[tokio::test]
    async fn test_analyze_image_decodes_categories() {
        let service = service_replying(Ok(
            r#"{"ingredients": {"Produce": ["apple", "kale"]}}"#.to_string()
        ));

        let set = service.analyze_image(b"jpeg".to_vec()).await.unwrap();

        assert_eq!(set.ingredients["Produce"], vec!["apple", "kale"]);
    }

    #[tokio::test]
    async fn test_missing_ingredients_key_is_not_an_error() {
        let service = service_replying(Ok(r#"{"items": []}"#.to_string()));

        let set = service.analyze_image(b"jpeg".to_vec()).await.unwrap();

        assert_eq!(set.summarize().total_count, 0);
    }

    #[tokio::test]
    async fn test_malformed_response_is_analysis_error() {
        let service = service_replying(Ok("I see a fridge".to_string()));

        let err = service.analyze_image(b"jpeg".to_vec()).await.unwrap_err();

        assert!(matches!(err, CoreError::Analysis(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_analysis_error() {
        let service = service_replying(Err(CoreError::ExternalService(
            "connection refused".to_string(),
        )));

        let err = service.analyze_image(b"jpeg".to_vec()).await.unwrap_err();

        match err {
            CoreError::Analysis(message) => assert!(message.contains("connection refused")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
