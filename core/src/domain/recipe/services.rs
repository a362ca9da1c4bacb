use tracing::instrument;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    llm::ports::LLMClient,
    recipe::{
        entities::RecipeSet,
        ports::RecipeService,
        prompts::{RECIPE_MAX_TOKENS, RECIPE_SYSTEM_PROMPT, recipe_user_prompt},
    },
    storage::ports::ArtifactStore,
};

impl<S, L> RecipeService for Service<S, L>
where
    S: ArtifactStore,
    L: LLMClient,
{
    #[instrument(skip(self, ingredients), fields(ingredients = ingredients.len()))]
    async fn generate_recipes(
        &self,
        ingredients: Vec<String>,
        num_recipes: u32,
    ) -> Result<RecipeSet, CoreError> {
        let raw_response = self
            .llm_client
            .generate_with_text(
                RECIPE_SYSTEM_PROMPT.to_string(),
                recipe_user_prompt(&ingredients, num_recipes),
                RECIPE_MAX_TOKENS,
            )
            .await
            .map_err(|e| CoreError::Generation(e.to_string()))?;

        let recipe_set: RecipeSet = serde_json::from_str(&raw_response).map_err(|e| {
            tracing::error!("Invalid recipes format: {}", e);
            CoreError::Generation(format!("Invalid recipes format: {}", e))
        })?;

        tracing::info!(
            requested = num_recipes,
            returned = recipe_set.recipes.len(),
            "Recipes generated"
        );

        Ok(recipe_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{llm::ports::MockLLMClient, storage::ports::MockArtifactStore};

    #[tokio::test]
    async fn test_prompt_lists_ingredients_and_count() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .withf(|system_prompt, user_prompt, max_tokens| {
                system_prompt == RECIPE_SYSTEM_PROMPT
                    && user_prompt.contains("milk, eggs")
                    && user_prompt.contains("suggest 3 diverse recipes")
                    && *max_tokens == RECIPE_MAX_TOKENS
            })
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(r#"{"recipes": []}"#.to_string()) }));
        let service = Service::new(MockArtifactStore::new(), llm);

        let set = service
            .generate_recipes(vec!["milk".to_string(), "eggs".to_string()], 3)
            .await
            .unwrap();

        assert!(set.recipes.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_recipes_are_generation_error() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(r#"{"recipes": [{"name": 1}]}"#.to_string()) }));
        let service = Service::new(MockArtifactStore::new(), llm);

        let err = service
            .generate_recipes(vec!["milk".to_string()], 1)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Generation(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_generation_error() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().times(1).returning(|_, _, _| {
            Box::pin(async { Err(CoreError::ExternalService("rate limited".to_string())) })
        });
        let service = Service::new(MockArtifactStore::new(), llm);

        let err = service
            .generate_recipes(vec!["milk".to_string()], 1)
            .await
            .unwrap_err();

        match err {
            CoreError::Generation(message) => assert!(message.contains("rate limited")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
