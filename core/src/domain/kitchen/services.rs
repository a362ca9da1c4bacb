use tracing::instrument;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    ingredients::{entities::IngredientSet, ports::VisionService},
    kitchen::{
        ports::KitchenService,
        value_objects::{AnalysisOutcome, SubmitImageInput},
    },
    llm::ports::LLMClient,
    recipe::{entities::RecipesArtifact, ports::RecipeService},
    request::entities::{RequestLookup, RequestPaths, RequestState, RequestStatus},
    storage::ports::{ArtifactStore, ArtifactStoreExt},
};

impl<S, L> Service<S, L>
where
    S: ArtifactStore,
    L: LLMClient,
{
    async fn write_status(
        &self,
        paths: &RequestPaths,
        status: &RequestStatus,
    ) -> Result<(), CoreError> {
        self.artifact_store
            .write_json(&paths.status_path(), status)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    request_id = %paths.request_id,
                    state = ?status.state,
                    error = %e,
                    "Failed to write request status"
                );
            })
    }

    async fn read_ingredients(&self, paths: &RequestPaths) -> Result<IngredientSet, CoreError> {
        self.artifact_store
            .read_json(&paths.ingredients_path)
            .await
            .map_err(|e| match e {
                CoreError::NotFound(_) => CoreError::NotFound(format!(
                    "No ingredients analysis found for request {}. Please analyze an image first.",
                    paths.request_id
                )),
                other => other,
            })
    }
}

impl<S, L> KitchenService for Service<S, L>
where
    S: ArtifactStore,
    L: LLMClient,
{
    #[instrument(skip(self, input), fields(filename = ?input.filename, size = input.image_data.len()))]
    async fn submit_image(&self, input: SubmitImageInput) -> Result<RequestPaths, CoreError> {
        if input.image_data.is_empty() {
            return Err(CoreError::Invalid("Uploaded image is empty".to_string()));
        }

        let paths = self
            .resolver
            .resolve_for_new_request(input.filename.as_deref())
            .await?;

        if let Err(e) = self
            .artifact_store
            .write_bytes(&paths.image_path, input.image_data)
            .await
        {
            tracing::error!(request_id = %paths.request_id, error = %e, "Failed to store image");
            let failed =
                RequestStatus::failed(&paths.request_id, format!("Image upload failed: {}", e));
            // already logged; the upload error is what the caller needs
            let _ = self.write_status(&paths, &failed).await;
            return Err(e);
        }

        self.write_status(&paths, &RequestStatus::pending(&paths.request_id))
            .await?;

        tracing::info!(
            request_id = %paths.request_id,
            image = %self.artifact_store.locate(&paths.image_path),
            "Image stored"
        );

        Ok(paths)
    }

    #[instrument(skip(self, paths), fields(request_id = %paths.request_id))]
    async fn analyze_request(&self, paths: &RequestPaths) -> Result<AnalysisOutcome, CoreError> {
        let result = async {
            let image_data = self.artifact_store.read_bytes(&paths.image_path).await?;
            let ingredients = self.analyze_image(image_data.to_vec()).await?;
            self.artifact_store
                .write_json(&paths.ingredients_path, &ingredients)
                .await?;
            Ok::<_, CoreError>(ingredients)
        }
        .await;

        match result {
            Ok(ingredients) => {
                // a lost completion record is reconciled by get_status
                let _ = self
                    .write_status(paths, &RequestStatus::complete(&paths.request_id))
                    .await;
                let summary = ingredients.summarize();

                tracing::info!(
                    total = summary.total_count,
                    categories = summary.category_count,
                    "Ingredients persisted"
                );

                Ok(AnalysisOutcome {
                    paths: paths.clone(),
                    ingredients,
                    summary,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "Analysis failed");
                let _ = self
                    .write_status(paths, &RequestStatus::failed(&paths.request_id, e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_ingredients(
        &self,
        lookup: RequestLookup,
    ) -> Result<(RequestPaths, IngredientSet), CoreError> {
        let paths = self.resolver.resolve(&lookup).await?;
        let ingredients = self.read_ingredients(&paths).await?;

        Ok((paths, ingredients))
    }

    #[instrument(skip(self))]
    async fn get_recipes(
        &self,
        lookup: RequestLookup,
    ) -> Result<(RequestPaths, RecipesArtifact), CoreError> {
        let paths = self.resolver.resolve(&lookup).await?;
        let recipes = self
            .artifact_store
            .read_json(&paths.recipes_path)
            .await
            .map_err(|e| match e {
                CoreError::NotFound(_) => CoreError::NotFound(format!(
                    "No recipes found for request {}. Please generate recipes first.",
                    paths.request_id
                )),
                other => other,
            })?;

        Ok((paths, recipes))
    }

    #[instrument(skip(self))]
    async fn suggest_recipes(
        &self,
        lookup: RequestLookup,
        num_recipes: u32,
    ) -> Result<(RequestPaths, RecipesArtifact), CoreError> {
        let paths = self.resolver.resolve(&lookup).await?;
        let ingredients = self.read_ingredients(&paths).await?.flatten();
        let ingredient_count = ingredients.len();

        let recipe_set = self.generate_recipes(ingredients, num_recipes).await?;
        let artifact = RecipesArtifact::new(recipe_set, ingredient_count);

        self.artifact_store
            .write_json(&paths.recipes_path, &artifact)
            .await?;

        tracing::info!(
            request_id = %paths.request_id,
            recipes = artifact.items.len(),
            path = %self.artifact_store.locate(&paths.recipes_path),
            "Recipes persisted"
        );

        Ok((paths, artifact))
    }

    #[instrument(skip(self))]
    async fn get_status(&self, lookup: RequestLookup) -> Result<RequestStatus, CoreError> {
        let paths = self.resolver.resolve(&lookup).await?;

        let analyzed = self.artifact_store.exists(&paths.ingredients_path).await?;

        if self.artifact_store.exists(&paths.status_path()).await? {
            let status: RequestStatus = self.artifact_store.read_json(&paths.status_path()).await?;
            if status.state == RequestState::Pending && analyzed {
                return Ok(RequestStatus::complete(&paths.request_id));
            }
            return Ok(status);
        }

        if analyzed {
            return Ok(RequestStatus::complete(&paths.request_id));
        }

        Err(CoreError::NotFound(format!(
            "No status recorded for request {}",
            paths.request_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        domain::{
            llm::ports::MockLLMClient,
            request::entities::{MANIFEST_FILE, STATUS_FILE},
            storage::ports::MockArtifactStore,
        },
        infrastructure::storage::local::LocalArtifactStore,
    };

    const PRODUCE: &str = r#"{"ingredients": {"Produce": ["apple"]}}"#;
    const APPLE_RECIPE: &str = r#"{"recipes": [{
        "name": "Baked Apple",
        "total_ingredients": ["apple"],
        "available_ingredients": ["apple"],
        "missing_ingredients": [],
        "completeness_score": 100,
        "instructions": ["Bake the apple"],
        "cooking_time": "25 minutes",
        "difficulty": "Easy"
    }]}"#;

    fn llm_replying(vision: &'static str, recipes: &'static str) -> MockLLMClient {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_image().returning(move |_, _, _, _| {
            Box::pin(async move { Ok::<_, CoreError>(vision.to_string()) })
        });
        llm.expect_generate_with_text().returning(move |_, _, _| {
            Box::pin(async move { Ok::<_, CoreError>(recipes.to_string()) })
        });
        llm
    }

    async fn service(llm: MockLLMClient) -> (TempDir, Service<LocalArtifactStore, MockLLMClient>) {
        let dir = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(dir.path()).await.unwrap();
        (dir, Service::new(store, llm))
    }

    /// A store that lets the resolver allocate a fresh request.
    fn store_allocating_request() -> MockArtifactStore {
        let mut store = MockArtifactStore::new();
        store
            .expect_container_exists()
            .returning(|_| Box::pin(async { Ok::<_, CoreError>(false) }));
        store
            .expect_ensure_container()
            .times(1)
            .returning(|_| Box::pin(async { Ok::<_, CoreError>(()) }));
        store.expect_locate().returning(|path| path.to_string());
        store
            .expect_write_bytes()
            .withf(|path, _| path.ends_with(MANIFEST_FILE))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok::<_, CoreError>(()) }));
        store
    }

    fn upload(filename: &str) -> SubmitImageInput {
        SubmitImageInput {
            filename: Some(filename.to_string()),
            image_data: Bytes::from_static(b"\xFF\xD8\xFFfake-jpeg"),
        }
    }

    #[tokio::test]
    async fn test_upload_analyze_and_generate_end_to_end() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_image()
            .withf(|_, _, image_data, _| image_data.starts_with(b"\xFF\xD8\xFF"))
            .times(1)
            .returning(|_, _, _, _| Box::pin(async { Ok::<_, CoreError>(PRODUCE.to_string()) }));
        llm.expect_generate_with_text()
            .withf(|_, user_prompt, _| user_prompt.contains("apple"))
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok::<_, CoreError>(APPLE_RECIPE.to_string()) }));
        let (_dir, service) = service(llm).await;

        let paths = service
            .submit_image(upload("fridge_abc123.jpg"))
            .await
            .unwrap();
        assert!(paths.request_id.starts_with("fridge_"));
        assert!(paths.request_id.ends_with("_abc123"));

        let outcome = service.analyze_request(&paths).await.unwrap();
        assert_eq!(outcome.summary.total_count, 1);

        let lookup = RequestLookup::ById(paths.request_id.clone());
        let (_, ingredients) = service.get_ingredients(lookup.clone()).await.unwrap();
        assert_eq!(ingredients.ingredients["Produce"], vec!["apple"]);

        let (_, generated) = service.suggest_recipes(lookup.clone(), 1).await.unwrap();
        assert_eq!(generated.items.len(), 1);
        assert_eq!(generated.items[0].completeness_score, 100.0);
        assert_eq!(generated.ingredient_count, 1);

        let (fetched_paths, fetched) = service.get_recipes(lookup.clone()).await.unwrap();
        assert_eq!(fetched_paths, paths);
        assert_eq!(fetched, generated);

        let status = service.get_status(lookup).await.unwrap();
        assert_eq!(status.state, RequestState::Complete);
    }

    #[tokio::test]
    async fn test_empty_upload_is_invalid() {
        let (_dir, service) = service(MockLLMClient::new()).await;

        let err = service
            .submit_image(SubmitImageInput {
                filename: Some("photo.jpg".to_string()),
                image_data: Bytes::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_submitted_request_is_pending() {
        let (_dir, service) = service(MockLLMClient::new()).await;

        let paths = service.submit_image(upload("photo.png")).await.unwrap();
        let status = service
            .get_status(RequestLookup::ById(paths.request_id.clone()))
            .await
            .unwrap();

        assert_eq!(status.state, RequestState::Pending);
        assert!(paths.image_path.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_failed_image_write_marks_request_failed() {
        let mut store = store_allocating_request();
        store
            .expect_write_bytes()
            .withf(|path, _| path.ends_with(".jpg"))
            .times(1)
            .returning(|_, _| {
                Box::pin(async { Err::<(), _>(CoreError::Storage("disk full".to_string())) })
            });
        store
            .expect_write_bytes()
            .withf(|path, data| {
                path.ends_with(STATUS_FILE)
                    && serde_json::from_slice::<RequestStatus>(data).is_ok_and(|status| {
                        status.state == RequestState::Failed
                            && status
                                .reason
                                .as_deref()
                                .is_some_and(|reason| reason.contains("disk full"))
                    })
            })
            .times(1)
            .returning(|_, _| Box::pin(async { Ok::<_, CoreError>(()) }));
        let service = Service::new(store, MockLLMClient::new());

        let err = service
            .submit_image(upload("fridge_abc123.jpg"))
            .await
            .unwrap_err();

        assert_eq!(err, CoreError::Storage("disk full".to_string()));
    }

    #[tokio::test]
    async fn test_pending_status_write_failure_is_returned() {
        let mut store = store_allocating_request();
        store
            .expect_write_bytes()
            .withf(|path, _| path.ends_with(".jpg"))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok::<_, CoreError>(()) }));
        store
            .expect_write_bytes()
            .withf(|path, _| path.ends_with(STATUS_FILE))
            .times(1)
            .returning(|_, _| {
                Box::pin(async {
                    Err::<(), _>(CoreError::Storage("read-only file system".to_string()))
                })
            });
        let service = Service::new(store, MockLLMClient::new());

        let err = service
            .submit_image(upload("fridge_abc123.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Storage(_)));
    }

    #[tokio::test]
    async fn test_failed_analysis_records_reason() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_image().times(1).returning(|_, _, _, _| {
            Box::pin(async {
                Err::<String, _>(CoreError::ExternalService("model unavailable".to_string()))
            })
        });
        let (_dir, service) = service(llm).await;

        let paths = service.submit_image(upload("photo.jpg")).await.unwrap();
        let err = service.analyze_request(&paths).await.unwrap_err();
        assert!(matches!(err, CoreError::Analysis(_)));

        let status = service.get_status(RequestLookup::Latest).await.unwrap();
        assert_eq!(status.state, RequestState::Failed);
        assert!(status.reason.unwrap().contains("model unavailable"));
    }

    #[tokio::test]
    async fn test_recipes_require_ingredients() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().never();
        let (_dir, service) = service(llm).await;

        let paths = service.submit_image(upload("photo.jpg")).await.unwrap();
        let err = service
            .suggest_recipes(RequestLookup::ById(paths.request_id), 3)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_missing_recipes_are_not_found() {
        let (_dir, service) = service(llm_replying(PRODUCE, APPLE_RECIPE)).await;

        let paths = service.submit_image(upload("photo.jpg")).await.unwrap();
        service.analyze_request(&paths).await.unwrap();

        let err = service.get_recipes(RequestLookup::Latest).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_latest_without_requests_is_not_found() {
        let (_dir, service) = service(MockLLMClient::new()).await;

        let err = service
            .get_ingredients(RequestLookup::Latest)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_status_falls_back_to_ingredients_artifact() {
        let (_dir, service) = service(llm_replying(PRODUCE, APPLE_RECIPE)).await;

        let paths = service.submit_image(upload("photo.jpg")).await.unwrap();
        service.analyze_request(&paths).await.unwrap();
        tokio::fs::remove_file(service.locate(&paths.status_path()))
            .await
            .unwrap();

        let status = service.get_status(RequestLookup::Latest).await.unwrap();
        assert_eq!(status.state, RequestState::Complete);
    }

    #[tokio::test]
    async fn test_stale_pending_status_with_ingredients_is_complete() {
        let (_dir, service) = service(llm_replying(PRODUCE, APPLE_RECIPE)).await;

        let paths = service.submit_image(upload("photo.jpg")).await.unwrap();
        service.analyze_request(&paths).await.unwrap();
        // completion record lost after the ingredients were saved
        service
            .artifact_store
            .write_json(&paths.status_path(), &RequestStatus::pending(&paths.request_id))
            .await
            .unwrap();

        let status = service
            .get_status(RequestLookup::ById(paths.request_id.clone()))
            .await
            .unwrap();
        assert_eq!(status.state, RequestState::Complete);
    }
}
