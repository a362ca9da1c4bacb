use crate::{
    domain::common::{FridgeChefConfig, entities::app_errors::CoreError, services::Service},
    infrastructure::{llm::azure_openai_client::AzureOpenAIClient, storage::ArtifactStorage},
};

pub type FridgeChefService = Service<ArtifactStorage, AzureOpenAIClient>;

/// Builds the service context shared by the CLI and every HTTP handler.
pub async fn create_service(config: FridgeChefConfig) -> Result<FridgeChefService, CoreError> {
    let artifact_store = ArtifactStorage::from_config(&config.storage).await?;
    let llm_client = AzureOpenAIClient::new(config.llm);

    Ok(Service::new(artifact_store, llm_client))
}
