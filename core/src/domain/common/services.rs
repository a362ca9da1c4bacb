use std::sync::Arc;

use crate::domain::{
    llm::ports::LLMClient, request::resolver::RequestResolver, storage::ports::ArtifactStore,
};

/// Service context built once at startup and shared by every handler.
pub struct Service<S, L>
where
    S: ArtifactStore,
    L: LLMClient,
{
    pub(crate) artifact_store: Arc<S>,
    pub(crate) llm_client: Arc<L>,
    pub(crate) resolver: RequestResolver<S>,
}

impl<S, L> Clone for Service<S, L>
where
    S: ArtifactStore,
    L: LLMClient,
{
    fn clone(&self) -> Self {
        Self {
            artifact_store: Arc::clone(&self.artifact_store),
            llm_client: Arc::clone(&self.llm_client),
            resolver: self.resolver.clone(),
        }
    }
}

impl<S, L> Service<S, L>
where
    S: ArtifactStore,
    L: LLMClient,
{
    pub fn new(artifact_store: S, llm_client: L) -> Self {
        let artifact_store = Arc::new(artifact_store);

        Self {
            resolver: RequestResolver::new(Arc::clone(&artifact_store)),
            artifact_store,
            llm_client: Arc::new(llm_client),
        }
    }

    /// Human readable location of an artifact path.
    pub fn locate(&self, path: &str) -> String {
        self.artifact_store.locate(path)
    }
}
