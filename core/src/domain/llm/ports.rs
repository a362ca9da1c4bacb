use std::future::Future;

use crate::domain::common::entities::app_errors::CoreError;

/// LLM Client trait for calling chat completion models.
///
/// Both calls ask for a JSON object response and return the raw message
/// content; decoding belongs to the caller.
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    fn generate_with_image(
        &self,
        system_prompt: String,
        user_prompt: String,
        image_data: Vec<u8>,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn generate_with_text(
        &self,
        system_prompt: String,
        user_prompt: String,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}
