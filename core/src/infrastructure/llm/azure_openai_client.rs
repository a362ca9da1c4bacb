use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{
    common::{LLMConfig, entities::app_errors::CoreError},
    llm::ports::LLMClient,
};

/// Chat completions client for an Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureOpenAIClient {
    endpoint: String,
    api_key: String,
    api_version: String,
    model_name: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<Message>,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl AzureOpenAIClient {
    pub fn new(config: LLMConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            api_version: config.api_version,
            model_name: config.model_name,
            client: Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.model_name, self.api_version
        )
    }

    async fn call_chat_api(&self, request: ChatRequest) -> Result<String, CoreError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Azure OpenAI request failed: {}", e);
                CoreError::ExternalService(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Azure OpenAI error: {} - {}", status, error_text);
            return Err(CoreError::ExternalService(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Azure OpenAI response: {}", e);
            CoreError::ExternalService(format!("Failed to parse LLM response: {}", e))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CoreError::ExternalService("No response from LLM".to_string()))
    }
}

impl LLMClient for AzureOpenAIClient {
    #[instrument(skip_all, fields(model = %self.model_name, size = image_data.len()))]
    async fn generate_with_image(
        &self,
        system_prompt: String,
        user_prompt: String,
        image_data: Vec<u8>,
        max_tokens: u32,
    ) -> Result<String, CoreError> {
        self.call_chat_api(image_request(
            system_prompt,
            user_prompt,
            &image_data,
            max_tokens,
        ))
        .await
    }

    #[instrument(skip_all, fields(model = %self.model_name))]
    async fn generate_with_text(
        &self,
        system_prompt: String,
        user_prompt: String,
        max_tokens: u32,
    ) -> Result<String, CoreError> {
        self.call_chat_api(text_request(system_prompt, user_prompt, max_tokens))
            .await
    }
}

fn json_object() -> ResponseFormat {
    ResponseFormat {
        kind: "json_object",
    }
}

fn image_request(
    system_prompt: String,
    user_prompt: String,
    image_data: &[u8],
    max_tokens: u32,
) -> ChatRequest {
    let data_url = format!(
        "data:{};base64,{}",
        sniff_mime_type(image_data),
        general_purpose::STANDARD.encode(image_data)
    );

    ChatRequest {
        messages: vec![
            Message {
                role: "system",
                content: MessageContent::Text(system_prompt),
            },
            Message {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text { text: user_prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ]),
            },
        ],
        max_tokens,
        response_format: json_object(),
    }
}

fn text_request(system_prompt: String, user_prompt: String, max_tokens: u32) -> ChatRequest {
    ChatRequest {
        messages: vec![
            Message {
                role: "system",
                content: MessageContent::Text(system_prompt),
            },
            Message {
                role: "user",
                content: MessageContent::Text(user_prompt),
            },
        ],
        max_tokens,
        response_format: json_object(),
    }
}

/// MIME type from the leading magic bytes, `image/jpeg` when unrecognized.
pub fn sniff_mime_type(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}
