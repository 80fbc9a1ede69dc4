use crate::core::error::ForgeError;
use crate::providers::Message;
use crate::providers::base_client::HttpClient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatCompletionMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatCompletionMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
pub struct Choice {
    pub message: MessageContent,
}

#[derive(Deserialize, Debug)]
pub struct MessageContent {
    pub content: String,
}

#[derive(Deserialize, Debug)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Deserialize, Default)]
struct ProviderErrorBody {
    #[serde(default)]
    error: Option<ProviderErrorDetail>,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Client for OpenRouter's OpenAI-compatible API. One chat-completion call per
/// request, plus a model-list probe for health checks.
pub struct OpenRouterClient {
    client: HttpClient,
    has_credential: bool,
}

impl OpenRouterClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://openrouter.ai/api/v1";

    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let auth_header = api_key
            .as_ref()
            .map(|key| ("Authorization".to_string(), format!("Bearer {}", key)));

        let mut extra_headers = HashMap::new();
        extra_headers.insert("X-Title".to_string(), "LessonForge".to_string());

        Self {
            client: HttpClient::new(base_url, auth_header, Some(extra_headers)),
            has_credential: api_key.is_some(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.has_credential
    }

    pub async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<ChatCompletion, ForgeError> {
        let req_messages: Vec<ChatCompletionMessage> = messages
            .iter()
            .map(|m| ChatCompletionMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect();

        let payload = ChatCompletionRequest {
            model: model.to_string(),
            messages: req_messages,
            temperature,
            max_tokens,
        };

        let response = self.client.post("chat/completions", &payload).await?;
        let status = response.status();

        if !status.is_success() {
            let body: ProviderErrorBody = response.json().await.unwrap_or_default();
            let message = body.error.map(|e| e.message).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
            return Err(ForgeError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let response_body = response.text().await?;
        let parsed: ChatCompletion = serde_json::from_str(&response_body)?;
        Ok(parsed)
    }

    /// True iff the provider's model listing answers with a success status.
    /// Never propagates an error.
    pub async fn models_reachable(&self) -> bool {
        if !self.has_credential {
            return false;
        }
        match self.client.get("models").await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
