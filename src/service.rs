use crate::audit::{PromptLog, PromptRecord};
use crate::catalog::{BotPersonality, Catalog, ModelSpec};
use crate::core::error::ForgeError;
use crate::providers::openrouter::OpenRouterClient;
use crate::providers::{Message, Role};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Absolute ceiling on completion length. Summaries stay short no matter what
/// the caller asks for.
pub const MAX_SUMMARY_TOKENS: u32 = 300;

/// Temperature applied when the caller does not choose one.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

const FALLBACK_SYSTEM_PROMPT: &str = "You are an expert educational content creator. Create \
engaging, interactive educational resources.";

const SUMMARY_INSTRUCTIONS: &str = "

Create an engaging summary that:
- Starts with a compelling title (use ## for markdown heading)
- Briefly describes what students will do (1-2 sentences)
- Lists 3-4 key learning features using bullet points
- Mentions interactive elements students will engage with
- Includes estimated time and target age group
- Ends with one sentence about learning outcomes

Keep the total response under 150 words. Use markdown formatting with:
- ## for the main title
- **bold** for key terms
- Bullet points for features
- *italics* for engagement elements

Do not ask questions back. Generate the summary directly.";

/// One summary request. `model_id` and `bot_personality` must resolve against
/// the catalog when present; `metadata` is an opaque pass-through.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub bot_personality: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub content: String,
    pub model_used: String,
    pub tokens_used: u32,
    /// Milliseconds of wall clock around the provider call.
    pub processing_time: u64,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_personality: Option<String>,
    /// The temperature actually sent, not the one requested.
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Turns a [`GenerationRequest`] into exactly one provider call and maps the
/// result into a typed response or a [`ForgeError`]. Stateless per call; the
/// catalog is the only shared data and it is read-only.
pub struct GenerationService {
    catalog: Catalog,
    client: OpenRouterClient,
    journal: Option<PromptLog>,
}

impl GenerationService {
    pub fn new(catalog: Catalog, client: OpenRouterClient, journal: Option<PromptLog>) -> Self {
        Self {
            catalog,
            client,
            journal,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ForgeError> {
        let result = self.generate_inner(request).await;

        if let Some(journal) = &self.journal {
            journal.record(&PromptRecord {
                timestamp: chrono::Utc::now().to_rfc3339(),
                prompt: &request.prompt,
                model_id: request.model_id.as_deref(),
                bot_personality: request.bot_personality.as_deref(),
                metadata: request.metadata.as_ref(),
                outcome: match &result {
                    Ok(_) => "ok",
                    Err(e) => e.code(),
                },
            });
        }

        result
    }

    async fn generate_inner(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ForgeError> {
        if request.prompt.trim().is_empty() {
            return Err(ForgeError::Input(
                "Prompt is required and must be a non-empty string".to_string(),
            ));
        }
        if !self.client.has_credential() {
            return Err(ForgeError::Config(
                "OPENROUTER_API_KEY is not configured".to_string(),
            ));
        }

        let model = self.resolve_model(request.model_id.as_deref())?;
        let personality = self.resolve_personality(request.bot_personality.as_deref())?;

        let system_prompt = personality
            .map(|p| p.system_prompt.clone())
            .unwrap_or_else(|| FALLBACK_SYSTEM_PROMPT.to_string());
        let messages = [
            Message {
                role: Role::System,
                content: system_prompt,
            },
            Message {
                role: Role::User,
                content: format_user_prompt(request),
            },
        ];

        let temperature = request.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        let max_tokens = request
            .max_tokens
            .unwrap_or(MAX_SUMMARY_TOKENS)
            .min(MAX_SUMMARY_TOKENS);

        let started = Instant::now();
        let completion = self
            .client
            .chat_completion(&model.provider_model_id, &messages, temperature, max_tokens)
            .await?;
        let processing_time = started.elapsed().as_millis() as u64;

        let content = match completion.choices.first() {
            Some(choice) => choice.message.content.trim().to_string(),
            None => return Err(ForgeError::InvalidResponse),
        };
        let tokens_used = completion.usage.map(|u| u.total_tokens).unwrap_or(0);

        Ok(GenerationResponse {
            content,
            model_used: model.name.clone(),
            tokens_used,
            processing_time,
            metadata: ResponseMetadata {
                model_id: model.id.clone(),
                bot_personality: personality.map(|p| p.name.clone()),
                temperature,
                request_id: completion.id,
            },
        })
    }

    /// True iff a credential is configured and the provider's model listing
    /// answers successfully. Failures are reported as `false`, never raised.
    pub async fn health_check(&self) -> bool {
        self.client.models_reachable().await
    }

    fn resolve_model(&self, id: Option<&str>) -> Result<&ModelSpec, ForgeError> {
        match id {
            Some(id) => self
                .catalog
                .model_by_id(id)
                .ok_or_else(|| ForgeError::ModelNotFound(id.to_string())),
            None => self.catalog.active_model().ok_or(ForgeError::NoActiveModel),
        }
    }

    fn resolve_personality(
        &self,
        id: Option<&str>,
    ) -> Result<Option<&BotPersonality>, ForgeError> {
        match id {
            Some(id) => self
                .catalog
                .personality_by_id(id)
                .map(Some)
                .ok_or_else(|| ForgeError::PersonalityNotFound(id.to_string())),
            None => Ok(self.catalog.active_personality()),
        }
    }
}

fn format_user_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "Generate a concise, attractive summary for this educational resource concept: \"{}\"",
        request.prompt
    );

    if let Some(context) = &request.context {
        prompt = format!("Context: {}\n\nRequest: {}", context, prompt);
    }

    prompt.push_str(SUMMARY_INSTRUCTIONS);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BotPersonality, Catalog, ModelSpec, Provider, Tone};
    use httpmock::prelude::*;
    use serde_json::json;

    fn model(id: &str, provider_model_id: &str, active: bool) -> ModelSpec {
        ModelSpec {
            id: id.to_string(),
            name: format!("Display {}", id),
            description: String::new(),
            provider: Provider::OpenRouter,
            provider_model_id: provider_model_id.to_string(),
            capabilities: Vec::new(),
            max_tokens: 8192,
            is_active: active,
            metadata: None,
        }
    }

    fn personality(id: &str, system_prompt: &str, active: bool) -> BotPersonality {
        BotPersonality {
            id: id.to_string(),
            name: format!("Persona {}", id),
            description: String::new(),
            tone: Tone::Enthusiastic,
            expertise: Vec::new(),
            system_prompt: system_prompt.to_string(),
            examples: Vec::new(),
            is_active: active,
        }
    }

    fn test_catalog() -> Catalog {
        Catalog::new(
            vec![
                model("gemma", "google/gemma-3-12b-it", true),
                model("gpt4", "openai/gpt-4-turbo", false),
            ],
            vec![personality("teacher", "You are a teaching specialist.", true)],
        )
    }

    fn service(base_url: String, api_key: Option<&str>) -> GenerationService {
        service_with_catalog(test_catalog(), base_url, api_key)
    }

    fn service_with_catalog(
        catalog: Catalog,
        base_url: String,
        api_key: Option<&str>,
    ) -> GenerationService {
        let client = OpenRouterClient::new(base_url, api_key.map(str::to_string));
        GenerationService::new(catalog, client, None)
    }

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            model_id: None,
            bot_personality: None,
            temperature: None,
            max_tokens: None,
            context: None,
            metadata: None,
        }
    }

    fn completion_body() -> serde_json::Value {
        json!({
            "id": "req_1",
            "choices": [{"message": {"role": "assistant", "content": "## Title\nBody"}}],
            "usage": {"total_tokens": 42}
        })
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_network_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(completion_body());
            })
            .await;

        let svc = service(server.base_url(), None);
        let err = svc.generate_content(&request("volcano lab")).await.unwrap_err();
        assert!(matches!(err, ForgeError::Config(_)));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn unknown_model_fails_before_any_network_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(completion_body());
            })
            .await;

        let svc = service(server.base_url(), Some("sk-test"));
        let mut req = request("volcano lab");
        req.model_id = Some("does-not-exist".to_string());
        let err = svc.generate_content(&req).await.unwrap_err();
        assert!(matches!(err, ForgeError::ModelNotFound(_)));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn no_active_model_is_a_resolution_error() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(completion_body());
            })
            .await;

        let catalog = Catalog::new(
            vec![model("gemma", "google/gemma-3-12b-it", false)],
            vec![personality("teacher", "You teach.", true)],
        );
        let svc = service_with_catalog(catalog, server.base_url(), Some("sk-test"));
        let err = svc.generate_content(&request("volcano lab")).await.unwrap_err();
        assert!(matches!(err, ForgeError::NoActiveModel));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn unknown_personality_is_a_resolution_error() {
        let server = MockServer::start_async().await;
        let svc = service(server.base_url(), Some("sk-test"));
        let mut req = request("volcano lab");
        req.bot_personality = Some("nobody".to_string());
        let err = svc.generate_content(&req).await.unwrap_err();
        assert!(matches!(err, ForgeError::PersonalityNotFound(_)));
    }

    #[tokio::test]
    async fn active_model_resolves_when_none_requested() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .json_body_partial(r#"{"model":"google/gemma-3-12b-it"}"#);
                then.status(200).json_body(completion_body());
            })
            .await;

        let svc = service(server.base_url(), Some("sk-test"));
        let response = svc.generate_content(&request("volcano lab")).await.unwrap();
        mock.assert_async().await;
        assert_eq!(response.model_used, "Display gemma");
        assert_eq!(response.metadata.model_id, "gemma");
    }

    #[tokio::test]
    async fn max_tokens_above_ceiling_is_clamped() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .json_body_partial(r#"{"max_tokens":300}"#);
                then.status(200).json_body(completion_body());
            })
            .await;

        let svc = service(server.base_url(), Some("sk-test"));
        let mut req = request("volcano lab");
        req.max_tokens = Some(5000);
        svc.generate_content(&req).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn max_tokens_below_ceiling_passes_through() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .json_body_partial(r#"{"max_tokens":120}"#);
                then.status(200).json_body(completion_body());
            })
            .await;

        let svc = service(server.base_url(), Some("sk-test"));
        let mut req = request("volcano lab");
        req.max_tokens = Some(120);
        svc.generate_content(&req).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn success_response_maps_all_fields() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(completion_body());
            })
            .await;

        let svc = service(server.base_url(), Some("sk-test"));
        let response = svc.generate_content(&request("volcano lab")).await.unwrap();
        assert_eq!(response.content, "## Title\nBody");
        assert_eq!(response.tokens_used, 42);
        assert_eq!(response.metadata.request_id.as_deref(), Some("req_1"));
        assert_eq!(
            response.metadata.bot_personality.as_deref(),
            Some("Persona teacher")
        );
        assert_eq!(response.metadata.temperature, DEFAULT_TEMPERATURE);
    }

    #[tokio::test]
    async fn provider_error_embeds_status_and_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429)
                    .json_body(json!({"error": {"message": "rate limited"}}));
            })
            .await;

        let svc = service(server.base_url(), Some("sk-test"));
        let err = svc.generate_content(&request("volcano lab")).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("rate limited"));
        assert_eq!(err.code(), "AI_GENERATION_FAILED");
    }

    #[tokio::test]
    async fn missing_choices_is_an_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200)
                    .json_body(json!({"id": "req_2", "usage": {"total_tokens": 7}}));
            })
            .await;

        let svc = service(server.base_url(), Some("sk-test"));
        let err = svc.generate_content(&request("volcano lab")).await.unwrap_err();
        assert!(matches!(err, ForgeError::InvalidResponse));
    }

    #[tokio::test]
    async fn missing_usage_defaults_to_zero_tokens() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "ok"}}]
                }));
            })
            .await;

        let svc = service(server.base_url(), Some("sk-test"));
        let response = svc.generate_content(&request("volcano lab")).await.unwrap();
        assert_eq!(response.tokens_used, 0);
        assert!(response.metadata.request_id.is_none());
    }

    #[tokio::test]
    async fn missing_personality_falls_back_to_generic_system_prompt() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions").json_body_partial(
                    format!(
                        r#"{{"messages":[{{"role":"system","content":{}}}]}}"#,
                        serde_json::to_string(FALLBACK_SYSTEM_PROMPT).unwrap()
                    ),
                );
                then.status(200).json_body(completion_body());
            })
            .await;

        let catalog = Catalog::new(
            vec![model("gemma", "google/gemma-3-12b-it", true)],
            vec![personality("teacher", "You teach.", false)],
        );
        let svc = service_with_catalog(catalog, server.base_url(), Some("sk-test"));
        let response = svc.generate_content(&request("volcano lab")).await.unwrap();
        mock.assert_async().await;
        assert!(response.metadata.bot_personality.is_none());
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let server = MockServer::start_async().await;
        let svc = service(server.base_url(), Some("sk-test"));
        let err = svc.generate_content(&request("   ")).await.unwrap_err();
        assert!(matches!(err, ForgeError::Input(_)));
    }

    #[tokio::test]
    async fn health_check_never_raises() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/models");
                then.status(503).body("down");
            })
            .await;

        let without_key = service(server.base_url(), None);
        assert!(!without_key.health_check().await);

        let with_key = service(server.base_url(), Some("sk-test"));
        assert!(!with_key.health_check().await);
    }

    #[tokio::test]
    async fn health_check_true_on_success() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/models");
                then.status(200).json_body(json!({"data": []}));
            })
            .await;

        let svc = service(server.base_url(), Some("sk-test"));
        assert!(svc.health_check().await);
    }

    #[tokio::test]
    async fn journal_records_outcome_without_affecting_result() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(completion_body());
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = OpenRouterClient::new(server.base_url(), Some("sk-test".to_string()));
        let svc = GenerationService::new(
            test_catalog(),
            client,
            Some(PromptLog::new(dir.path().to_path_buf())),
        );
        svc.generate_content(&request("volcano lab")).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let contents = std::fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(parsed["prompt"], "volcano lab");
        assert_eq!(parsed["outcome"], "ok");
    }

    #[test]
    fn user_prompt_embeds_the_lesson_idea() {
        let req = request("interactive photosynthesis lab");
        let prompt = format_user_prompt(&req);
        assert!(prompt.contains("\"interactive photosynthesis lab\""));
        assert!(prompt.contains("under 150 words"));
        assert!(!prompt.starts_with("Context:"));
    }

    #[test]
    fn context_is_prepended_as_a_labeled_block() {
        let mut req = request("fraction games");
        req.context = Some("Year 4 class, mixed ability".to_string());
        let prompt = format_user_prompt(&req);
        assert!(prompt.starts_with("Context: Year 4 class, mixed ability\n\nRequest: "));
        assert!(prompt.contains("\"fraction games\""));
    }
}
