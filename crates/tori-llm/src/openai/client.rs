// OpenAI-specific client implementation

use crate::openai::assistants::{
    MessageList, MessageObject, RunObject, ThreadObject, ASSISTANTS_BETA_HEADER,
};
use crate::traits::{
    AssistantClient, ChatClient, ChatOptions, ChatRequest, ChatResponse, LLMClient, TokenUsage,
};
use crate::types::{Message, Run, RunRequest, ThreadMessage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );
        headers.insert("OpenAI-Beta", HeaderValue::from_static(ASSISTANTS_BETA_HEADER));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the client at another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: Vec<Message>,
        options: &ChatOptions,
    ) -> Result<Value> {
        let mut request = serde_json::json!({
            "model": model,
            "messages": serde_json::to_value(messages)?,
        });

        let Some(obj) = request.as_object_mut() else {
            anyhow::bail!("Chat request payload is not an object");
        };

        if let Some(temp) = options.temperature {
            obj.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_completion_tokens".to_string(), serde_json::json!(max_tokens));
        }
        if let Some(format) = &options.response_format {
            obj.insert("response_format".to_string(), serde_json::to_value(format)?);
        }

        Ok(request)
    }

    /// Build run creation payload
    fn build_run_request(&self, request: &RunRequest) -> Value {
        let mut payload = serde_json::json!({
            "assistant_id": request.assistant_id,
        });

        if let Some(obj) = payload.as_object_mut() {
            if let Some(ref instructions) = request.instructions {
                obj.insert("instructions".to_string(), serde_json::json!(instructions));
            }
            if let Some(ref model) = request.model {
                obj.insert("model".to_string(), serde_json::json!(model));
            }
        }

        payload
    }

    /// Send a prepared request and decode a successful JSON body
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await.context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        response.json().await.context("Failed to parse response")
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(&request.model, request.messages, &request.options)?;

        let raw: OpenAIChatResponse = self
            .send(
                self.http_client
                    .post(format!("{}/chat/completions", self.base_url))
                    .json(&payload),
            )
            .await?;

        // Convert to provider-agnostic response
        let choice = raw.choices.first();
        Ok(ChatResponse {
            content: choice.and_then(|c| c.message.content.clone()),
            refusal: choice.and_then(|c| c.message.refusal.clone()),
            usage: raw.usage.as_ref().map(|usage| TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(&raw)?,
        })
    }
}

#[async_trait]
impl AssistantClient for OpenAIClient {
    async fn create_thread(&self, messages: Vec<Message>) -> Result<String> {
        let payload = serde_json::json!({ "messages": messages });

        let thread: ThreadObject = self
            .send(
                self.http_client
                    .post(format!("{}/threads", self.base_url))
                    .json(&payload),
            )
            .await?;

        tracing::debug!(thread_id = %thread.id, "Thread created");
        Ok(thread.id)
    }

    async fn append_message(&self, thread_id: &str, message: Message) -> Result<String> {
        let created: MessageObject = self
            .send(
                self.http_client
                    .post(format!("{}/threads/{}/messages", self.base_url, thread_id))
                    .json(&message),
            )
            .await?;

        Ok(created.id)
    }

    async fn create_run(&self, thread_id: &str, request: RunRequest) -> Result<Run> {
        let payload = self.build_run_request(&request);

        let run: RunObject = self
            .send(
                self.http_client
                    .post(format!("{}/threads/{}/runs", self.base_url, thread_id))
                    .json(&payload),
            )
            .await?;

        Ok(run.into())
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let run: RunObject = self
            .send(self.http_client.get(format!(
                "{}/threads/{}/runs/{}",
                self.base_url, thread_id, run_id
            )))
            .await?;

        Ok(run.into())
    }

    async fn list_messages(&self, thread_id: &str, limit: u32) -> Result<Vec<ThreadMessage>> {
        let list: MessageList = self
            .send(
                self.http_client
                    .get(format!("{}/threads/{}/messages", self.base_url, thread_id))
                    .query(&[("order", "desc".to_string()), ("limit", limit.to_string())]),
            )
            .await?;

        Ok(list
            .data
            .into_iter()
            .map(MessageObject::into_thread_message)
            .collect())
    }
}

// OpenAI supports both chat and assistants
impl LLMClient for OpenAIClient {}

// ============================================================================
// OPENAI-SPECIFIC RESPONSE TYPES (for Chat Completions)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIChatResponse {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
