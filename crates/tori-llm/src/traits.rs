use crate::types::{Message, ResponseFormat, Run, RunRequest, ThreadMessage};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for single-shot chat completions
///
/// Used for structured output: the model either fills the requested schema
/// or refuses, and the refusal is reported separately from the content.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Non-streaming chat completion
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}

/// Trait for the thread / message / run conversation API
///
/// Threads and their messages live upstream. A run asks the assistant to
/// respond to the thread and is polled until it leaves the active states.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Create a thread, optionally seeded with messages. Returns the thread id.
    async fn create_thread(&self, messages: Vec<Message>) -> Result<String>;

    /// Append a message to a thread. Returns the message id.
    async fn append_message(&self, thread_id: &str, message: Message) -> Result<String>;

    /// Start a run against a thread
    async fn create_run(&self, thread_id: &str, request: RunRequest) -> Result<Run>;

    /// Read the current state of a run
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// List thread messages, most recent first
    async fn list_messages(&self, thread_id: &str, limit: u32) -> Result<Vec<ThreadMessage>>;
}

/// Convenience trait for clients that support both chat and assistants
pub trait LLMClient: ChatClient + AssistantClient {}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: ChatOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub response_format: Option<ResponseFormat>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: Option<String>,
    /// Set when the model declined to produce the requested output
    pub refusal: Option<String>,
    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<String>,
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}
