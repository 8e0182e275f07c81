// Configuration layer for LLM client creation
// This module provides a factory for building clients from configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for OpenAI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for OpenAI API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a client supporting both chat completions and assistants
    pub fn create_client(config: OpenAIConfig) -> Result<Arc<dyn crate::traits::LLMClient>> {
        Ok(Arc::new(Self::build(config)?))
    }

    /// Create the concrete client, for callers that need it behind several traits
    pub fn create_openai_client(config: OpenAIConfig) -> Result<Arc<crate::openai::OpenAIClient>> {
        Ok(Arc::new(Self::build(config)?))
    }

    /// Create a chat-only client
    pub fn create_chat_client(config: OpenAIConfig) -> Result<Arc<dyn crate::traits::ChatClient>> {
        Ok(Arc::new(Self::build(config)?))
    }

    /// Create an assistants-only client
    pub fn create_assistant_client(
        config: OpenAIConfig,
    ) -> Result<Arc<dyn crate::traits::AssistantClient>> {
        Ok(Arc::new(Self::build(config)?))
    }

    fn build(config: OpenAIConfig) -> Result<crate::openai::OpenAIClient> {
        let client = crate::openai::OpenAIClient::new(config.api_key)?;
        Ok(match config.base_url {
            Some(base_url) => client.with_base_url(base_url),
            None => client,
        })
    }
}
