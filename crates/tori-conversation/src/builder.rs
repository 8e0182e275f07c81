use std::sync::Arc;
use anyhow::{anyhow, Result};

use tori_llm::{AssistantClient, ChatClient, LLMClient, RunRequest};
use tori_persist::ConversationStore;

use crate::config::{DriverConfig, SummaryConfig, DEFAULT_FALLBACK_MESSAGE};
use crate::driver::ConversationRunDriver;
use crate::retry::RetryPolicy;
use crate::service::ConversationService;
use crate::summary::Summarizer;

/// Builder for constructing a ConversationService
pub struct ConversationServiceBuilder {
    assistant_client: Option<Arc<dyn AssistantClient>>,
    chat_client: Option<Arc<dyn ChatClient>>,
    store: Option<Arc<dyn ConversationStore>>,
    driver_config: Option<DriverConfig>,
    summary_config: SummaryConfig,
    thread_retry: RetryPolicy,
    fallback_message: String,
}

impl ConversationServiceBuilder {
    pub fn new() -> Self {
        Self {
            assistant_client: None,
            chat_client: None,
            store: None,
            driver_config: None,
            summary_config: SummaryConfig::default(),
            thread_retry: RetryPolicy::default(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Use one client for both assistants and chat completions
    pub fn llm_client<C: LLMClient + 'static>(self, client: Arc<C>) -> Self {
        self.assistant_client(client.clone()).chat_client(client)
    }

    pub fn assistant_client(mut self, client: Arc<dyn AssistantClient>) -> Self {
        self.assistant_client = Some(client);
        self
    }

    pub fn chat_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.chat_client = Some(client);
        self
    }

    pub fn store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Assistant used for every run, with default polling settings
    pub fn assistant(mut self, assistant: RunRequest) -> Self {
        self.driver_config = Some(DriverConfig::new(assistant));
        self
    }

    pub fn driver_config(mut self, config: DriverConfig) -> Self {
        self.driver_config = Some(config);
        self
    }

    pub fn summary_config(mut self, config: SummaryConfig) -> Self {
        self.summary_config = config;
        self
    }

    pub fn thread_retry(mut self, retry: RetryPolicy) -> Self {
        self.thread_retry = retry;
        self
    }

    pub fn fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn build(self) -> Result<ConversationService> {
        let assistant_client = self.assistant_client
            .ok_or_else(|| anyhow!("Assistant client is required"))?;
        let chat_client = self.chat_client
            .ok_or_else(|| anyhow!("Chat client is required"))?;
        let store = self.store
            .ok_or_else(|| anyhow!("Conversation store is required"))?;
        let driver_config = self.driver_config
            .ok_or_else(|| anyhow!("Assistant configuration is required"))?;

        if driver_config.assistant.assistant_id.trim().is_empty() {
            return Err(anyhow!("Assistant id must not be empty"));
        }
        if self.fallback_message.trim().is_empty() {
            return Err(anyhow!("Fallback message must not be empty"));
        }

        Ok(ConversationService::new(
            assistant_client.clone(),
            store,
            ConversationRunDriver::new(assistant_client, driver_config),
            Summarizer::new(chat_client, self.summary_config),
            self.thread_retry,
            self.fallback_message,
        ))
    }
}

impl Default for ConversationServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
