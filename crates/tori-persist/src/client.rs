use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{PersistError, Result};
use crate::models::{is_date_key, ConversationsByDate, DayConversation};
use crate::trait_client::ConversationStore;
use crate::builder::FirebaseClientBuilder;

/// Firebase Realtime Database client (REST, read-only)
pub struct FirebaseClient {
    http_client: reqwest::Client,
    database_url: String,
    conversations_path: String,
    auth_token: Option<String>,
}

impl FirebaseClient {
    pub(crate) fn new(
        http_client: reqwest::Client,
        database_url: String,
        conversations_path: String,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            http_client,
            database_url,
            conversations_path,
            auth_token,
        }
    }

    pub fn builder() -> FirebaseClientBuilder {
        FirebaseClientBuilder::new()
    }

    /// REST URL of the conversation tree
    pub fn conversations_url(&self) -> String {
        format!("{}/{}.json", self.database_url, self.conversations_path)
    }

    /// Fetch the raw conversation tree (`null` when the path is empty)
    async fn fetch_tree(&self) -> Result<Value> {
        let mut request = self.http_client.get(self.conversations_url());
        if let Some(ref token) = self.auth_token {
            request = request.query(&[("auth", token)]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PersistError::Status { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Select the days recorded under `thread_id` from a raw conversation tree
pub fn filter_thread(tree: Value, thread_id: &str) -> ConversationsByDate {
    let Value::Object(days) = tree else {
        return BTreeMap::new();
    };

    let mut conversations = BTreeMap::new();
    for (date, record) in days {
        if !is_date_key(&date) {
            tracing::debug!(key = %date, "Skipping non-date key");
            continue;
        }

        match serde_json::from_value::<DayConversation>(record) {
            Ok(day) if day.thread_id == thread_id => {
                conversations.insert(date, day.messages.into_vec());
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(date = %date, error = %e, "Skipping malformed conversation record");
            }
        }
    }

    conversations
}

#[async_trait]
impl ConversationStore for FirebaseClient {
    async fn conversations_for_thread(&self, thread_id: &str) -> Result<ConversationsByDate> {
        let tree = self.fetch_tree().await?;
        let conversations = filter_thread(tree, thread_id);

        tracing::debug!(
            thread_id = %thread_id,
            days = conversations.len(),
            "Loaded stored conversations"
        );

        Ok(conversations)
    }
}
