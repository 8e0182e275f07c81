// OpenAI Assistants API (v2)
// https://platform.openai.com/docs/api-reference/assistants

use crate::types::{Message, Run, RunStatus, ThreadMessage};
use serde::{Deserialize, Serialize};

/// Header value required by every Assistants v2 endpoint
pub const ASSISTANTS_BETA_HEADER: &str = "assistants=v2";

/// Thread object from /v1/threads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadObject {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created_at: i64,
}

/// Message object from /v1/threads/{thread_id}/messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageObject {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

/// Content block of a thread message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        text: TextContent,
    },
    // Images and file references carry no text
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<serde_json::Value>,
}

/// Paginated list of thread messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub object: String,
    pub data: Vec<MessageObject>,
    #[serde(default)]
    pub has_more: bool,
}

/// Run object from /v1/threads/{thread_id}/runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunObject {
    pub id: String,
    pub thread_id: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<RunError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

impl MessageObject {
    /// Concatenated text of all text blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                MessageContent::Text { text } => Some(text.value.as_str()),
                MessageContent::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn into_thread_message(self) -> ThreadMessage {
        let text = self.text();
        let message = match self.role.as_str() {
            "assistant" => Message::ai(text),
            "system" => Message::system(text),
            _ => Message::human(text),
        };
        ThreadMessage {
            id: self.id,
            message,
        }
    }
}

impl From<RunObject> for Run {
    fn from(raw: RunObject) -> Self {
        Run {
            id: raw.id,
            thread_id: raw.thread_id,
            status: raw.status,
            last_error: raw
                .last_error
                .map(|e| format!("{}: {}", e.code, e.message)),
        }
    }
}
