use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tori_llm::Message;

/// Date key format of the stored conversation tree (`YYYY-MM-DD`)
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Conversation turns of one thread grouped by date key, oldest day first
pub type ConversationsByDate = BTreeMap<String, Vec<Message>>;

/// One day's conversation record as stored under its date key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayConversation {
    #[serde(alias = "threadId")]
    pub thread_id: String,
    #[serde(default)]
    pub messages: StoredMessages,
}

/// Turns are either a plain array or an object keyed by push id.
/// Push ids sort chronologically, so key order is turn order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredMessages {
    List(Vec<Message>),
    Keyed(BTreeMap<String, Message>),
}

impl Default for StoredMessages {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl StoredMessages {
    pub fn into_vec(self) -> Vec<Message> {
        match self {
            Self::List(messages) => messages,
            Self::Keyed(messages) => messages.into_values().collect(),
        }
    }
}

/// Whether `key` names a calendar day
pub fn is_date_key(key: &str) -> bool {
    chrono::NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).is_ok()
}
