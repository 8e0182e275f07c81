pub mod builder;
pub mod client;
pub mod error;
pub mod models;
pub mod trait_client;

pub use builder::{FirebaseClientBuilder, DEFAULT_CONVERSATIONS_PATH};
pub use client::FirebaseClient;
pub use error::{PersistError, Result};
pub use models::{is_date_key, ConversationsByDate, DayConversation, StoredMessages};
pub use trait_client::ConversationStore;
