use async_trait::async_trait;
use crate::error::Result;
use crate::models::ConversationsByDate;

/// Trait for read-only access to stored conversations
///
/// Implementations traverse the store and return every day whose record
/// belongs to the given thread.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Date key -> turns for all days recorded under `thread_id`
    async fn conversations_for_thread(&self, thread_id: &str) -> Result<ConversationsByDate>;
}
