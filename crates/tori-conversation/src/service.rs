use std::sync::Arc;
use tori_llm::{AssistantClient, Message};
use tori_persist::{ConversationStore, ConversationsByDate};

use crate::builder::ConversationServiceBuilder;
use crate::driver::{ConversationRunDriver, Reply};
use crate::error::{ConversationError, Result};
use crate::retry::RetryPolicy;
use crate::summary::{SummaryResult, Summarizer};

/// Request-level operations over the shared, read-only clients
///
/// Cheap to share behind an `Arc`; every call owns its own state.
pub struct ConversationService {
    assistants: Arc<dyn AssistantClient>,
    store: Arc<dyn ConversationStore>,
    driver: ConversationRunDriver,
    summarizer: Summarizer,
    thread_retry: RetryPolicy,
    fallback_message: String,
}

impl ConversationService {
    pub(crate) fn new(
        assistants: Arc<dyn AssistantClient>,
        store: Arc<dyn ConversationStore>,
        driver: ConversationRunDriver,
        summarizer: Summarizer,
        thread_retry: RetryPolicy,
        fallback_message: String,
    ) -> Self {
        Self {
            assistants,
            store,
            driver,
            summarizer,
            thread_retry,
            fallback_message,
        }
    }

    pub fn builder() -> ConversationServiceBuilder {
        ConversationServiceBuilder::new()
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// Create an upstream thread seeded with the user's first prompt
    pub async fn create_thread(&self, first_prompt: &str) -> Result<String> {
        let client = self.assistants.as_ref();
        let seed = vec![Message::human(first_prompt)];

        let thread_id = self
            .thread_retry
            .run("create_thread", || client.create_thread(seed.clone()))
            .await
            .map_err(|failure| ConversationError::ThreadCreationFailed {
                attempts: failure.attempts,
                source: failure.error,
            })?;

        tracing::info!(thread_id = %thread_id, "Thread created");
        Ok(thread_id)
    }

    /// Send one user turn and return Tori's reply, or the fallback text
    pub async fn send_message(&self, thread_id: &str, text: &str) -> Result<String> {
        let reply = self.driver.drive(thread_id, text).await?;

        if let Reply::Fallback(ref reason) = reply {
            tracing::warn!(thread_id = %thread_id, reason = ?reason, "Replying with fallback message");
        }

        Ok(reply.text_or(&self.fallback_message).to_string())
    }

    /// Summarize a client-supplied transcript
    pub async fn summarize(&self, transcript: &[Message]) -> Result<SummaryResult> {
        self.summarizer.summarize(transcript).await
    }

    /// Stored conversation of a thread, keyed by date
    pub async fn history(&self, thread_id: &str) -> Result<ConversationsByDate> {
        self.store
            .conversations_for_thread(thread_id)
            .await
            .map_err(|source| ConversationError::HistoryUnavailable {
                thread_id: thread_id.to_string(),
                source,
            })
    }

    /// Summarize a stored day of a thread; the latest day when `date` is `None`
    pub async fn summarize_thread(
        &self,
        thread_id: &str,
        date: Option<&str>,
    ) -> Result<(String, SummaryResult)> {
        let mut conversations = self.history(thread_id).await?;

        let not_found = || ConversationError::HistoryNotFound {
            thread_id: thread_id.to_string(),
            date: date.map(str::to_string),
        };

        let (day, transcript) = match date {
            Some(date) => conversations
                .remove_entry(date)
                .ok_or_else(not_found)?,
            None => conversations.pop_last().ok_or_else(not_found)?,
        };

        if transcript.is_empty() {
            return Err(not_found());
        }

        tracing::debug!(thread_id = %thread_id, date = %day, turns = transcript.len(), "Summarizing stored day");
        let result = self.summarizer.summarize(&transcript).await?;
        Ok((day, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ChatOutcome, MemoryStore, ScriptedAssistant, ScriptedChat};
    use crate::summary::Emotion;
    use tori_llm::{RunRequest, RunStatus};

    const FALLBACK: &str = "잠시 후에 다시 말해줘";

    fn service(
        assistant: Arc<ScriptedAssistant>,
        chat: Arc<ScriptedChat>,
        store: MemoryStore,
    ) -> ConversationService {
        ConversationService::builder()
            .assistant_client(assistant)
            .chat_client(chat)
            .store(Arc::new(store))
            .assistant(RunRequest::new("asst_1"))
            .fallback_message(FALLBACK)
            .build()
            .unwrap()
    }

    fn summary_chat() -> Arc<ScriptedChat> {
        Arc::new(ScriptedChat::new([ChatOutcome::Content(
            r#"{"emotion":"neutral","summary":[{"content":"산책했다."}]}"#.to_string(),
        )]))
    }

    #[tokio::test]
    async fn test_create_thread_returns_upstream_id() {
        let assistant = Arc::new(ScriptedAssistant::new());
        let svc = service(assistant.clone(), summary_chat(), MemoryStore::new());

        let thread_id = svc.create_thread("오늘 기분 최고야").await.unwrap();

        assert_eq!(thread_id, "thread_1");
        assert_eq!(
            assistant.created_threads(),
            vec![vec![Message::human("오늘 기분 최고야")]]
        );
    }

    #[tokio::test]
    async fn test_create_thread_recovers_after_failures() {
        let assistant = Arc::new(ScriptedAssistant::new().with_thread_failures(3));
        let svc = service(assistant.clone(), summary_chat(), MemoryStore::new());

        let thread_id = svc.create_thread("hi").await.unwrap();

        assert_eq!(thread_id, "thread_1");
        assert_eq!(assistant.created_threads().len(), 1);
    }

    #[tokio::test]
    async fn test_create_thread_hard_error_after_exhaustion() {
        let assistant = Arc::new(ScriptedAssistant::new().with_thread_failures(4));
        let svc = service(assistant, summary_chat(), MemoryStore::new());

        let err = svc.create_thread("hi").await.unwrap_err();

        assert!(matches!(err, ConversationError::ThreadCreationFailed { attempts: 4, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_message_soft_failure_returns_fallback_text() {
        let assistant = Arc::new(ScriptedAssistant::new().with_statuses([RunStatus::Expired]));
        let svc = service(assistant, summary_chat(), MemoryStore::new());

        let reply = svc.send_message("thread_1", "hello").await.unwrap();

        assert_eq!(reply, FALLBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_message_stalled_status_read_returns_fallback_text() {
        let assistant = Arc::new(
            ScriptedAssistant::new()
                .with_statuses([RunStatus::InProgress])
                .with_poll_delay(std::time::Duration::from_secs(120)),
        );
        let svc = service(assistant, summary_chat(), MemoryStore::new());

        let reply = svc.send_message("thread_1", "hello").await.unwrap();

        assert_eq!(reply, FALLBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_message_returns_answer() {
        let assistant = Arc::new(
            ScriptedAssistant::new()
                .with_statuses([RunStatus::InProgress, RunStatus::Completed])
                .with_reply("그랬구나"),
        );
        let svc = service(assistant, summary_chat(), MemoryStore::new());

        let reply = svc.send_message("thread_1", "hello").await.unwrap();

        assert_eq!(reply, "그랬구나");
    }

    #[tokio::test]
    async fn test_summarize_thread_uses_latest_day() {
        let store = MemoryStore::new()
            .with_day("thread_1", "2024-06-01", vec![Message::human("old")])
            .with_day("thread_1", "2024-06-02", vec![Message::human("산책했어")]);
        let chat = summary_chat();
        let svc = service(Arc::new(ScriptedAssistant::new()), chat.clone(), store);

        let (date, result) = svc.summarize_thread("thread_1", None).await.unwrap();

        assert_eq!(date, "2024-06-02");
        assert_eq!(result.emotion, Emotion::Neutral);
        assert_eq!(chat.requests()[0].messages[1], Message::human("산책했어"));
    }

    #[tokio::test]
    async fn test_summarize_thread_missing_date() {
        let store = MemoryStore::new().with_day("thread_1", "2024-06-01", vec![Message::human("hi")]);
        let svc = service(Arc::new(ScriptedAssistant::new()), summary_chat(), store);

        let err = svc
            .summarize_thread("thread_1", Some("2024-06-05"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConversationError::HistoryNotFound { date: Some(ref d), .. } if d == "2024-06-05"
        ));
    }

    #[tokio::test]
    async fn test_history_store_failure() {
        let svc = service(
            Arc::new(ScriptedAssistant::new()),
            summary_chat(),
            MemoryStore::new().failing(),
        );

        let err = svc.history("thread_1").await.unwrap_err();

        assert!(matches!(err, ConversationError::HistoryUnavailable { .. }));
    }
}
