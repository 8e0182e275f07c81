use thiserror::Error;

/// Failures that are surfaced to the caller
///
/// Timeouts and failed runs are not errors: they resolve to the fallback
/// reply (see [`crate::driver::Reply`]).
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("The thread has not been created after {attempts} attempts")]
    ThreadCreationFailed {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to append message to thread {thread_id}")]
    MessageAppendFailed {
        thread_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to start run on thread {thread_id}")]
    RunCreationFailed {
        thread_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to read status of run {run_id} on thread {thread_id}")]
    RunPollFailed {
        thread_id: String,
        run_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Content refused: {refusal}")]
    ContentRefused { refusal: String },

    #[error("Summary has not been generated after {attempts} attempts")]
    SummaryFailed {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("Conversation history unavailable for thread {thread_id}")]
    HistoryUnavailable {
        thread_id: String,
        #[source]
        source: tori_persist::PersistError,
    },

    #[error("No stored conversation for thread {thread_id}")]
    HistoryNotFound {
        thread_id: String,
        date: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, ConversationError>;
