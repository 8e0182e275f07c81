use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tori_llm::{AssistantClient, Message, RunStatus};

use crate::config::DriverConfig;
use crate::error::{ConversationError, Result};

/// Why a turn resolved to the fallback reply instead of the model's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The run was still queued or in progress at the deadline
    TimedOut { elapsed: Duration, polls: u32 },
    /// The run ended in a status other than `completed`
    RunEnded {
        status: RunStatus,
        last_error: Option<String>,
    },
    /// The run completed but its reply could not be fetched
    RetrievalExhausted { attempts: u32 },
}

/// Outcome of one driven turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Answer(String),
    Fallback(FallbackReason),
}

impl Reply {
    /// Reply text, substituting `fallback` for a soft failure
    pub fn text_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            Self::Answer(text) => text,
            Self::Fallback(_) => fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Drives one assistant exchange: append, run, poll, fetch
pub struct ConversationRunDriver {
    client: Arc<dyn AssistantClient>,
    config: DriverConfig,
}

impl ConversationRunDriver {
    pub fn new(client: Arc<dyn AssistantClient>, config: DriverConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Append `user_message` to the thread and wait for the assistant's reply
    pub async fn drive(&self, thread_id: &str, user_message: &str) -> Result<Reply> {
        self.client
            .append_message(thread_id, Message::human(user_message))
            .await
            .map_err(|source| ConversationError::MessageAppendFailed {
                thread_id: thread_id.to_string(),
                source,
            })?;

        let run = self
            .client
            .create_run(thread_id, self.config.assistant.clone())
            .await
            .map_err(|source| ConversationError::RunCreationFailed {
                thread_id: thread_id.to_string(),
                source,
            })?;

        tracing::debug!(thread_id = %thread_id, run_id = %run.id, status = %run.status, "Run started");

        let deadline = Instant::now() + self.config.timeout;
        self.await_run(thread_id, &run.id, deadline).await
    }

    /// Poll `run_id` until it leaves the active states or `deadline` passes
    pub async fn await_run(&self, thread_id: &str, run_id: &str, deadline: Instant) -> Result<Reply> {
        let started = Instant::now();
        let mut polls = 0;

        loop {
            polls += 1;
            let polled = tokio::time::timeout_at(deadline, self.client.get_run(thread_id, run_id)).await;

            let Ok(polled) = polled else {
                let elapsed = started.elapsed();
                tracing::warn!(
                    run_id = %run_id,
                    polls,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Run status read outlived the deadline"
                );
                return Ok(Reply::Fallback(FallbackReason::TimedOut { elapsed, polls }));
            };

            let run = polled.map_err(|source| ConversationError::RunPollFailed {
                thread_id: thread_id.to_string(),
                run_id: run_id.to_string(),
                source,
            })?;

            if run.status.is_completed() {
                tracing::debug!(
                    run_id = %run_id,
                    polls,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Run completed"
                );
                return Ok(self.fetch_reply(thread_id).await);
            }

            if !run.status.is_active() {
                tracing::warn!(
                    run_id = %run_id,
                    status = %run.status,
                    last_error = ?run.last_error,
                    "Run ended without completing"
                );
                return Ok(Reply::Fallback(FallbackReason::RunEnded {
                    status: run.status,
                    last_error: run.last_error,
                }));
            }

            if Instant::now() >= deadline {
                let elapsed = started.elapsed();
                tracing::warn!(
                    run_id = %run_id,
                    status = %run.status,
                    polls,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Run timed out"
                );
                return Ok(Reply::Fallback(FallbackReason::TimedOut { elapsed, polls }));
            }

            tokio::time::sleep_until((Instant::now() + self.config.poll_interval).min(deadline)).await;
        }
    }

    /// Most recent thread message, which must be the assistant's answer
    async fn fetch_reply(&self, thread_id: &str) -> Reply {
        let client = self.client.as_ref();

        let fetched = self
            .config
            .retrieval_retry
            .run("fetch_reply", move || latest_reply(client, thread_id))
            .await;

        match fetched {
            Ok(text) => Reply::Answer(text),
            Err(failure) => Reply::Fallback(FallbackReason::RetrievalExhausted {
                attempts: failure.attempts,
            }),
        }
    }
}

async fn latest_reply(client: &dyn AssistantClient, thread_id: &str) -> anyhow::Result<String> {
    match client.list_messages(thread_id, 1).await?.into_iter().next() {
        Some(latest) if latest.message.is_ai() && !latest.text().trim().is_empty() => {
            Ok(latest.text().to_string())
        }
        Some(latest) => anyhow::bail!(
            "latest message {} of thread {} is not an assistant reply",
            latest.id,
            thread_id
        ),
        None => anyhow::bail!("thread {} has no messages", thread_id),
    }
}
