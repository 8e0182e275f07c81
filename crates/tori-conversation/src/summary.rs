use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tori_llm::{ChatClient, ChatOptions, ChatRequest, Message, ResponseFormat};

use crate::config::SummaryConfig;
use crate::error::{ConversationError, Result};
use crate::prompts::{summary_json_schema, SUMMARY_SCHEMA_NAME, SUMMARY_SYSTEM_PROMPT};

/// Overall mood of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    VeryHappy,
    Happy,
    Neutral,
    Sad,
    VerySad,
    Angry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub content: String,
}

/// Structured diary summary produced from one transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub emotion: Emotion,
    pub summary: Vec<SummaryLine>,
}

impl SummaryResult {
    /// Result for a transcript in which the user said nothing
    pub fn empty() -> Self {
        Self {
            emotion: Emotion::Neutral,
            summary: Vec::new(),
        }
    }
}

/// Outcome of a single summarization attempt
#[derive(Debug, Error)]
enum AttemptError {
    #[error("model refused: {0}")]
    Refused(String),

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Structured-output summarizer
pub struct Summarizer {
    client: Arc<dyn ChatClient>,
    config: SummaryConfig,
}

impl Summarizer {
    pub fn new(client: Arc<dyn ChatClient>, config: SummaryConfig) -> Self {
        Self { client, config }
    }

    /// Summarize `transcript` into an emotion and diary lines
    ///
    /// A refusal is returned as [`ConversationError::ContentRefused`] without
    /// retrying. Other failures are retried and end in
    /// [`ConversationError::SummaryFailed`].
    pub async fn summarize(&self, transcript: &[Message]) -> Result<SummaryResult> {
        let turns = sanitize_transcript(transcript);

        if !turns.iter().any(Message::is_human) {
            tracing::debug!(turns = turns.len(), "No user turns, skipping summary request");
            return Ok(SummaryResult::empty());
        }

        let result = self
            .config
            .retry
            .run_if(
                "summarize",
                || self.request_summary(&turns),
                |e| !matches!(e, AttemptError::Refused(_)),
            )
            .await;

        match result {
            Ok(result) => Ok(drop_assistant_lines(result, &turns)),
            Err(failure) => Err(match failure.error {
                AttemptError::Refused(refusal) => ConversationError::ContentRefused { refusal },
                AttemptError::Failed(source) => ConversationError::SummaryFailed {
                    attempts: failure.attempts,
                    source,
                },
            }),
        }
    }

    async fn request_summary(&self, turns: &[Message]) -> std::result::Result<SummaryResult, AttemptError> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(Message::system(SUMMARY_SYSTEM_PROMPT));
        messages.extend(turns.iter().cloned());

        let mut options = ChatOptions::new().response_format(ResponseFormat::json_schema(
            SUMMARY_SCHEMA_NAME,
            summary_json_schema(),
        ));
        if let Some(temp) = self.config.temperature {
            options = options.temperature(temp);
        }

        let response = self
            .client
            .chat(ChatRequest::new(&self.config.model, messages).with_options(options))
            .await?;

        if let Some(refusal) = response.refusal {
            return Err(AttemptError::Refused(refusal));
        }

        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("summary response has no content"))?;

        let parsed: SummaryResult = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("summary response is not valid JSON: {}", e))?;

        Ok(parsed)
    }
}

/// Keep user and assistant turns with content; client-sent system turns are dropped
pub fn sanitize_transcript(transcript: &[Message]) -> Vec<Message> {
    transcript
        .iter()
        .filter(|m| !matches!(m, Message::System { .. }))
        .filter(|m| !m.content().trim().is_empty())
        .cloned()
        .collect()
}

/// Remove empty lines and lines that repeat an assistant turn
pub fn drop_assistant_lines(mut result: SummaryResult, transcript: &[Message]) -> SummaryResult {
    let assistant_lines: HashSet<&str> = transcript
        .iter()
        .filter(|m| m.is_ai())
        .map(|m| m.content().trim())
        .collect();

    result.summary.retain(|line| {
        let content = line.content.trim();
        !content.is_empty() && !assistant_lines.contains(content)
    });

    result
}
