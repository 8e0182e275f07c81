use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use tori_conversation::{Emotion, SummaryResult};
use tori_llm::Message;

use crate::{
    error::{ApiError, ApiResult, ErrorResponse},
    extract::{require_non_empty, Validate, ValidJson},
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation as exchanged with clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl From<Turn> for Message {
    fn from(turn: Turn) -> Self {
        match turn.role {
            Role::System => Message::system(turn.content),
            Role::User => Message::human(turn.content),
            Role::Assistant => Message::ai(turn.content),
        }
    }
}

impl From<Message> for Turn {
    fn from(message: Message) -> Self {
        let role = match message {
            Message::System { .. } => Role::System,
            Message::Human { .. } => Role::User,
            Message::AI { .. } => Role::Assistant,
        };
        Self {
            role,
            content: message.content().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummarizeRequest {
    pub messages: Vec<Turn>,
}

/// Any well-formed transcript is accepted; one without user turns
/// summarizes to a neutral day with no lines
impl Validate for SummarizeRequest {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryLineResponse {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    #[schema(value_type = String, example = "happy")]
    pub dotori_emotion: Emotion,
    pub summary: Vec<SummaryLineResponse>,
}

impl From<SummaryResult> for SummaryResponse {
    fn from(result: SummaryResult) -> Self {
        Self {
            dotori_emotion: result.emotion,
            summary: result
                .summary
                .into_iter()
                .map(|line| SummaryLineResponse { content: line.content })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummarizeThreadRequest {
    pub thread_id: String,
    /// Day to summarize (`YYYY-MM-DD`); the latest stored day when omitted
    #[serde(default)]
    pub date: Option<String>,
}

impl Validate for SummarizeThreadRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("thread_id", &self.thread_id)?;
        match &self.date {
            Some(date) if !tori_persist::is_date_key(date) => Err(ApiError::Validation(
                format!("date must be formatted as YYYY-MM-DD, got {date:?}"),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThreadSummaryResponse {
    pub thread_id: String,
    pub date: String,
    #[schema(value_type = String, example = "happy")]
    pub dotori_emotion: Emotion,
    pub summary: Vec<SummaryLineResponse>,
}

/// Summarize a client-supplied transcript into a diary entry
#[utoipa::path(
    post,
    path = "/summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Diary summary", body = SummaryResponse),
        (status = 422, description = "Invalid request or content refused", body = ErrorResponse),
        (status = 500, description = "Summary failed after retries", body = ErrorResponse)
    ),
    tag = "summary"
)]
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<SummarizeRequest>,
) -> ApiResult<Json<SummaryResponse>> {
    let transcript: Vec<Message> = req.messages.into_iter().map(Message::from).collect();
    let result = state.service.summarize(&transcript).await?;

    Ok(Json(SummaryResponse::from(result)))
}

/// Summarize a stored day of a thread
#[utoipa::path(
    post,
    path = "/summarize_thread",
    request_body = SummarizeThreadRequest,
    responses(
        (status = 200, description = "Diary summary of the stored day", body = ThreadSummaryResponse),
        (status = 404, description = "Nothing stored for the thread or day", body = ErrorResponse),
        (status = 422, description = "Invalid request or content refused", body = ErrorResponse),
        (status = 502, description = "Conversation store failure", body = ErrorResponse)
    ),
    tag = "summary"
)]
pub async fn summarize_thread(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<SummarizeThreadRequest>,
) -> ApiResult<Json<ThreadSummaryResponse>> {
    let (date, result) = state
        .service
        .summarize_thread(&req.thread_id, req.date.as_deref())
        .await?;
    let SummaryResponse { dotori_emotion, summary } = SummaryResponse::from(result);

    Ok(Json(ThreadSummaryResponse {
        thread_id: req.thread_id,
        date,
        dotori_emotion,
        summary,
    }))
}
