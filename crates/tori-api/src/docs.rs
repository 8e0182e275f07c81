use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::routes::{health, history, messages, summary, threads};

#[derive(OpenApi)]
#[openapi(
    info(title = "Tori API", description = "Conversation relay for the Tori diary companion"),
    paths(
        health::health_check,
        threads::create_thread,
        messages::send_message,
        summary::summarize,
        summary::summarize_thread,
        history::get_history,
    ),
    components(schemas(
        ErrorResponse,
        health::HealthResponse,
        threads::CreateThreadRequest,
        threads::CreateThreadResponse,
        messages::SendMessageRequest,
        messages::SendMessageResponse,
        summary::Role,
        summary::Turn,
        summary::SummarizeRequest,
        summary::SummaryLineResponse,
        summary::SummaryResponse,
        summary::SummarizeThreadRequest,
        summary::ThreadSummaryResponse,
        history::HistoryResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "threads", description = "Conversation threads"),
        (name = "messages", description = "Talking to Tori"),
        (name = "summary", description = "Diary summaries"),
    )
)]
pub struct ApiDoc;
