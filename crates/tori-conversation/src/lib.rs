pub mod builder;
pub mod config;
pub mod driver;
pub mod error;
pub mod prompts;
pub mod retry;
pub mod service;
pub mod summary;

#[cfg(test)]
mod mock;

pub use builder::ConversationServiceBuilder;
pub use config::{DriverConfig, SummaryConfig, DEFAULT_FALLBACK_MESSAGE};
pub use driver::{ConversationRunDriver, FallbackReason, Reply};
pub use error::{ConversationError, Result};
pub use retry::{RetryFailure, RetryPolicy, DEFAULT_MAX_RETRIES};
pub use service::ConversationService;
pub use summary::{Emotion, Summarizer, SummaryLine, SummaryResult};
