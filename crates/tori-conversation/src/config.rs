use std::time::Duration;
use tori_llm::RunRequest;

use crate::retry::RetryPolicy;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "미안해, 지금은 대답하기가 어려워. 잠시 후에 다시 이야기해줄래?";

/// Settings for driving one assistant run
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Fixed assistant configuration for every run
    pub assistant: RunRequest,
    pub poll_interval: Duration,
    /// Wall-clock budget measured from run creation
    pub timeout: Duration,
    /// Retries for fetching the reply of a completed run
    pub retrieval_retry: RetryPolicy,
}

impl DriverConfig {
    pub fn new(assistant: RunRequest) -> Self {
        Self {
            assistant,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_RUN_TIMEOUT,
            retrieval_retry: RetryPolicy::default(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retrieval_retry(mut self, retry: RetryPolicy) -> Self {
        self.retrieval_retry = retry;
        self
    }
}

/// Settings for diary summarization
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub model: String,
    pub temperature: Option<f32>,
    pub retry: RetryPolicy,
}

impl SummaryConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_MODEL)
    }
}
