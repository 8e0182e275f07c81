use std::fmt::Display;
use std::future::Future;

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Fixed-count retry with no delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

/// Last error of a retried operation and how many attempts were made
#[derive(Debug)]
pub struct RetryFailure<E> {
    pub attempts: u32,
    pub error: E,
}

impl<E> RetryFailure<E> {
    pub fn into_inner(self) -> E {
        self.error
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Never retry
    pub fn none() -> Self {
        Self::new(0)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Run `op` until it succeeds or the attempts are used up
    pub async fn run<T, E, F, Fut>(&self, label: &str, op: F) -> Result<T, RetryFailure<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run_if(label, op, |_| true).await
    }

    /// Like [`RetryPolicy::run`], but stops at the first error for which
    /// `should_retry` returns false
    pub async fn run_if<T, E, F, Fut, P>(
        &self,
        label: &str,
        mut op: F,
        should_retry: P,
    ) -> Result<T, RetryFailure<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation = label, attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if !should_retry(&error) {
                tracing::warn!(operation = label, attempt, error = %error, "Attempt failed, not retryable");
                return Err(RetryFailure { attempts: attempt, error });
            }

            if attempt >= max_attempts {
                tracing::error!(
                    operation = label,
                    attempts = attempt,
                    error = %error,
                    "Retries exhausted"
                );
                return Err(RetryFailure { attempts: attempt, error });
            }

            tracing::warn!(
                operation = label,
                attempt,
                max_attempts,
                error = %error,
                "Attempt failed, retrying"
            );
        }
    }
}
