use crate::error::AnalysisError;
use crate::prompt::Prompt;
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

/// Caller-level retry around a provider.
///
/// Only transport failures are retried; configuration problems, unparseable
/// answers and "not a chart" outcomes are returned immediately. Nothing in
/// the analysis pipeline wraps providers in this on its own.
pub struct RetryingProvider {
    inner: Box<dyn LlmProvider>,
    attempts: u32,
    delay: Duration,
}

impl RetryingProvider {
    /// `attempts` counts the first try; values below 1 are treated as 1
    pub fn new(inner: Box<dyn LlmProvider>, attempts: u32, delay: Duration) -> Self {
        RetryingProvider {
            inner,
            attempts: attempts.max(1),
            delay,
        }
    }
}

#[async_trait]
impl LlmProvider for RetryingProvider {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, AnalysisError> {
        let mut attempt = 1;

        loop {
            debug!(
                "Calling {} (attempt {}/{})",
                self.inner.provider_name(),
                attempt,
                self.attempts
            );

            match self.inner.complete(prompt).await {
                Ok(text) => {
                    if attempt > 1 {
                        info!(
                            "{} succeeded on attempt {}",
                            self.inner.provider_name(),
                            attempt
                        );
                    }
                    return Ok(text);
                }
                Err(e) if e.is_transient() && attempt < self.attempts => {
                    warn!(
                        "Provider {} failed (attempt {}/{}): {}",
                        self.inner.provider_name(),
                        attempt,
                        self.attempts,
                        e
                    );
                    // Linear backoff: delay grows with each attempt
                    let delay = self.delay * attempt;
                    debug!("Waiting {:?} before retry", delay);
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
