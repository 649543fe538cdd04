// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded exponential-backoff retry.
//!
//! An operation is attempted up to `max_retries + 1` times. After the
//! failed attempt number `n` (counting from zero) the caller is suspended
//! for `initial_delay * 2^n`. There is no jitter.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Retry budget for one call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt. Zero means a single attempt.
    pub max_retries: u32,
    /// Delay after the first failure; doubles for every further failure.
    pub initial_delay: Duration,
}

impl RetryConfig {
    pub const fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }

    /// Backoff before the attempt following failed attempt `attempt`.
    ///
    /// Exactly `initial_delay * 2^attempt`, saturating at [`Duration::MAX`].
    pub fn delay_for(&self, attempt: u32) -> Duration {
        const NANOS_PER_SEC: u128 = 1_000_000_000;

        let nanos = self.initial_delay.as_nanos();
        if nanos == 0 {
            return Duration::ZERO;
        }
        let scaled = 1u128
            .checked_shl(attempt)
            .and_then(|factor| nanos.checked_mul(factor))
            .filter(|scaled| *scaled <= Duration::MAX.as_nanos());
        match scaled {
            Some(scaled) => Duration::new(
                (scaled / NANOS_PER_SEC) as u64,
                (scaled % NANOS_PER_SEC) as u32,
            ),
            None => Duration::MAX,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(300))
    }
}

/// Why a retried operation gave up.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed; `source` is the error from the last one.
    #[error("operation failed after {attempts} attempt(s): {source}")]
    Exhausted { attempts: u32, source: E },

    /// The retry predicate declined to retry this error.
    #[error("operation failed with a non-retryable error: {source}")]
    Rejected { attempts: u32, source: E },

    /// The cancellation token fired before the budget ran out.
    #[error("operation cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32, last_error: Option<E> },
}

impl<E> RetryError<E> {
    /// Number of times the operation was invoked.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. }
            | RetryError::Rejected { attempts, .. }
            | RetryError::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// The last error the operation produced, if any attempt ran.
    pub fn last_error(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::Rejected { source, .. } => {
                Some(source)
            }
            RetryError::Cancelled { last_error, .. } => last_error.as_ref(),
        }
    }

    /// Consumes the error, returning the last operation error.
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::Rejected { source, .. } => {
                Some(source)
            }
            RetryError::Cancelled { last_error, .. } => last_error,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }
}

/// Retry policy: a [`RetryConfig`] plus an optional cancellation signal.
///
/// The token is checked before every attempt and raced against every
/// backoff sleep, so a retry loop never outlives its caller.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
    cancel: Option<CancellationToken>,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Attaches a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs `operation`, retrying every failure.
    pub async fn execute<T, E, F, Fut>(&self, operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_if(operation, |_| true).await
    }

    /// Runs `operation`, retrying only failures accepted by `is_retryable`.
    ///
    /// Attempts are strictly sequential.
    pub async fn execute_if<T, E, F, Fut, P>(
        &self,
        mut operation: F,
        is_retryable: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt: u32 = 0;
        let mut last_error = None;

        loop {
            if self.cancelled() {
                return Err(RetryError::Cancelled {
                    attempts: attempt,
                    last_error,
                });
            }

            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };
            let attempts = attempt + 1;

            if !is_retryable(&error) {
                return Err(RetryError::Rejected {
                    attempts,
                    source: error,
                });
            }
            if attempt >= self.config.max_retries {
                return Err(RetryError::Exhausted {
                    attempts,
                    source: error,
                });
            }

            last_error = Some(error);
            if !self.backoff(self.config.delay_for(attempt)).await {
                return Err(RetryError::Cancelled {
                    attempts,
                    last_error,
                });
            }
            attempt += 1;
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Sleeps for `delay`. Returns `false` if cancelled first.
    async fn backoff(&self, delay: Duration) -> bool {
        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => false,
                _ = tokio::time::sleep(delay) => true,
            },
            None => {
                tokio::time::sleep(delay).await;
                true
            }
        }
    }
}
