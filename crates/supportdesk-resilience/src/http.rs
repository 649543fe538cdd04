// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP specialization of [`RetryPolicy`].
//!
//! A response with status >= 500 counts as a failed attempt even though the
//! transport succeeded. Anything below 500, 4xx included, is handed back to
//! the caller untouched. `Retry-After` is not consulted.

use std::future::Future;

use thiserror::Error;

use crate::retry::{RetryError, RetryPolicy};

/// Anything that carries an HTTP status code.
pub trait HttpStatus {
    fn status_code(&self) -> u16;
}

impl HttpStatus for reqwest::Response {
    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }
}

/// Failure of a single HTTP attempt.
#[derive(Debug, Error)]
pub enum HttpAttemptError<E> {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[source] E),

    /// The server answered with a 5xx status.
    #[error("Server error {0}")]
    ServerStatus(u16),
}

impl RetryPolicy {
    /// Runs an HTTP request, retrying transport failures and 5xx responses.
    pub async fn execute_http<R, E, F, Fut>(
        &self,
        mut operation: F,
    ) -> Result<R, RetryError<HttpAttemptError<E>>>
    where
        R: HttpStatus,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        self.execute(|| {
            let attempt = operation();
            async move {
                match attempt.await {
                    Ok(response) if response.status_code() >= 500 => {
                        Err(HttpAttemptError::ServerStatus(response.status_code()))
                    }
                    Ok(response) => Ok(response),
                    Err(e) => Err(HttpAttemptError::Transport(e)),
                }
            }
        })
        .await
    }
}
