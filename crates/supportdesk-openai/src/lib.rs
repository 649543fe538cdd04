// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider for supportdesk.
//!
//! Implements [`ModelProvider`] on top of the Responses API: streamed chat
//! replies over SSE and single-shot completions for ticket summaries. Both
//! calls run under their own [`RetryPolicy`].

pub mod client;
pub mod sse;
pub mod types;

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use supportdesk_config::model::{OpenAIConfig, RetrySettings};
use supportdesk_core::traits::StreamSource;
use supportdesk_core::{ChatMessage, EventSource, ModelProvider, SupportError};
use supportdesk_resilience::{HttpAttemptError, RetryError, RetryPolicy};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::OpenAIClient;
use crate::types::{ResponseObject, ResponseRequest};

/// Message used when no API key is configured.
pub const MISSING_API_KEY: &str =
    "missing OpenAI API key; set openai.api_key or OPENAI_API_KEY before using AI routes";

/// OpenAI provider implementing [`ModelProvider`].
pub struct OpenAIProvider {
    client: OpenAIClient,
    chat_model: String,
    summary_model: String,
    chat_retry: RetryPolicy,
    summary_retry: RetryPolicy,
}

impl OpenAIProvider {
    /// Creates a provider from configuration.
    ///
    /// Fails with [`SupportError::Config`] when the API key is missing or
    /// blank, before anything touches the network.
    pub fn new(config: &OpenAIConfig, retry: &RetrySettings) -> Result<Self, SupportError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SupportError::Config(MISSING_API_KEY.to_string()))?;

        let client = OpenAIClient::new(api_key, &config.base_url, config.request_timeout())?;

        info!(
            chat_model = %config.chat_model,
            summary_model = %config.summary_model(),
            "OpenAI provider initialized"
        );

        Ok(Self {
            client,
            chat_model: config.chat_model.clone(),
            summary_model: config.summary_model().to_string(),
            chat_retry: RetryPolicy::new(retry.chat.to_retry_config()),
            summary_retry: RetryPolicy::new(retry.summary.to_retry_config()),
        })
    }

    /// Stops pending retries as soon as `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.chat_retry = self.chat_retry.with_cancellation(token.clone());
        self.summary_retry = self.summary_retry.with_cancellation(token);
        self
    }

    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    pub fn summary_model(&self) -> &str {
        &self.summary_model
    }

    /// Sends `request` under `policy` and returns the first 2xx response.
    ///
    /// Transport failures and 5xx are retried; anything else below 500 is
    /// an immediate upstream error.
    async fn send_with_retry(
        &self,
        call: &'static str,
        policy: &RetryPolicy,
        request: &ResponseRequest,
    ) -> Result<reqwest::Response, SupportError> {
        let attempt = AtomicU32::new(0);
        let response = policy
            .execute_http(|| {
                let n = attempt.fetch_add(1, Ordering::Relaxed);
                if n > 0 {
                    warn!(call, attempt = n, "retrying OpenAI request after transient error");
                }
                self.client.send(request)
            })
            .await
            .map_err(|err| retry_failure(call, err))?;

        let status = response.status();
        debug!(call, status = %status, "OpenAI response received");
        if status.is_success() {
            Ok(response)
        } else {
            let err = client::error_from_response(response).await;
            warn!(call, status = %status, error = %err, "OpenAI request rejected");
            Err(err)
        }
    }
}

fn retry_failure(call: &str, err: RetryError<HttpAttemptError<reqwest::Error>>) -> SupportError {
    let message = if err.is_cancelled() {
        format!("OpenAI {call} request cancelled after {} attempt(s)", err.attempts())
    } else {
        match err.last_error() {
            Some(last) => format!(
                "OpenAI {call} request failed after {} attempt(s): {last}",
                err.attempts()
            ),
            None => format!("OpenAI {call} request failed"),
        }
    };
    warn!(call, attempts = err.attempts(), error = %message, "OpenAI request failed");
    SupportError::Upstream {
        message,
        source: Some(Box::new(err)),
    }
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    async fn stream_chat(
        &self,
        instructions: &str,
        messages: &[ChatMessage],
    ) -> Result<Box<dyn EventSource>, SupportError> {
        let request = ResponseRequest::chat(&self.chat_model, instructions, messages);
        let response = self
            .send_with_retry("chat", &self.chat_retry, &request)
            .await?;
        Ok(Box::new(StreamSource::new(sse::parse_event_stream(response))))
    }

    async fn complete(&self, prompt: &str) -> Result<String, SupportError> {
        let request = ResponseRequest::prompt(&self.summary_model, prompt);
        let response = self
            .send_with_retry("summary", &self.summary_retry, &request)
            .await?;

        let body: ResponseObject = response.json().await.map_err(|e| SupportError::Upstream {
            message: format!("failed to parse OpenAI response: {e}"),
            source: Some(Box::new(e)),
        })?;
        if let Some(usage) = body.usage {
            debug!(
                response_id = %body.id,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "summary completion finished"
            );
        }
        Ok(body.output_text())
    }
}
