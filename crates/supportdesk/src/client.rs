// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a running supportdesk server.
//!
//! Every call goes through [`RetryPolicy::execute_http`]: transport failures
//! and 5xx responses are retried, anything else is returned to the caller.
//! A non-2xx response is turned into the server's `{ "error": ... }` message,
//! or a fixed fallback when the body carries none.

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use supportdesk_config::model::RetrySettings;
use supportdesk_core::{ChatMessage, SupportTicket};
use supportdesk_resilience::{HttpAttemptError, RetryError, RetryPolicy};
use thiserror::Error;

const CHAT_FAILED: &str = "Support assistant request failed.";
const LIST_FAILED: &str = "Failed to load tickets.";
const CREATE_FAILED: &str = "Ticket creation failed.";
const UPDATE_FAILED: &str = "Failed to update status.";

/// Errors surfaced to the command-line user.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// No usable response after the retry budget was spent.
    #[error("{0}")]
    Unreachable(String),

    /// The response body could not be read as expected.
    #[error("invalid response from server: {0}")]
    Decode(#[source] reqwest::Error),

    /// The reply stream broke after it started.
    #[error("reply stream interrupted: {0}")]
    Stream(#[source] reqwest::Error),

    #[error("Assistant returned an empty answer. Please retry.")]
    EmptyReply,

    #[error("failed to build HTTP client: {0}")]
    Setup(#[source] reqwest::Error),

    /// Local terminal or input problem.
    #[error("{0}")]
    Terminal(String),
}

impl ClientError {
    /// Whether resending the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ClientError::Server { status, .. } if *status < 500
        ) && !matches!(self, ClientError::Terminal(_))
    }
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    messages: &'a [ChatMessage],
}

/// Fields of an escalation, as sent to POST /api/support/tickets.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDraft<'a> {
    pub title: &'a str,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub messages: &'a [ChatMessage],
}

#[derive(Debug, Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TicketListBody {
    tickets: Vec<SupportTicket>,
}

#[derive(Debug, Deserialize)]
struct TicketBody {
    ticket: SupportTicket,
}

/// Client for the supportdesk HTTP API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    chat_retry: RetryPolicy,
    tickets_retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(base_url: &str, retry: &RetrySettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ClientError::Setup)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            chat_retry: RetryPolicy::new(retry.client_chat.to_retry_config()),
            tickets_retry: RetryPolicy::new(retry.client_tickets.to_retry_config()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends one chat turn and streams the reply.
    ///
    /// `on_text` sees each decoded piece as it arrives. Returns the full
    /// reply, which is never blank.
    pub async fn send_chat<F>(
        &self,
        messages: &[ChatMessage],
        mut on_text: F,
    ) -> Result<String, ClientError>
    where
        F: FnMut(&str),
    {
        let url = self.url("/api/ai/support-chat");
        let body = ChatBody { messages };
        let response = self
            .chat_retry
            .execute_http(|| self.http.post(&url).json(&body).send())
            .await
            .map_err(retry_failure)?;
        let response = ensure_success(response, CHAT_FAILED).await?;

        let mut stream = response.bytes_stream();
        let mut pending = Vec::new();
        let mut reply = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ClientError::Stream)?;
            pending.extend_from_slice(&chunk);
            let text = drain_utf8(&mut pending);
            if !text.is_empty() {
                on_text(&text);
                reply.push_str(&text);
            }
        }
        if !pending.is_empty() {
            let tail = String::from_utf8_lossy(&pending).into_owned();
            on_text(&tail);
            reply.push_str(&tail);
        }

        if reply.trim().is_empty() {
            return Err(ClientError::EmptyReply);
        }
        Ok(reply)
    }

    pub async fn list_tickets(&self) -> Result<Vec<SupportTicket>, ClientError> {
        let url = self.url("/api/support/tickets");
        let response = self
            .tickets_retry
            .execute_http(|| self.http.get(&url).send())
            .await
            .map_err(retry_failure)?;
        let response = ensure_success(response, LIST_FAILED).await?;
        let body: TicketListBody = response.json().await.map_err(ClientError::Decode)?;
        Ok(body.tickets)
    }

    pub async fn create_ticket(&self, draft: &TicketDraft<'_>) -> Result<SupportTicket, ClientError> {
        let url = self.url("/api/support/tickets");
        let response = self
            .tickets_retry
            .execute_http(|| self.http.post(&url).json(draft).send())
            .await
            .map_err(retry_failure)?;
        let response = ensure_success(response, CREATE_FAILED).await?;
        let body: TicketBody = response.json().await.map_err(ClientError::Decode)?;
        Ok(body.ticket)
    }

    /// Sets a ticket's status. The server validates `status`.
    pub async fn update_status(&self, id: &str, status: &str) -> Result<SupportTicket, ClientError> {
        let url = self.url(&format!("/api/support/tickets/{id}"));
        let body = StatusBody { status };
        let response = self
            .tickets_retry
            .execute_http(|| self.http.patch(&url).json(&body).send())
            .await
            .map_err(retry_failure)?;
        let response = ensure_success(response, UPDATE_FAILED).await?;
        let body: TicketBody = response.json().await.map_err(ClientError::Decode)?;
        Ok(body.ticket)
    }
}

fn retry_failure(err: RetryError<HttpAttemptError<reqwest::Error>>) -> ClientError {
    let message = match err.last_error() {
        Some(last) => last.to_string(),
        None => err.to_string(),
    };
    ClientError::Unreachable(message)
}

async fn ensure_success(
    response: reqwest::Response,
    fallback: &str,
) -> Result<reqwest::Response, ClientError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    Err(ClientError::Server { status, message })
}

/// Takes the longest valid UTF-8 prefix out of `pending`.
///
/// An incomplete trailing sequence stays buffered for the next chunk.
/// Invalid bytes are replaced.
fn drain_utf8(pending: &mut Vec<u8>) -> String {
    match std::str::from_utf8(pending) {
        Ok(text) => {
            let text = text.to_string();
            pending.clear();
            text
        }
        Err(e) if e.error_len().is_none() => {
            let tail = pending.split_off(e.valid_up_to());
            let text = String::from_utf8_lossy(pending).into_owned();
            *pending = tail;
            text
        }
        Err(_) => {
            let text = String::from_utf8_lossy(pending).into_owned();
            pending.clear();
            text
        }
    }
}
