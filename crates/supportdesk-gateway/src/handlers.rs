// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the support API.
//!
//! Handles POST /api/ai/support-chat, GET and POST /api/support/tickets,
//! PATCH /api/support/tickets/{id}, and GET /health.

use axum::{
    Json,
    body::Body,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use supportdesk_core::{ChatMessage, NewTicket, SupportError, SupportTicket, TicketStatus};
use tracing::{error, info, warn};

use crate::relay::relay;
use crate::server::AppState;
use crate::summary::{SUPPORT_SYSTEM_PROMPT, generate_summary};

pub const EMPTY_CHAT_MESSAGE: &str = "At least one message is required.";
pub const MISSING_TICKET_FIELDS_MESSAGE: &str =
    "title, customerName, customerEmail and messages are required.";
pub const TICKET_NOT_FOUND_MESSAGE: &str = "Ticket not found.";

/// Request body for POST /api/ai/support-chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

/// Request body for POST /api/support/tickets.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

/// Request body for PATCH /api/support/tickets/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketListResponse {
    pub tickets: Vec<SupportTicket>,
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub ticket: SupportTicket,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error on its way to becoming a `{ "error": ... }` response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SupportError> for ApiError {
    fn from(err: SupportError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &err {
            SupportError::NotFound { resource, .. } => format!("{resource} not found."),
            other => other.to_string(),
        };
        Self { status, message }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        invalid_input(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "request rejected");
        }
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

/// Rejected request input; always a 400.
fn invalid_input(message: impl Into<String>) -> ApiError {
    SupportError::Validation(message.into()).into()
}

/// Trims a required string field; blank counts as missing.
fn required(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn invalid_status_message() -> String {
    let names: Vec<String> = TicketStatus::ALL.iter().map(ToString::to_string).collect();
    format!("status must be one of: {}", names.join(", "))
}

/// POST /api/ai/support-chat
///
/// Streams the assistant reply as plain text chunks.
pub async fn post_support_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let messages = body.messages.unwrap_or_default();
    if messages.is_empty() {
        return Err(invalid_input(EMPTY_CHAT_MESSAGE));
    }

    let source = state
        .provider
        .stream_chat(SUPPORT_SYSTEM_PROMPT, &messages)
        .await?;
    info!(messages = messages.len(), "streaming support reply");

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Body::from_stream(relay(source)),
    )
        .into_response())
}

/// GET /api/support/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
) -> Result<Json<TicketListResponse>, ApiError> {
    let tickets = state.store.list().await?;
    Ok(Json(TicketListResponse { tickets }))
}

/// POST /api/support/tickets
///
/// Summarizes the conversation and stores it as an open ticket.
pub async fn create_ticket(
    State(state): State<AppState>,
    body: Result<Json<CreateTicketRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TicketResponse>), ApiError> {
    let Json(body) = body?;
    let messages = body.messages.unwrap_or_default();
    let (Some(title), Some(customer_name), Some(customer_email)) = (
        required(body.title),
        required(body.customer_name),
        required(body.customer_email),
    ) else {
        return Err(invalid_input(MISSING_TICKET_FIELDS_MESSAGE));
    };
    if messages.is_empty() {
        return Err(invalid_input(MISSING_TICKET_FIELDS_MESSAGE));
    }

    let summary = generate_summary(state.provider.as_ref(), &messages).await;
    let ticket = state
        .store
        .create(NewTicket {
            title,
            customer_name,
            customer_email,
            summary,
            messages,
        })
        .await?;

    info!(ticket_id = %ticket.id, "ticket created");
    Ok((StatusCode::CREATED, Json(TicketResponse { ticket })))
}

/// PATCH /api/support/tickets/{id}
pub async fn update_ticket_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<TicketResponse>, ApiError> {
    let Json(body) = body?;
    let status = body
        .status
        .as_deref()
        .and_then(|s| s.parse::<TicketStatus>().ok())
        .ok_or_else(|| invalid_input(invalid_status_message()))?;

    match state.store.update_status(&id, status).await? {
        Some(ticket) => {
            info!(ticket_id = %id, %status, "ticket status changed");
            Ok(Json(TicketResponse { ticket }))
        }
        None => Err(SupportError::NotFound {
            resource: "Ticket",
            id,
        }
        .into()),
    }
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}
