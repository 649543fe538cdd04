// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the gateway, store, provider, and client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Author of a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message in a support conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a message with a fresh id stamped with the current time.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Shorthand for a user-authored message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Shorthand for an assistant-authored message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Lifecycle state of a support ticket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

impl TicketStatus {
    /// Every accepted status, in workflow order.
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
    ];
}

/// A persisted support ticket created by escalating a conversation.
///
/// `messages` is a snapshot taken at creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: String,
    pub title: String,
    pub customer_name: String,
    pub customer_email: String,
    pub status: TicketStatus,
    pub summary: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for ticket creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub title: String,
    pub customer_name: String,
    pub customer_email: String,
    pub summary: String,
    pub messages: Vec<ChatMessage>,
}

impl SupportTicket {
    /// Builds an open ticket with `created_at == updated_at == now`.
    pub fn new(input: NewTicket) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            title: input.title,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            status: TicketStatus::Open,
            summary: input.summary,
            messages: input.messages,
            created_at: now,
            updated_at: now,
        }
    }

    /// Changes the status and bumps `updated_at`.
    ///
    /// `updated_at` never moves behind `created_at`, even with a skewed clock.
    pub fn set_status(&mut self, status: TicketStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now.max(self.created_at);
    }
}

/// One event drawn from an upstream model stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental generated text.
    TextDelta(String),
    /// Any structural or metadata event; carries the upstream event kind.
    Other { kind: String },
}

impl StreamEvent {
    /// Discriminator for the event.
    pub fn kind(&self) -> &str {
        match self {
            StreamEvent::TextDelta(_) => "text-delta",
            StreamEvent::Other { kind } => kind,
        }
    }

    /// Text payload, when this is a non-empty delta.
    pub fn as_text_delta(&self) -> Option<&str> {
        match self {
            StreamEvent::TextDelta(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Generates a new opaque identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn chat_message_uses_camel_case_json() {
        let msg = ChatMessage::user("my app is down");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "my app is down");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn chat_message_parses_browser_timestamps() {
        let json = r#"{
            "id": "m-1",
            "role": "assistant",
            "content": "Try restarting.",
            "createdAt": "2025-03-01T10:15:00.000Z"
        }"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.role, ChatRole::Assistant);
        assert_eq!(msg.created_at.to_rfc3339(), "2025-03-01T10:15:00+00:00");
    }

    #[test]
    fn ticket_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(TicketStatus::from_str("resolved").unwrap(), TicketStatus::Resolved);
        assert_eq!(TicketStatus::InProgress.to_string(), "in_progress");
        assert!(TicketStatus::from_str("closed").is_err());
        assert!(TicketStatus::from_str("Open").is_err());
    }

    #[test]
    fn new_ticket_starts_open_with_equal_timestamps() {
        let ticket = SupportTicket::new(NewTicket {
            title: "Login broken".into(),
            customer_name: "Ada".into(),
            customer_email: "ada@example.com".into(),
            summary: "Issue:\nLogin broken".into(),
            messages: vec![ChatMessage::user("cannot log in")],
        });
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.created_at, ticket.updated_at);
        assert_eq!(ticket.messages.len(), 1);

        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["customerName"], "Ada");
        assert_eq!(json["status"], "open");
    }

    #[test]
    fn set_status_never_precedes_creation() {
        let mut ticket = SupportTicket::new(NewTicket {
            title: "t".into(),
            customer_name: "c".into(),
            customer_email: "e".into(),
            summary: "s".into(),
            messages: vec![],
        });
        let earlier = ticket.created_at - chrono::Duration::seconds(30);
        ticket.set_status(TicketStatus::Resolved, earlier);
        assert_eq!(ticket.status, TicketStatus::Resolved);
        assert_eq!(ticket.updated_at, ticket.created_at);
    }

    #[test]
    fn stream_event_kinds() {
        assert_eq!(StreamEvent::TextDelta("hi".into()).kind(), "text-delta");
        let other = StreamEvent::Other {
            kind: "response.created".into(),
        };
        assert_eq!(other.kind(), "response.created");
        assert_eq!(other.as_text_delta(), None);
        assert_eq!(StreamEvent::TextDelta(String::new()).as_text_delta(), None);
    }
}
