// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI Responses API request/response types and SSE payloads.

use serde::{Deserialize, Serialize};
use supportdesk_core::ChatMessage;

// --- Request types ---

/// A request to `POST /responses`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseRequest {
    /// Model identifier (e.g., "gpt-4.1-mini").
    pub model: String,

    /// System-level instructions (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Conversation messages or a single prompt string.
    pub input: ResponseInput,

    /// Whether to stream the response as SSE.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

impl ResponseRequest {
    /// Streamed reply to a conversation.
    pub fn chat(model: &str, instructions: &str, messages: &[ChatMessage]) -> Self {
        Self {
            model: model.to_string(),
            instructions: Some(instructions.to_string()),
            input: ResponseInput::Messages(messages.iter().map(InputMessage::from).collect()),
            stream: true,
        }
    }

    /// Single non-streamed completion of `prompt`.
    pub fn prompt(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            instructions: None,
            input: ResponseInput::Text(prompt.to_string()),
            stream: false,
        }
    }
}

/// Request input -- either a plain string or role-tagged messages.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseInput {
    Text(String),
    Messages(Vec<InputMessage>),
}

/// A single message in the request input. Only role and content are sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for InputMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.to_string(),
            content: message.content.clone(),
        }
    }
}

// --- Response types ---

/// A non-streamed response object.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseObject {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ResponseObject {
    /// Concatenation of every `output_text` part across all output items.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                OutputItem::Other => None,
            })
            .flatten()
            .filter_map(|part| match part {
                OutputContent::OutputText { text } => Some(text.as_str()),
                OutputContent::Other => None,
            })
            .collect()
    }
}

/// One entry of `output`. Reasoning and tool items are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    #[serde(other)]
    Other,
}

/// One content part of an output message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

// --- SSE payloads ---

/// Envelope used to read the `type` field when the SSE event name is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct SseEnvelope {
    #[serde(rename = "type")]
    pub type_: String,
}

/// Payload of `response.output_text.delta`.
#[derive(Debug, Clone, Deserialize)]
pub struct SseTextDelta {
    #[serde(default)]
    pub delta: String,
}

/// Payload of an `error` event.
#[derive(Debug, Clone, Deserialize)]
pub struct SseError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

// --- Error types ---

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
}
