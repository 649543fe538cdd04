// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for Responses API streaming.
//!
//! Converts a reqwest response byte stream into [`StreamEvent`]s using the
//! `eventsource-stream` crate for SSE protocol compliance.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use supportdesk_core::{StreamEvent, SupportError};

use crate::types::{SseEnvelope, SseError, SseTextDelta};

/// Event type carrying generated text.
pub const TEXT_DELTA_EVENT: &str = "response.output_text.delta";

/// Event type the API sends when generation fails mid-stream.
pub const ERROR_EVENT: &str = "error";

/// Boxed stream of parsed events, as handed to `StreamSource`.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, SupportError>> + Send>>;

/// Parses a streaming response into [`StreamEvent`]s.
///
/// Text deltas become [`StreamEvent::TextDelta`], `error` events become
/// [`SupportError::Upstream`], and everything else is passed on as
/// [`StreamEvent::Other`] with its event type.
pub fn parse_event_stream(response: reqwest::Response) -> EventStream {
    let mapped = response
        .bytes_stream()
        .eventsource()
        .filter_map(|result| async move {
            match result {
                Ok(event) => parse_event(&event.event, &event.data),
                Err(e) => Some(Err(SupportError::Upstream {
                    message: format!("SSE stream error: {e}"),
                    source: None,
                })),
            }
        });

    Box::pin(mapped)
}

/// Maps one SSE frame. `None` means the frame carries nothing to report.
pub fn parse_event(name: &str, data: &str) -> Option<Result<StreamEvent, SupportError>> {
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    // The Responses API names every frame, but the type is also in the payload.
    let kind = if name.is_empty() || name == "message" {
        match serde_json::from_str::<SseEnvelope>(data) {
            Ok(envelope) => envelope.type_,
            Err(e) => return Some(Err(parse_failure("event envelope", e))),
        }
    } else {
        name.to_string()
    };

    let parsed = match kind.as_str() {
        TEXT_DELTA_EVENT => serde_json::from_str::<SseTextDelta>(data)
            .map(|payload| StreamEvent::TextDelta(payload.delta))
            .map_err(|e| parse_failure(TEXT_DELTA_EVENT, e)),
        ERROR_EVENT => match serde_json::from_str::<SseError>(data) {
            Ok(payload) => Err(SupportError::upstream(match payload.code {
                Some(code) => format!("OpenAI stream error ({code}): {}", payload.message),
                None => format!("OpenAI stream error: {}", payload.message),
            })),
            Err(e) => Err(parse_failure(ERROR_EVENT, e)),
        },
        _ => Ok(StreamEvent::Other { kind }),
    };
    Some(parsed)
}

fn parse_failure(what: &str, e: serde_json::Error) -> SupportError {
    SupportError::Upstream {
        message: format!("failed to parse {what}: {e}"),
        source: Some(Box::new(e)),
    }
}
