// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompts and ticket summarization.

use supportdesk_core::{ChatMessage, ChatRole, ModelProvider};
use tracing::{debug, warn};

/// Instructions sent with every chat turn.
pub const SUPPORT_SYSTEM_PROMPT: &str = "You are a support assistant for a SaaS product.
Give direct troubleshooting guidance, ask clarifying questions when needed, and keep replies concise and practical.
If you do not know details, be explicit and offer the next best action.";

/// Summary used when the conversation has no user message.
const DEFAULT_ISSUE: &str = "Customer requested support.";

/// One `ROLE: content` line per message, content trimmed.
pub fn build_chat_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|message| {
            format!(
                "{}: {}",
                message.role.to_string().to_uppercase(),
                message.content.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_ticket_summary_prompt(transcript: &str) -> String {
    [
        "Summarize this support conversation into a concise support ticket.",
        "Return plain text with exactly these sections:",
        "Issue:",
        "Customer Impact:",
        "Steps Tried:",
        "Recommended Next Action:",
        "Conversation:",
        transcript,
    ]
    .join("\n\n")
}

/// Deterministic summary built without the model.
///
/// The issue is the content of the last user message, or a stock line when
/// there is none or it is empty.
pub fn local_summary_fallback(messages: &[ChatMessage]) -> String {
    let issue = messages
        .iter()
        .rev()
        .find(|message| message.role == ChatRole::User)
        .map(|message| message.content.as_str())
        .filter(|content| !content.is_empty())
        .unwrap_or(DEFAULT_ISSUE);

    [
        "Issue:",
        issue,
        "",
        "Customer Impact:",
        "Unknown from transcript.",
        "",
        "Steps Tried:",
        "Conversation captured in thread.",
        "",
        "Recommended Next Action:",
        "Agent review and follow-up with customer.",
    ]
    .join("\n")
}

/// Asks the model for a ticket summary. Never fails: an error or a blank
/// reply yields [`local_summary_fallback`].
pub async fn generate_summary(provider: &dyn ModelProvider, messages: &[ChatMessage]) -> String {
    let prompt = build_ticket_summary_prompt(&build_chat_transcript(messages));

    match provider.complete(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            debug!("model returned an empty summary, using local fallback");
            local_summary_fallback(messages)
        }
        Err(e) => {
            warn!(error = %e, "summary generation failed, using local fallback");
            local_summary_fallback(messages)
        }
    }
}
