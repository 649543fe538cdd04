// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model provider trait for hosted chat-completion APIs.

use async_trait::async_trait;

use crate::error::SupportError;
use crate::traits::source::EventSource;
use crate::types::ChatMessage;

/// A hosted language model that can stream chat replies and produce
/// one-shot completions.
///
/// Implementations own their retry policy; callers see either a ready
/// stream or the final error.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Starts a streamed assistant reply to `messages`.
    async fn stream_chat(
        &self,
        instructions: &str,
        messages: &[ChatMessage],
    ) -> Result<Box<dyn EventSource>, SupportError>;

    /// Runs a single non-streamed completion and returns its text.
    async fn complete(&self, prompt: &str) -> Result<String, SupportError>;
}

/// Provider used when no model API is configured.
///
/// Every call fails with [`SupportError::Config`] without touching the
/// network.
#[derive(Debug, Clone)]
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ModelProvider for UnavailableProvider {
    async fn stream_chat(
        &self,
        _instructions: &str,
        _messages: &[ChatMessage],
    ) -> Result<Box<dyn EventSource>, SupportError> {
        Err(SupportError::Config(self.reason.clone()))
    }

    async fn complete(&self, _prompt: &str) -> Result<String, SupportError> {
        Err(SupportError::Config(self.reason.clone()))
    }
}
