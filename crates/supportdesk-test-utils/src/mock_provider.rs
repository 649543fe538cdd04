// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model provider for deterministic testing.
//!
//! `MockProvider` implements `ModelProvider` with scripted replies popped
//! from FIFO queues, and records what it was asked.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use supportdesk_core::{ChatMessage, EventSource, ModelProvider, StreamEvent, SupportError};
use tokio::sync::Mutex;

use crate::scripted_source::{ScriptedSource, SourceProbe};

type ScriptedStream = Result<Vec<Result<StreamEvent, SupportError>>, SupportError>;

/// A mock provider that replays pre-configured replies.
///
/// With an empty chat queue, `stream_chat` yields an empty stream. With an
/// empty completion queue, `complete` returns `"mock summary"`.
#[derive(Default)]
pub struct MockProvider {
    streams: Mutex<VecDeque<ScriptedStream>>,
    completions: Mutex<VecDeque<Result<String, SupportError>>>,
    chat_calls: AtomicUsize,
    complete_calls: AtomicUsize,
    last_instructions: Mutex<Option<String>>,
    last_messages: Mutex<Option<Vec<ChatMessage>>>,
    last_prompt: Mutex<Option<String>>,
    probes: Mutex<Vec<SourceProbe>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a chat reply made of the given events.
    pub fn with_stream(mut self, events: Vec<Result<StreamEvent, SupportError>>) -> Self {
        self.streams.get_mut().push_back(Ok(events));
        self
    }

    /// Queues a chat reply made of plain text deltas.
    pub fn with_stream_text(self, deltas: &[&str]) -> Self {
        self.with_stream(
            deltas
                .iter()
                .map(|d| Ok(StreamEvent::TextDelta((*d).to_string())))
                .collect(),
        )
    }

    /// Queues a chat call that fails before any event is produced.
    pub fn with_stream_failure(mut self, error: SupportError) -> Self {
        self.streams.get_mut().push_back(Err(error));
        self
    }

    pub fn with_completion(mut self, text: &str) -> Self {
        self.completions.get_mut().push_back(Ok(text.to_string()));
        self
    }

    pub fn with_completion_failure(mut self, error: SupportError) -> Self {
        self.completions.get_mut().push_back(Err(error));
        self
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn complete_calls(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst)
    }

    pub async fn last_instructions(&self) -> Option<String> {
        self.last_instructions.lock().await.clone()
    }

    pub async fn last_messages(&self) -> Option<Vec<ChatMessage>> {
        self.last_messages.lock().await.clone()
    }

    pub async fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().await.clone()
    }

    /// Probes of every source handed out, in call order.
    pub async fn source_probes(&self) -> Vec<SourceProbe> {
        self.probes.lock().await.clone()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    async fn stream_chat(
        &self,
        instructions: &str,
        messages: &[ChatMessage],
    ) -> Result<Box<dyn EventSource>, SupportError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_instructions.lock().await = Some(instructions.to_string());
        *self.last_messages.lock().await = Some(messages.to_vec());

        let events = self
            .streams
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))?;
        let source = ScriptedSource::new(events);
        self.probes.lock().await.push(source.probe());
        Ok(Box::new(source))
    }

    async fn complete(&self, prompt: &str) -> Result<String, SupportError> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().await = Some(prompt.to_string());

        self.completions
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock summary".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_completions_in_order_then_default() {
        let provider = MockProvider::new()
            .with_completion("first")
            .with_completion_failure(SupportError::upstream("down"));

        assert_eq!(provider.complete("p1").await.unwrap(), "first");
        assert!(provider.complete("p2").await.is_err());
        assert_eq!(provider.complete("p3").await.unwrap(), "mock summary");
        assert_eq!(provider.complete_calls(), 3);
        assert_eq!(provider.last_prompt().await.as_deref(), Some("p3"));
    }

    #[tokio::test]
    async fn records_chat_arguments() {
        let provider = MockProvider::new().with_stream_text(&["hi"]);
        let messages = vec![ChatMessage::user("hello")];

        let mut source = provider.stream_chat("be nice", &messages).await.unwrap();
        assert_eq!(
            source.try_next().await.unwrap(),
            Some(StreamEvent::TextDelta("hi".into()))
        );
        assert_eq!(provider.chat_calls(), 1);
        assert_eq!(provider.last_instructions().await.as_deref(), Some("be nice"));
        assert_eq!(provider.last_messages().await, Some(messages));
    }

    #[tokio::test]
    async fn scripted_stream_failure() {
        let provider =
            MockProvider::new().with_stream_failure(SupportError::upstream("Server error 503"));
        let err = provider.stream_chat("x", &[]).await.err().expect("must fail");
        assert_eq!(err.status_code(), 500);
    }
}
