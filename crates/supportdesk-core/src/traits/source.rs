// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pull-based interface over an upstream model event stream.

use async_trait::async_trait;
use futures::{Stream, StreamExt};

use crate::error::SupportError;
use crate::types::StreamEvent;

/// A lazy, non-restartable sequence of [`StreamEvent`]s.
///
/// The consumer decides when to pull. Dropping the source releases the
/// underlying upstream connection.
#[async_trait]
pub trait EventSource: Send {
    /// Draws the next event. `Ok(None)` means the source is exhausted.
    async fn try_next(&mut self) -> Result<Option<StreamEvent>, SupportError>;
}

/// Adapts a [`Stream`] of fallible events into an [`EventSource`].
pub struct StreamSource<S> {
    inner: S,
}

impl<S> StreamSource<S>
where
    S: Stream<Item = Result<StreamEvent, SupportError>> + Send + Unpin,
{
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S> EventSource for StreamSource<S>
where
    S: Stream<Item = Result<StreamEvent, SupportError>> + Send + Unpin,
{
    async fn try_next(&mut self) -> Result<Option<StreamEvent>, SupportError> {
        self.inner.next().await.transpose()
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    #[tokio::test]
    async fn stream_source_yields_in_order_then_none() {
        let events = vec![
            Ok(StreamEvent::TextDelta("a".into())),
            Ok(StreamEvent::Other {
                kind: "response.completed".into(),
            }),
        ];
        let mut source = StreamSource::new(stream::iter(events));

        assert_eq!(
            source.try_next().await.unwrap(),
            Some(StreamEvent::TextDelta("a".into()))
        );
        assert_eq!(source.try_next().await.unwrap().unwrap().kind(), "response.completed");
        assert!(source.try_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stream_source_surfaces_errors() {
        let events = vec![Err(SupportError::upstream("connection reset"))];
        let mut source = StreamSource::new(stream::iter(events));
        let err = source.try_next().await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
