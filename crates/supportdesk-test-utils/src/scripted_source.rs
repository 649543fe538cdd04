// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event source that replays a fixed script.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use supportdesk_core::{EventSource, StreamEvent, SupportError};

/// Replays scripted events, then reports exhaustion.
///
/// Every `try_next` call is counted, and dropping the source is recorded,
/// both observable through a [`SourceProbe`].
pub struct ScriptedSource {
    events: VecDeque<Result<StreamEvent, SupportError>>,
    probe: SourceProbe,
}

/// Shared view of a [`ScriptedSource`]'s pull count and drop state.
#[derive(Debug, Clone, Default)]
pub struct SourceProbe {
    pulls: Arc<AtomicUsize>,
    dropped: Arc<AtomicBool>,
}

impl SourceProbe {
    /// Number of `try_next` calls so far.
    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    /// Whether the source has been dropped.
    pub fn is_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

impl ScriptedSource {
    pub fn new(events: Vec<Result<StreamEvent, SupportError>>) -> Self {
        Self {
            events: events.into(),
            probe: SourceProbe::default(),
        }
    }

    /// A source yielding one text delta per entry.
    pub fn text(deltas: &[&str]) -> Self {
        Self::new(
            deltas
                .iter()
                .map(|d| Ok(StreamEvent::TextDelta((*d).to_string())))
                .collect(),
        )
    }

    /// Appends an upstream failure after the scripted events.
    pub fn then_fail(mut self, message: &str) -> Self {
        self.events.push_back(Err(SupportError::upstream(message)));
        self
    }

    pub fn probe(&self) -> SourceProbe {
        self.probe.clone()
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn try_next(&mut self) -> Result<Option<StreamEvent>, SupportError> {
        self.probe.pulls.fetch_add(1, Ordering::SeqCst);
        self.events.pop_front().transpose()
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        self.probe.dropped.store(true, Ordering::SeqCst);
    }
}
