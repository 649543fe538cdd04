// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text relay from an upstream model stream to a raw byte body.
//!
//! Only non-empty text deltas are forwarded, one chunk per delta and in
//! arrival order. The upstream is pulled only when the body is polled, so a
//! slow client slows the upstream read instead of growing a buffer.

use axum::body::Bytes;
use futures::Stream;
use futures::stream;
use supportdesk_core::{EventSource, StreamEvent, SupportError};
use tracing::{debug, warn};

/// Upstream handle plus progress, owned by the relay stream.
///
/// Dropping it drops the source, which releases the upstream connection.
struct RelayState {
    source: Box<dyn EventSource>,
    bytes_relayed: usize,
    finished: bool,
}

impl Drop for RelayState {
    fn drop(&mut self) {
        if !self.finished {
            debug!(
                bytes_relayed = self.bytes_relayed,
                "client went away before upstream finished, releasing upstream"
            );
        }
    }
}

/// Re-emits the text deltas of `source` as UTF-8 byte chunks.
///
/// The stream ends when the source is exhausted. A source error is yielded
/// once and then the stream ends; chunks already sent stay sent.
pub fn relay(source: Box<dyn EventSource>) -> impl Stream<Item = Result<Bytes, SupportError>> + Send {
    let state = RelayState {
        source,
        bytes_relayed: 0,
        finished: false,
    };

    stream::unfold(Some(state), |state| async move {
        let mut state = state?;
        loop {
            match state.source.try_next().await {
                Ok(Some(StreamEvent::TextDelta(text))) if !text.is_empty() => {
                    state.bytes_relayed += text.len();
                    return Some((Ok(Bytes::from(text)), Some(state)));
                }
                Ok(Some(_)) => continue,
                Ok(None) => {
                    state.finished = true;
                    debug!(bytes_relayed = state.bytes_relayed, "upstream stream finished");
                    return None;
                }
                Err(e) => {
                    state.finished = true;
                    warn!(
                        bytes_relayed = state.bytes_relayed,
                        error = %e,
                        "upstream stream failed mid-relay"
                    );
                    return Some((Err(e), None));
                }
            }
        }
    })
}
