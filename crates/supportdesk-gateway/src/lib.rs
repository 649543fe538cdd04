// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for supportdesk.
//!
//! Serves the streamed support chat, the ticket API, and a health probe on
//! an axum router. Model access and ticket persistence come in through the
//! [`AppState`] trait objects.

pub mod handlers;
pub mod relay;
pub mod server;
pub mod summary;

pub use relay::relay;
pub use server::{AppState, bind, build_router, serve, start_server};
pub use summary::{SUPPORT_SYSTEM_PROMPT, generate_summary, local_summary_fallback};
