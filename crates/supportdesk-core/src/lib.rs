// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for supportdesk.
//!
//! Provides the error taxonomy, the chat and ticket domain types, and the
//! traits the gateway uses to reach the model API and the ticket store.

pub mod error;
pub mod traits;
pub mod types;

pub use error::SupportError;
pub use traits::{EventSource, ModelProvider, StreamSource, TicketStore, UnavailableProvider};
pub use types::{ChatMessage, ChatRole, NewTicket, StreamEvent, SupportTicket, TicketStatus};
