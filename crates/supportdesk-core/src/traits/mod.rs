// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the gateway and its collaborators.
//!
//! All traits use `#[async_trait]` so they can be held as trait objects in
//! shared request state.

pub mod provider;
pub mod source;
pub mod store;

pub use provider::{ModelProvider, UnavailableProvider};
pub use source::{EventSource, StreamSource};
pub use store::TicketStore;
