// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket persistence for supportdesk.
//!
//! All tickets live in one pretty-printed JSON array. Every mutation reads
//! the whole document and writes it back; writers inside one process are
//! serialized, writers in different processes are not.

pub mod json_store;

pub use json_store::JsonTicketStore;
