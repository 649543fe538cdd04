// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry primitives shared by the server and the API client.
//!
//! [`RetryPolicy`] wraps a fallible async operation in bounded exponential
//! backoff. The same policy runs inside the server (outbound model API
//! calls) and inside the command-line client (calls to the server), so it
//! depends on nothing but a sleep primitive and, for the HTTP
//! specialization, a response status code.
//!
//! The policy never logs; callers decide what a retry means to them.

pub mod http;
pub mod retry;

pub use http::{HttpAttemptError, HttpStatus};
pub use retry::{RetryConfig, RetryError, RetryPolicy};
