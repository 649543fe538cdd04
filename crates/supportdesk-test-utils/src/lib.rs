// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for supportdesk integration tests.
//!
//! Provides mock collaborators and a router harness for fast, deterministic
//! tests without a model API.
//!
//! # Components
//!
//! - [`MockProvider`] - scripted model provider with call recording
//! - [`ScriptedSource`] - event source that replays a fixed script
//! - [`TestHarness`] - full router over a temp ticket file

pub mod harness;
pub mod mock_provider;
pub mod scripted_source;

pub use harness::{TestHarness, TestHarnessBuilder, TestResponse};
pub use mock_provider::MockProvider;
pub use scripted_source::{ScriptedSource, SourceProbe};
