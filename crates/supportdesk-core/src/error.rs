// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for supportdesk.

use thiserror::Error;

/// The primary error type used across the supportdesk crates.
///
/// Each variant maps onto one HTTP status via [`SupportError::status_code`].
#[derive(Debug, Error)]
pub enum SupportError {
    /// Missing or invalid request fields.
    #[error("{0}")]
    Validation(String),

    /// A referenced resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Model API or transport failure after retries were exhausted.
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Ticket file I/O or (de)serialization failure.
    #[error("persistence error: {source}")]
    Persistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (missing API key, invalid header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SupportError {
    /// Builds an upstream error without an underlying cause.
    pub fn upstream(message: impl Into<String>) -> Self {
        SupportError::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps any error as a persistence failure.
    pub fn persistence(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        SupportError::Persistence {
            source: Box::new(source),
        }
    }

    /// HTTP status code this error surfaces as.
    pub fn status_code(&self) -> u16 {
        match self {
            SupportError::Validation(_) => 400,
            SupportError::NotFound { .. } => 404,
            SupportError::Upstream { .. }
            | SupportError::Persistence { .. }
            | SupportError::Config(_)
            | SupportError::Internal(_) => 500,
        }
    }
}
