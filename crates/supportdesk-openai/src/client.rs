// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Responses API.
//!
//! [`OpenAIClient`] handles authentication, request construction and error
//! body decoding. Retries are applied one level up by the provider.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use supportdesk_core::SupportError;

use crate::types::{ApiErrorResponse, ResponseRequest};

/// HTTP client for Responses API communication.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Creates a client that authenticates every request with `api_key`.
    ///
    /// `base_url` is the API root without the `/responses` suffix.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, SupportError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| SupportError::Config(format!("invalid API key header value: {e}")))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SupportError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the responses endpoint.
    pub fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }

    /// Sends one request attempt. Status handling is left to the caller.
    pub async fn send(&self, request: &ResponseRequest) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(self.responses_url())
            .json(request)
            .send()
            .await
    }
}

/// Turns a non-success response into an upstream error, using the API's
/// error message when the body carries one.
pub async fn error_from_response(response: reqwest::Response) -> SupportError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_err) => match api_err.error.type_ {
            Some(kind) => format!("OpenAI API error ({kind}): {}", api_err.error.message),
            None => format!("OpenAI API error: {}", api_err.error.message),
        },
        Err(_) => format!("OpenAI API returned {status}: {body}"),
    };
    SupportError::upstream(message)
}
