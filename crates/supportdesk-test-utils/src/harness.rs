// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end router tests.
//!
//! `TestHarness` assembles the full router over a [`MockProvider`] (or any
//! other provider) and a JSON ticket file in a temp directory. Requests go
//! through `tower::ServiceExt::oneshot`, so no port is bound.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use supportdesk_core::{ModelProvider, SupportError};
use supportdesk_gateway::{AppState, build_router};
use supportdesk_storage::JsonTicketStore;
use tower::ServiceExt;

use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    mock: MockProvider,
    provider_override: Option<Arc<dyn ModelProvider>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            mock: MockProvider::new(),
            provider_override: None,
        }
    }

    /// Use a pre-scripted mock provider.
    pub fn with_mock(mut self, mock: MockProvider) -> Self {
        self.mock = mock;
        self
    }

    /// Serve with `provider` instead of the mock.
    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider_override = Some(provider);
        self
    }

    pub fn build(self) -> Result<TestHarness, SupportError> {
        let temp_dir = tempfile::TempDir::new().map_err(SupportError::persistence)?;
        let store = Arc::new(JsonTicketStore::new(
            temp_dir.path().join("data").join("tickets.json"),
        ));

        let mock = Arc::new(self.mock);
        let provider: Arc<dyn ModelProvider> = match self.provider_override {
            Some(provider) => provider,
            None => mock.clone() as Arc<dyn ModelProvider>,
        };
        let router = build_router(AppState::new(provider, store.clone()));

        Ok(TestHarness {
            router,
            mock,
            store,
            _temp_dir: temp_dir,
        })
    }
}

/// A router plus handles on its mock provider and ticket store.
pub struct TestHarness {
    router: Router,
    mock: Arc<MockProvider>,
    store: Arc<JsonTicketStore>,
    _temp_dir: tempfile::TempDir,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON; `Value::Null` when it is not JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness over a default [`MockProvider`].
    pub fn new() -> Result<Self, SupportError> {
        Self::builder().build()
    }

    pub fn mock(&self) -> &MockProvider {
        &self.mock
    }

    pub fn store(&self) -> &JsonTicketStore {
        &self.store
    }

    pub fn tickets_path(&self) -> &Path {
        self.store.path()
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Sends a request with an optional JSON body and buffers the response.
    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let body = body.map(|v| v.to_string()).unwrap_or_default();
        self.send_raw(method, uri, body).await
    }

    /// Sends `body` verbatim with a JSON content type.
    pub async fn send_raw(&self, method: Method, uri: &str, body: impl Into<Body>) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into());
        let response = match request {
            Ok(request) => self.router.clone().oneshot(request).await,
            Err(e) => return failed(format!("invalid request: {e}")),
        };
        let response = match response {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        };

        let status = response.status();
        let headers = response.headers().clone();
        match axum::body::to_bytes(response.into_body(), usize::MAX).await {
            Ok(bytes) => TestResponse {
                status,
                headers,
                body: bytes.to_vec(),
            },
            Err(e) => TestResponse {
                status,
                headers,
                body: format!("body error: {e}").into_bytes(),
            },
        }
    }
}

fn failed(message: String) -> TestResponse {
    TestResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        headers: HeaderMap::new(),
        body: message.into_bytes(),
    }
}
