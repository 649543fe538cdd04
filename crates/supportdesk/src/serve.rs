// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `supportdesk serve` command implementation.
//!
//! Wires the OpenAI provider and the JSON ticket store into the gateway and
//! serves until SIGINT or SIGTERM.

use std::sync::Arc;

use supportdesk_config::SupportdeskConfig;
use supportdesk_core::{ModelProvider, SupportError, UnavailableProvider};
use supportdesk_gateway::{AppState, start_server};
use supportdesk_openai::OpenAIProvider;
use supportdesk_storage::JsonTicketStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the HTTP service.
///
/// A missing API key does not stop startup: chat requests then fail with a
/// server error and ticket summaries use the local fallback.
pub async fn run_serve(config: SupportdeskConfig) -> Result<(), SupportError> {
    init_tracing(&config.server.log_level);

    let shutdown = shutdown::install_signal_handler();
    let provider = build_provider(&config, shutdown.clone());
    let store = Arc::new(JsonTicketStore::from_config(&config.storage));
    info!(
        tickets_path = %store.path().display(),
        "ticket store ready"
    );

    start_server(&config.server, AppState::new(provider, store), shutdown).await
}

fn build_provider(config: &SupportdeskConfig, shutdown: CancellationToken) -> Arc<dyn ModelProvider> {
    match OpenAIProvider::new(&config.openai, &config.retry) {
        Ok(provider) => Arc::new(provider.with_cancellation(shutdown)),
        Err(e) => {
            warn!(error = %e, "OpenAI provider unavailable, chat requests will fail");
            Arc::new(UnavailableProvider::new(e.to_string()))
        }
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over `log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "supportdesk={log_level},tower_http={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
