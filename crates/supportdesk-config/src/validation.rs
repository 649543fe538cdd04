// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation.
//!
//! Collects every problem instead of stopping at the first one.

use crate::diagnostic::ConfigError;
use crate::model::{RetryBudget, SupportdeskConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Upper bound on retries per call site; backoff doubles each time.
const MAX_RETRIES_LIMIT: u32 = 10;

/// Upper bound on the first backoff delay.
const MAX_INITIAL_DELAY_MS: u64 = 60_000;

/// Validate semantic constraints serde cannot express.
pub fn validate_config(config: &SupportdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if !LOG_LEVELS.contains(&config.server.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "server.log_level `{}` must be one of: {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let base_url = config.openai.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "openai.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.openai.chat_model.trim().is_empty() {
        fail("openai.chat_model must not be empty".to_string());
    }

    if config.openai.request_timeout_secs == 0 {
        fail("openai.request_timeout_secs must be greater than zero".to_string());
    }

    if config.storage.tickets_path.trim().is_empty() {
        fail("storage.tickets_path must not be empty".to_string());
    }

    let budgets: [(&str, &RetryBudget); 4] = [
        ("chat", &config.retry.chat),
        ("summary", &config.retry.summary),
        ("client_chat", &config.retry.client_chat),
        ("client_tickets", &config.retry.client_tickets),
    ];
    for (name, budget) in budgets {
        if budget.max_retries > MAX_RETRIES_LIMIT {
            fail(format!(
                "retry.{name}.max_retries must be at most {MAX_RETRIES_LIMIT}, got {}",
                budget.max_retries
            ));
        }
        if budget.initial_delay_ms > MAX_INITIAL_DELAY_MS {
            fail(format!(
                "retry.{name}.initial_delay_ms must be at most {MAX_INITIAL_DELAY_MS}, got {}",
                budget.initial_delay_ms
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
