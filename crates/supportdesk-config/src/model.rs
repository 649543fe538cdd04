// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! Every struct uses `#[serde(deny_unknown_fields)]` so typos fail at
//! startup instead of being silently ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use supportdesk_resilience::RetryConfig;

/// Top-level supportdesk configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SupportdeskConfig {
    /// HTTP listener and logging.
    #[serde(default)]
    pub server: ServerConfig,

    /// Hosted model API.
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Ticket persistence.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Retry budgets per call site.
    #[serde(default)]
    pub retry: RetrySettings,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind. Zero picks a free port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Base URL clients use to reach this server.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OpenAI Responses API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAIConfig {
    /// API key. `None` leaves the AI routes unavailable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL, without the `/responses` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for streamed chat replies.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used for ticket summaries. Falls back to `chat_model`.
    #[serde(default)]
    pub summary_model: Option<String>,

    /// Whole-request timeout in seconds, streaming included.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            summary_model: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl OpenAIConfig {
    /// Model for summaries, after falling back to the chat model.
    pub fn summary_model(&self) -> &str {
        self.summary_model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(&self.chat_model)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("summary_model", &self.summary_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Ticket storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the JSON document holding all tickets.
    #[serde(default = "default_tickets_path")]
    pub tickets_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tickets_path: default_tickets_path(),
        }
    }
}

fn default_tickets_path() -> String {
    "data/tickets.json".to_string()
}

/// Retry budgets for each outbound call site.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySettings {
    /// Server: opening a streamed chat reply.
    #[serde(default = "default_chat_budget")]
    pub chat: RetryBudget,

    /// Server: ticket summary completion.
    #[serde(default = "default_summary_budget")]
    pub summary: RetryBudget,

    /// Client: chat requests to the server.
    #[serde(default = "default_chat_budget")]
    pub client_chat: RetryBudget,

    /// Client: ticket list, create, and status requests.
    #[serde(default = "default_summary_budget")]
    pub client_tickets: RetryBudget,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            chat: default_chat_budget(),
            summary: default_summary_budget(),
            client_chat: default_chat_budget(),
            client_tickets: default_summary_budget(),
        }
    }
}

fn default_chat_budget() -> RetryBudget {
    RetryBudget {
        max_retries: 2,
        initial_delay_ms: 400,
    }
}

fn default_summary_budget() -> RetryBudget {
    RetryBudget {
        max_retries: 2,
        initial_delay_ms: 350,
    }
}

/// One retry budget as written in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryBudget {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

impl RetryBudget {
    pub fn to_retry_config(self) -> RetryConfig {
        RetryConfig::new(self.max_retries, Duration::from_millis(self.initial_delay_ms))
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_delay_ms() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_call_site_budgets() {
        let config = SupportdeskConfig::default();
        assert_eq!(config.retry.chat.initial_delay_ms, 400);
        assert_eq!(config.retry.summary.initial_delay_ms, 350);
        assert_eq!(config.retry.client_chat.max_retries, 2);
        assert_eq!(config.retry.client_tickets.initial_delay_ms, 350);
        assert_eq!(config.openai.chat_model, "gpt-4.1-mini");
        assert_eq!(config.storage.tickets_path, "data/tickets.json");
    }

    #[test]
    fn summary_model_falls_back_to_chat_model() {
        let mut openai = OpenAIConfig::default();
        assert_eq!(openai.summary_model(), "gpt-4.1-mini");
        openai.summary_model = Some("  ".into());
        assert_eq!(openai.summary_model(), "gpt-4.1-mini");
        openai.summary_model = Some("gpt-4.1".into());
        assert_eq!(openai.summary_model(), "gpt-4.1");
    }

    #[test]
    fn retry_budget_converts() {
        let budget = RetryBudget {
            max_retries: 3,
            initial_delay_ms: 250,
        };
        let config = budget.to_retry_config();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_delay, Duration::from_millis(250));
    }

    #[test]
    fn partial_retry_section_keeps_other_defaults() {
        let toml_str = r#"
[retry.chat]
max_retries = 5
"#;
        let config: SupportdeskConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.retry.chat.max_retries, 5);
        assert_eq!(config.retry.chat.initial_delay_ms, 300);
        assert_eq!(config.retry.summary.initial_delay_ms, 350);
    }

    #[test]
    fn debug_redacts_api_key() {
        let openai = OpenAIConfig {
            api_key: Some("sk-secret".into()),
            ..OpenAIConfig::default()
        };
        let debug = format!("{openai:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
