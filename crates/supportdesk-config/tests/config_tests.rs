// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the supportdesk configuration system.

use std::io::Write;

use supportdesk_config::diagnostic::ConfigError;
use supportdesk_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"

[openai]
api_key = "sk-test"
base_url = "http://localhost:9999/v1"
chat_model = "gpt-4.1"
summary_model = "gpt-4.1-mini"
request_timeout_secs = 30

[storage]
tickets_path = "/var/lib/supportdesk/tickets.json"

[retry.chat]
max_retries = 3
initial_delay_ms = 500

[retry.client_tickets]
max_retries = 1
initial_delay_ms = 100
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.base_url(), "http://0.0.0.0:8080");
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.openai.summary_model(), "gpt-4.1-mini");
    assert_eq!(config.openai.request_timeout_secs, 30);
    assert_eq!(config.storage.tickets_path, "/var/lib/supportdesk/tickets.json");
    assert_eq!(config.retry.chat.max_retries, 3);
    assert_eq!(config.retry.chat.initial_delay_ms, 500);
    assert_eq!(config.retry.client_tickets.max_retries, 1);
    // Untouched budgets keep their compiled defaults.
    assert_eq!(config.retry.summary.initial_delay_ms, 350);
    assert_eq!(config.retry.client_chat.initial_delay_ms, 400);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.server.port, 3000);
    assert!(config.openai.api_key.is_none());
    assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
}

#[test]
fn partial_budget_merges_with_default_budget() {
    let config = load_config_from_str("[retry.chat]\nmax_retries = 4\n").unwrap();
    assert_eq!(config.retry.chat.max_retries, 4);
    assert_eq!(config.retry.chat.initial_delay_ms, 400);
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = r#"
[storage]
ticket_path = "tickets.json"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown key should be rejected");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), .. }
                if key == "ticket_path" && s == "tickets_path"
        )
    });
    assert!(found, "expected suggestion, got: {errors:?}");
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telegram]\nbot_token = \"x\"\n").unwrap_err();
    assert!(!errors.is_empty());
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n").unwrap_err();
    assert!(
        errors.iter().any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

#[test]
fn validation_errors_surface_from_str_loader() {
    let errors = load_and_validate_str("[openai]\nchat_model = \"\"\n").unwrap_err();
    assert!(errors.iter().any(|e| e.to_string().contains("openai.chat_model")));
}

#[test]
fn explicit_path_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server]\nport = 4100\n").unwrap();
    let config = load_and_validate_path(file.path()).expect("file config is valid");
    assert_eq!(config.server.port, 4100);
}

#[test]
fn missing_explicit_path_is_an_error() {
    let errors =
        load_and_validate_path(std::path::Path::new("/nonexistent/supportdesk.toml")).unwrap_err();
    assert!(errors[0].to_string().contains("does not exist"));
}
