// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order, later overriding earlier: compiled defaults,
//! `/etc/supportdesk/supportdesk.toml`, `~/.config/supportdesk/supportdesk.toml`,
//! `./supportdesk.toml`, the legacy `OPENAI_API_KEY` / `SUPPORT_CHAT_MODEL` /
//! `SUPPORT_SUMMARY_MODEL` variables, then `SUPPORTDESK_*` variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SupportdeskConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/supportdesk/supportdesk.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "supportdesk.toml";

/// Legacy variables honoured for compatibility with existing deployments.
const LEGACY_ENV_KEYS: [&str; 3] = ["OPENAI_API_KEY", "SUPPORT_CHAT_MODEL", "SUPPORT_SUMMARY_MODEL"];

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<SupportdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SupportdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SupportdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path plus env overrides.
pub fn load_config_from_path(path: &Path) -> Result<SupportdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SupportdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment for the standard hierarchy without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SupportdeskConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// `~/.config/supportdesk/supportdesk.toml`, when a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("supportdesk").join("supportdesk.toml"))
}

/// `SUPPORTDESK_*` variables, mapped with [`map_env_key`].
fn env_provider() -> Env {
    Env::prefixed("SUPPORTDESK_").map(|key| map_env_key(key.as_str()).into())
}

fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&LEGACY_ENV_KEYS)
        .map(|key| map_legacy_env_key(key.as_str()).into())
}

/// Maps a prefix-stripped, lowercased variable name to a dotted config path.
///
/// Section names are matched explicitly rather than splitting on `_`, since
/// keys such as `tickets_path` and `max_retries` contain underscores:
/// `storage_tickets_path` becomes `storage.tickets_path` and
/// `retry_client_chat_max_retries` becomes `retry.client_chat.max_retries`.
pub fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();

    if let Some(rest) = key.strip_prefix("retry_") {
        for budget in ["client_chat", "client_tickets", "chat", "summary"] {
            if let Some(field) = rest.strip_prefix(budget).and_then(|r| r.strip_prefix('_')) {
                return format!("retry.{budget}.{field}");
            }
        }
        return format!("retry.{rest}");
    }

    for section in ["server", "openai", "storage"] {
        if let Some(field) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{field}");
        }
    }

    key
}

fn map_legacy_env_key(key: &str) -> String {
    match key.to_ascii_lowercase().as_str() {
        "openai_api_key" => "openai.api_key".to_string(),
        "support_chat_model" => "openai.chat_model".to_string(),
        "support_summary_model" => "openai.summary_model".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_section_keys() {
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("openai_api_key"), "openai.api_key");
        assert_eq!(map_env_key("openai_chat_model"), "openai.chat_model");
        assert_eq!(map_env_key("storage_tickets_path"), "storage.tickets_path");
    }

    #[test]
    fn maps_retry_budget_keys() {
        assert_eq!(map_env_key("retry_chat_max_retries"), "retry.chat.max_retries");
        assert_eq!(
            map_env_key("retry_client_chat_initial_delay_ms"),
            "retry.client_chat.initial_delay_ms"
        );
        assert_eq!(
            map_env_key("retry_client_tickets_max_retries"),
            "retry.client_tickets.max_retries"
        );
        assert_eq!(
            map_env_key("retry_summary_initial_delay_ms"),
            "retry.summary.initial_delay_ms"
        );
    }

    #[test]
    fn maps_legacy_keys() {
        assert_eq!(map_legacy_env_key("OPENAI_API_KEY"), "openai.api_key");
        assert_eq!(map_legacy_env_key("support_chat_model"), "openai.chat_model");
        assert_eq!(
            map_legacy_env_key("SUPPORT_SUMMARY_MODEL"),
            "openai.summary_model"
        );
    }

    #[test]
    fn string_loader_ignores_environment() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }
}
