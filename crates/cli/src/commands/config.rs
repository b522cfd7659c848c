use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use acme_core::config::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

/// (key path, environment variable, effective value)
type ConfigField = (&'static str, &'static str, String);

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::plain(2, format!("config validation failed: {error}")),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, env_key, value) in effective_fields(&config) {
        let source =
            field_source(key, env_key, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(format!("- {key} = {value} (source: {source})"));
    }

    CommandResult::plain(0, lines.join("\n"))
}

fn effective_fields(config: &AppConfig) -> Vec<ConfigField> {
    vec![
        ("database.url", "ACME_DATABASE_URL", config.database.url.clone()),
        (
            "database.max_connections",
            "ACME_DATABASE_MAX_CONNECTIONS",
            config.database.max_connections.to_string(),
        ),
        (
            "database.timeout_secs",
            "ACME_DATABASE_TIMEOUT_SECS",
            config.database.timeout_secs.to_string(),
        ),
        ("server.bind_address", "ACME_SERVER_BIND_ADDRESS", config.server.bind_address.clone()),
        ("server.port", "ACME_SERVER_PORT", config.server.port.to_string()),
        (
            "server.graceful_shutdown_secs",
            "ACME_SERVER_GRACEFUL_SHUTDOWN_SECS",
            config.server.graceful_shutdown_secs.to_string(),
        ),
        ("logging.level", "ACME_LOGGING_LEVEL", config.logging.level.clone()),
        ("logging.format", "ACME_LOGGING_FORMAT", config.logging.format.as_str().to_string()),
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("acme.toml"), PathBuf::from("config/acme.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
