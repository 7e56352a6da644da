use std::env;
use std::fs;
use std::path::PathBuf;

use modebot_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

struct ConfigFile {
    path: PathBuf,
    doc: Value,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let file = detect_config_path().and_then(load_config_file);
    let guild_id = config
        .discord
        .guild_id
        .map(|guild_id| guild_id.to_string())
        .unwrap_or_else(|| "<unset> (global registration)".to_string());

    let fields: [(&str, String, &[&str]); 7] = [
        (
            "database.path",
            config.database.path.display().to_string(),
            &["MODEBOT_DATABASE_PATH", "BOT_DB_PATH"],
        ),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["MODEBOT_DATABASE_MAX_CONNECTIONS"],
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["MODEBOT_DATABASE_TIMEOUT_SECS"],
        ),
        (
            "discord.token",
            redact_token(config.discord.token.expose_secret()),
            &["MODEBOT_DISCORD_TOKEN", "DISCORD_TOKEN"],
        ),
        ("discord.guild_id", guild_id, &["MODEBOT_DISCORD_GUILD_ID", "DISCORD_GUILD_ID"]),
        (
            "logging.level",
            config.logging.level.clone(),
            &["MODEBOT_LOGGING_LEVEL", "MODEBOT_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["MODEBOT_LOGGING_FORMAT", "MODEBOT_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.iter().map(|(key, value, env_keys)| {
        render_line(key, value, field_source(key, env_keys, file.as_ref()))
    }));
    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("modebot.toml"), PathBuf::from("config/modebot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file(path: PathBuf) -> Option<ConfigFile> {
    let raw = fs::read_to_string(&path).ok()?;
    let doc = raw.parse::<Value>().ok()?;
    Some(ConfigFile { path, doc })
}

fn field_source(key_path: &str, env_keys: &[&str], file: Option<&ConfigFile>) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env_value_set(key)) {
        return format!("env ({env_key})");
    }

    match file {
        Some(file) if contains_path(&file.doc, key_path) => {
            format!("file ({})", file.path.display())
        }
        _ => "default".to_string(),
    }
}

fn env_value_set(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    // Only the first segment of a bot token is kept; it encodes the bot's user id.
    if let Some((prefix, _)) = trimmed.split_once('.') {
        return format!("{prefix}.***");
    }

    "<redacted>".to_string()
}
