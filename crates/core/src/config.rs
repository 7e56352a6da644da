use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DATABASE_PATH: &str = "data/bot.db";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub discord: DiscordConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct DiscordConfig {
    pub token: SecretString,
    pub guild_id: Option<u64>,
}

impl DiscordConfig {
    pub fn registration_scope(&self) -> RegistrationScope {
        match self.guild_id {
            Some(guild_id) => RegistrationScope::Guild(guild_id),
            None => RegistrationScope::Global,
        }
    }
}

/// Where the slash command group is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationScope {
    Guild(u64),
    Global,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub discord_token: Option<String>,
    pub discord_guild_id: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("required credential `{key}` is missing (set {hint})")]
    MissingCredential { key: &'static str, hint: &'static str },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: PathBuf::from(DEFAULT_DATABASE_PATH),
                max_connections: 5,
                timeout_secs: 30,
            },
            discord: DiscordConfig { token: String::new().into(), guild_id: None },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("modebot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(path) = database.path {
                self.database.path = path;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(discord) = patch.discord {
            if let Some(token) = discord.token {
                self.discord.token = secret_value(token);
            }
            if let Some(guild_id) = discord.guild_id {
                self.discord.guild_id = Some(guild_id);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("MODEBOT_DATABASE_PATH").or_else(|| read_env("BOT_DB_PATH")) {
            self.database.path = PathBuf::from(value);
        }
        if let Some(value) = read_env("MODEBOT_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("MODEBOT_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("MODEBOT_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("MODEBOT_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("MODEBOT_DISCORD_TOKEN").or_else(|| read_env("DISCORD_TOKEN"))
        {
            self.discord.token = secret_value(value);
        }
        if let Some((key, value)) = read_env_with_key(&["MODEBOT_DISCORD_GUILD_ID", "DISCORD_GUILD_ID"])
        {
            self.discord.guild_id = Some(parse_u64(key, &value)?);
        }

        let log_level =
            read_env("MODEBOT_LOGGING_LEVEL").or_else(|| read_env("MODEBOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("MODEBOT_LOGGING_FORMAT").or_else(|| read_env("MODEBOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_path) = overrides.database_path {
            self.database.path = database_path;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(discord_token) = overrides.discord_token {
            self.discord.token = secret_value(discord_token);
        }
        if let Some(guild_id) = overrides.discord_guild_id {
            self.discord.guild_id = Some(guild_id);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_discord(&self.discord)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("modebot.toml"), PathBuf::from("config/modebot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    if database.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("database.path must not be empty".to_string()));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_discord(discord: &DiscordConfig) -> Result<(), ConfigError> {
    let token = discord.token.expose_secret();
    if token.trim().is_empty() {
        return Err(ConfigError::MissingCredential {
            key: "discord.token",
            hint: "MODEBOT_DISCORD_TOKEN or DISCORD_TOKEN",
        });
    }
    if token.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(
            "discord.token must not contain whitespace (hint: drop any `Bot ` prefix)"
                .to_string(),
        ));
    }

    if discord.guild_id == Some(0) {
        return Err(ConfigError::Validation(
            "discord.guild_id must be a non-zero snowflake".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn read_env_with_key<'a>(keys: &[&'a str]) -> Option<(&'a str, String)> {
    keys.iter().find_map(|key| read_env(key).map(|value| (*key, value)))
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    discord: Option<DiscordPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    path: Option<PathBuf>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DiscordPatch {
    token: Option<String>,
    guild_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
