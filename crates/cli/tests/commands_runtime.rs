use std::env;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use modebot_cli::commands::{config, doctor, migrate, mode};
use serde_json::Value;

#[test]
fn migrate_creates_storage_with_valid_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let database_path = dir.path().join("data").join("bot.db");

    with_env(&valid_env(&database_path), || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });

    assert!(database_path.exists(), "migrate should create the storage file");
}

#[test]
fn migrate_returns_config_failure_without_token() {
    with_env(&[], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn mode_reads_default_then_persists_new_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let database_path = dir.path().join("bot.db");

    with_env(&valid_env(&database_path), || {
        let shown = parse_payload(&mode::run(None).output);
        assert_eq!(shown["message"], "current mode: standard");

        let set = mode::run(Some("quiet"));
        assert_eq!(set.exit_code, 0);
        assert_eq!(parse_payload(&set.output)["message"], "mode set to quiet");

        let shown = parse_payload(&mode::run(None).output);
        assert_eq!(shown["message"], "current mode: quiet");
    });
}

#[test]
fn mode_rejects_unknown_value_before_touching_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let database_path = dir.path().join("bot.db");

    with_env(&valid_env(&database_path), || {
        let result = mode::run(Some("loud"));
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_mode");
    });

    assert!(!database_path.exists());
}

#[test]
fn doctor_reports_pass_with_guild_scope() {
    let dir = tempfile::tempdir().expect("tempdir");
    let database_path = dir.path().join("bot.db");
    let mut vars = valid_env(&database_path);
    vars.push(("DISCORD_GUILD_ID", "1234".to_owned()));

    with_env(&vars, || {
        let report: Value =
            serde_json::from_str(&doctor::run(true)).expect("doctor output should be JSON");
        assert_eq!(report["overall_status"], "pass");

        let registration = report["checks"]
            .as_array()
            .and_then(|checks| checks.iter().find(|check| check["name"] == "command_registration"))
            .expect("registration check");
        assert!(registration["details"].as_str().unwrap_or_default().contains("guild 1234"));
    });
}

#[test]
fn doctor_skips_dependent_checks_when_config_fails() {
    with_env(&[], || {
        let report: Value =
            serde_json::from_str(&doctor::run(true)).expect("doctor output should be JSON");
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][1]["status"], "skipped");
        assert_eq!(report["checks"][2]["status"], "skipped");
    });
}

#[test]
fn config_attributes_sources_and_redacts_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let database_path = dir.path().join("bot.db");
    let vars = [
        ("MODEBOT_DATABASE_PATH", database_path.display().to_string()),
        ("DISCORD_TOKEN", "MTIz.secret-part.signature".to_owned()),
    ];

    with_env(&vars, || {
        let output = config::run();

        assert!(output.contains("discord.token = MTIz.*** (source: env (DISCORD_TOKEN))"));
        assert!(!output.contains("secret-part"));
        assert!(output.contains("(source: env (MODEBOT_DATABASE_PATH))"));
        assert!(output.contains("discord.guild_id = <unset> (global registration)"));
    });
}

#[test]
fn config_ignores_blank_env_values_when_attributing_sources() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut vars = valid_env(&dir.path().join("bot.db"));
    vars.push(("DISCORD_GUILD_ID", String::new()));
    vars.push(("MODEBOT_LOGGING_LEVEL", "   ".to_owned()));

    with_env(&vars, || {
        let output = config::run();

        assert!(output
            .contains("discord.guild_id = <unset> (global registration) (source: default)"));
        assert!(!output.contains("env (DISCORD_GUILD_ID)"));
        assert!(!output.contains("env (MODEBOT_LOGGING_LEVEL)"));
    });
}

fn valid_env(database_path: &Path) -> Vec<(&'static str, String)> {
    vec![
        ("MODEBOT_DATABASE_PATH", database_path.display().to_string()),
        ("MODEBOT_DISCORD_TOKEN", "test-token".to_owned()),
    ]
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, String)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "MODEBOT_DATABASE_PATH",
        "BOT_DB_PATH",
        "MODEBOT_DATABASE_MAX_CONNECTIONS",
        "MODEBOT_DATABASE_TIMEOUT_SECS",
        "MODEBOT_DISCORD_TOKEN",
        "DISCORD_TOKEN",
        "MODEBOT_DISCORD_GUILD_ID",
        "DISCORD_GUILD_ID",
        "MODEBOT_LOGGING_LEVEL",
        "MODEBOT_LOGGING_FORMAT",
        "MODEBOT_LOG_LEVEL",
        "MODEBOT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
