// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration loading.

use remindo_config::diagnostic::ConfigError;
use remindo_config::loader::load_config_from_str_with_env;
use remindo_config::{load_and_validate_str, load_config_from_path, load_config_from_str};
use serial_test::serial;

const FULL: &str = r#"
[bot]
log_level = "debug"

[telegram]
bot_token = "123:ABC"

[backend]
host = "http://backend:8000/"
login = "bot"
password = "secret"
timeout_secs = 5

[reminders]
enabled = false
poll_interval_secs = 15
"#;

#[test]
fn full_toml_deserializes() {
    let config = load_config_from_str(FULL).expect("valid TOML should deserialize");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.backend.host.as_deref(), Some("http://backend:8000/"));
    assert_eq!(config.backend.timeout_secs, 5);
    assert!(!config.reminders.enabled);
    assert_eq!(config.reminders.poll_interval_secs, 15);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty config is valid TOML");
    assert_eq!(config.bot.log_level, "info");
    assert_eq!(config.backend.timeout_secs, 30);
    assert!(config.reminders.enabled);
    assert_eq!(config.reminders.poll_interval_secs, 60);
    assert!(config.telegram.bot_token.is_none());
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = r#"
[backend]
hots = "http://x"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown key must fail");
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "hots");
            assert_eq!(suggestion.as_deref(), Some("host"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[reminders]
poll_interval_secs = "often"
"#;
    let errors = load_and_validate_str(toml).expect_err("wrong type must fail");
    assert!(matches!(&errors[0], ConfigError::InvalidType { .. }));
}

#[test]
fn missing_credentials_are_fatal() {
    let errors = load_and_validate_str("[bot]\nlog_level = \"warn\"\n").unwrap_err();
    assert_eq!(
        errors
            .iter()
            .filter(|e| matches!(e, ConfigError::MissingKey { .. }))
            .count(),
        4
    );
}

#[test]
fn full_toml_validates() {
    assert!(load_and_validate_str(FULL).is_ok());
}

#[test]
#[serial]
fn legacy_variables_fill_required_values() {
    // SAFETY: test is serialized, no other thread reads the environment.
    unsafe {
        std::env::set_var("BOT_TOKEN", "999:XYZ");
        std::env::set_var("BACKEND_HOST", "https://legacy.example");
        std::env::set_var("BACKEND_USER_LOGIN", "legacy");
        std::env::set_var("BACKEND_USER_PASSWORD", "pw");
    }

    let config = load_config_from_str_with_env("").expect("env-only config");

    unsafe {
        std::env::remove_var("BOT_TOKEN");
        std::env::remove_var("BACKEND_HOST");
        std::env::remove_var("BACKEND_USER_LOGIN");
        std::env::remove_var("BACKEND_USER_PASSWORD");
    }

    assert_eq!(config.telegram.bot_token.as_deref(), Some("999:XYZ"));
    assert_eq!(config.backend.host.as_deref(), Some("https://legacy.example"));
    assert_eq!(config.backend.login.as_deref(), Some("legacy"));
    assert_eq!(config.backend.password.as_deref(), Some("pw"));
}

#[test]
#[serial]
fn prefixed_variables_keep_underscored_keys() {
    unsafe {
        std::env::set_var("REMINDO_TELEGRAM_BOT_TOKEN", "1:prefixed");
        std::env::set_var("REMINDO_REMINDERS_POLL_INTERVAL_SECS", "5");
    }

    let config = load_config_from_str_with_env("").expect("prefixed env config");

    unsafe {
        std::env::remove_var("REMINDO_TELEGRAM_BOT_TOKEN");
        std::env::remove_var("REMINDO_REMINDERS_POLL_INTERVAL_SECS");
    }

    assert_eq!(config.telegram.bot_token.as_deref(), Some("1:prefixed"));
    assert_eq!(config.reminders.poll_interval_secs, 5);
}

#[test]
#[serial]
fn legacy_variables_override_prefixed_ones() {
    unsafe {
        std::env::set_var("REMINDO_TELEGRAM_BOT_TOKEN", "1:prefixed");
        std::env::set_var("BOT_TOKEN", "2:legacy");
    }

    let config = load_config_from_str_with_env("").expect("env config");

    unsafe {
        std::env::remove_var("REMINDO_TELEGRAM_BOT_TOKEN");
        std::env::remove_var("BOT_TOKEN");
    }

    assert_eq!(config.telegram.bot_token.as_deref(), Some("2:legacy"));
}

#[test]
#[serial]
fn file_values_are_layered_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("remindo.toml");
    std::fs::write(&path, "[reminders]\npoll_interval_secs = 5\n").unwrap();

    let config = load_config_from_path(&path).expect("file should load");
    assert_eq!(config.reminders.poll_interval_secs, 5);
    assert!(config.reminders.enabled);
    assert_eq!(config.backend.timeout_secs, 30);
}

#[test]
#[serial]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.reminders.poll_interval_secs, 60);
}
