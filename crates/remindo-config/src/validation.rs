// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization checks.
//!
//! Every problem is collected; validation does not stop at the first one.

use crate::diagnostic::ConfigError;
use crate::model::RemindoConfig;

/// Validates required values and value ranges.
pub fn validate_config(config: &RemindoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let required = [
        ("telegram.bot_token", "BOT_TOKEN", &config.telegram.bot_token),
        ("backend.host", "BACKEND_HOST", &config.backend.host),
        ("backend.login", "BACKEND_USER_LOGIN", &config.backend.login),
        ("backend.password", "BACKEND_USER_PASSWORD", &config.backend.password),
    ];
    for (key, env_var, value) in required {
        if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
            errors.push(ConfigError::MissingKey {
                key: key.to_string(),
                env_var: env_var.to_string(),
            });
        }
    }

    if let Some(host) = config.backend.host.as_deref()
        && !host.trim().is_empty()
        && !(host.starts_with("http://") || host.starts_with("https://"))
    {
        errors.push(ConfigError::Validation {
            message: format!("backend.host `{host}` must be an http:// or https:// URL"),
        });
    }

    if config.backend.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.reminders.poll_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "reminders.poll_interval_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RemindoConfig {
        let mut config = RemindoConfig::default();
        config.telegram.bot_token = Some("123:ABC".into());
        config.backend.host = Some("http://localhost:8000/".into());
        config.backend.login = Some("bot".into());
        config.backend.password = Some("secret".into());
        config
    }

    #[test]
    fn complete_config_passes() {
        assert!(validate_config(&complete()).is_ok());
    }

    #[test]
    fn defaults_report_all_four_required_values() {
        let errors = validate_config(&RemindoConfig::default()).unwrap_err();
        let missing: Vec<_> = errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::MissingKey { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            missing,
            vec!["telegram.bot_token", "backend.host", "backend.login", "backend.password"]
        );
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut config = complete();
        config.backend.password = Some("   ".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], ConfigError::MissingKey { env_var, .. } if env_var == "BACKEND_USER_PASSWORD"));
    }

    #[test]
    fn rejects_non_http_host_and_zero_interval() {
        let mut config = complete();
        config.backend.host = Some("ftp://example.org".into());
        config.reminders.poll_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
    }

    #[test]
    fn toml_with_every_section_validates() {
        let toml_str = r#"
[telegram]
bot_token = "123:ABC"

[backend]
host = "https://backend.example.org/"
login = "bot"
password = "secret"

[reminders]
poll_interval_secs = 30
"#;
        let config: RemindoConfig = toml::from_str(toml_str).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.backend.timeout_secs, 30);
        assert!(config.reminders.enabled);
    }

    #[test]
    fn zero_timeout_from_toml_is_rejected() {
        let toml_str = r#"
[telegram]
bot_token = "123:ABC"

[backend]
host = "http://localhost:8000/"
login = "bot"
password = "secret"
timeout_secs = 0
"#;
        let config: RemindoConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(
            matches!(&errors[0], ConfigError::Validation { message } if message.contains("timeout_secs"))
        );
    }

    #[test]
    fn unknown_reminders_key_fails_to_deserialize() {
        let toml_str = r#"
[reminders]
poll_every = 5
"#;
        assert!(toml::from_str::<RemindoConfig>(toml_str).is_err());
    }
}
