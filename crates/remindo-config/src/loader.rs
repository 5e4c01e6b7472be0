// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `/etc/remindo/remindo.toml`, `~/.config/remindo/remindo.toml`,
//! `./remindo.toml`, then `REMINDO_*` variables, then the legacy unprefixed
//! deployment variables (`BOT_TOKEN`, `BACKEND_HOST`, `BACKEND_USER_LOGIN`,
//! `BACKEND_USER_PASSWORD`).

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RemindoConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/remindo/remindo.toml";
pub(crate) const LOCAL_CONFIG: &str = "remindo.toml";

pub(crate) fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("remindo/remindo.toml"))
        .unwrap_or_default()
}

/// Load configuration from the file hierarchy with env var overrides.
///
/// A `.env` file in the working directory is loaded into the process
/// environment first, if present.
pub fn load_config() -> Result<RemindoConfig, figment::Error> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env file");
    }
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<RemindoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RemindoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a TOML string with env var overrides applied.
pub fn load_config_from_str_with_env(toml_content: &str) -> Result<RemindoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RemindoConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(env_provider())
        .merge(legacy_env_provider())
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RemindoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RemindoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(legacy_env_provider())
        .extract()
}

/// The full provider stack, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RemindoConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
        .merge(legacy_env_provider())
}

/// Config sections addressable through `REMINDO_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &["bot", "telegram", "backend", "reminders"];

/// `REMINDO_<SECTION>_<KEY>` variables.
///
/// Only the underscore after the section name becomes a dot, so keys that
/// contain underscores stay intact: `REMINDO_TELEGRAM_BOT_TOKEN` becomes
/// `telegram.bot_token`.
fn env_provider() -> Env {
    Env::prefixed("REMINDO_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| format!("{section}.{field}"))
            })
            .unwrap_or(key_str);
        mapped.into()
    })
}

/// The unprefixed variables existing deployments already set.
fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&[
            "BOT_TOKEN",
            "BACKEND_HOST",
            "BACKEND_USER_LOGIN",
            "BACKEND_USER_PASSWORD",
        ])
        .map(|key| {
            let mapped = match key.as_str().to_ascii_lowercase().as_str() {
                "bot_token" => "telegram.bot_token",
                "backend_host" => "backend.host",
                "backend_user_login" => "backend.login",
                "backend_user_password" => "backend.password",
                _ => return key.as_str().to_string().into(),
            };
            mapped.into()
        })
}
