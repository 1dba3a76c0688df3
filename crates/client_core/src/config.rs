use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "coffee.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
    pub vote_path: String,
    pub reserve_path: String,
    pub preferences_database_url: String,
    pub preference_key: String,
    pub preference_ttl_days: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            vote_path: "/astroph-coffee/vote".into(),
            reserve_path: "/astroph-coffee/reserve".into(),
            preferences_database_url: "sqlite://./data/preferences.db".into(),
            preference_key: "coffee_settings".into(),
            preference_ttl_days: 30,
        }
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Defaults, then the flat `key = "value"` table in `path` if readable, then
/// the process environment.
pub fn load_settings_from(path: &Path) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => apply_overrides(&mut settings, |key| file_cfg.get(key).cloned()),
            Err(err) => warn!("config: ignoring unreadable file path={} err={err}", path.display()),
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn apply_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("server_url") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("vote_path") {
        settings.vote_path = v;
    }
    if let Some(v) = lookup("reserve_path") {
        settings.reserve_path = v;
    }
    if let Some(v) = lookup("preferences_database_url") {
        settings.preferences_database_url = v;
    }
    if let Some(v) = lookup("preference_key") {
        settings.preference_key = v;
    }
    if let Some(v) = lookup("preference_ttl_days") {
        match v.parse::<u32>() {
            Ok(parsed) => settings.preference_ttl_days = parsed,
            Err(_) => warn!("config: preference_ttl_days is not a day count value={v}"),
        }
    }
}

pub(crate) fn apply_env_overrides(
    settings: &mut ClientSettings,
    env: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = env("COFFEE_SERVER_URL") {
        settings.server_url = v;
    }
    apply_overrides(settings, |key| env(&format!("APP__{}", key.to_ascii_uppercase())));
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
