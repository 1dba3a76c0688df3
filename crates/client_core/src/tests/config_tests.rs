use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_use_thirty_day_settings_cookie() {
    let settings = ClientSettings::default();
    assert_eq!(settings.preference_key, "coffee_settings");
    assert_eq!(settings.preference_ttl_days, 30);
    assert_eq!(settings.vote_path, "/astroph-coffee/vote");
    assert_eq!(settings.reserve_path, "/astroph-coffee/reserve");
}

#[test]
fn app_prefixed_env_overrides_legacy_server_url() {
    let mut settings = ClientSettings::default();
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("COFFEE_SERVER_URL", "http://legacy.example"),
            ("APP__SERVER_URL", "http://coffee.example"),
            ("APP__PREFERENCE_TTL_DAYS", "7"),
        ]),
    );
    assert_eq!(settings.server_url, "http://coffee.example");
    assert_eq!(settings.preference_ttl_days, 7);
}

#[test]
fn invalid_ttl_keeps_previous_value() {
    let mut settings = ClientSettings::default();
    apply_env_overrides(
        &mut settings,
        env_from(&[("APP__PREFERENCE_TTL_DAYS", "a month")]),
    );
    assert_eq!(settings.preference_ttl_days, 30);
}

#[test]
fn file_values_are_applied_over_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("coffee_config_test_{suffix}.toml"));
    fs::write(
        &path,
        "server_url = \"http://file.example\"\nreserve_path = \"/reserve\"\n",
    )
    .expect("write config");

    let settings = load_settings_from(&path);
    fs::remove_file(&path).expect("cleanup");

    if env::var("COFFEE_SERVER_URL").is_err() && env::var("APP__SERVER_URL").is_err() {
        assert_eq!(settings.server_url, "http://file.example");
    }
    if env::var("APP__RESERVE_PATH").is_err() {
        assert_eq!(settings.reserve_path, "/reserve");
    }
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let settings = load_settings_from(Path::new("/definitely/not/here/coffee.toml"));
    if env::var("APP__VOTE_PATH").is_err() {
        assert_eq!(settings.vote_path, ClientSettings::default().vote_path);
    }
}

#[test]
fn default_loader_reads_coffee_toml_from_working_dir() {
    assert_eq!(DEFAULT_CONFIG_FILE, "coffee.toml");
    if Path::new(DEFAULT_CONFIG_FILE).exists() || env::var("APP__PREFERENCE_KEY").is_ok() {
        return;
    }
    assert_eq!(load_settings().preference_key, "coffee_settings");
}
