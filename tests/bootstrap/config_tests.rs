use super::*;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let values: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| values.get(key).cloned()
}

fn unique_temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("shellboot-{name}-{}-{nanos}.json", std::process::id()))
}

#[test]
fn default_config_should_match_boot_defaults() {
    let config = BootConfig::default();
    assert_eq!(config.frame_interval_ms, 16);
    assert_eq!(config.readiness_timeout_ms, Some(3000));
    assert_eq!(config.fetch_timeout_ms, Some(5000));
    assert_eq!(config.default_locale, "zh-CN");
    assert_eq!(config.fallback_locale, "en-US");
    assert_eq!(config.readiness_policy(), ReadinessPolicy::default());
    assert_eq!(config.fetch_timeout(), Some(Duration::from_millis(5000)));
}

#[test]
fn from_json_str_should_fill_missing_fields_with_defaults() {
    let config = BootConfig::from_json_str(r#"{ "readinessTimeoutMs": null, "defaultLocale": "ja-JP" }"#)
        .expect("config parsed");
    assert_eq!(config.readiness_timeout_ms, None);
    assert_eq!(config.default_locale, "ja-JP");
    assert_eq!(config.frame_interval_ms, 16);
    assert_eq!(config.readiness_policy().timeout, None);
}

#[test]
fn from_json_str_should_reject_invalid_json() {
    let error = BootConfig::from_json_str("{ not json").expect_err("invalid json");
    assert_eq!(error.code, "boot_config_parse_failed");
    assert!(!error.causes.is_empty());
}

#[test]
fn load_should_return_defaults_when_file_missing() {
    let path = unique_temp_path("missing");
    let config = BootConfig::load(&path).expect("defaults");
    assert_eq!(config, BootConfig::default());
}

#[test]
fn load_should_read_file_and_tag_parse_errors_with_path() {
    let path = unique_temp_path("load");
    fs::write(&path, r#"{ "frameIntervalMs": 32 }"#).expect("write config");
    let config = BootConfig::load(&path).expect("config loaded");
    assert_eq!(config.frame_interval_ms, 32);

    fs::write(&path, "[").expect("write broken config");
    let error = BootConfig::load(&path).expect_err("broken config");
    assert_eq!(error.code, "boot_config_parse_failed");
    assert_eq!(
        error.context_value("path"),
        Some(path.display().to_string().as_str())
    );

    let _ = fs::remove_file(&path);
}

#[test]
fn env_overrides_should_allow_unbounded_readiness() {
    for raw in ["0", "none", "OFF"] {
        let config = BootConfig::default()
            .with_env_overrides(lookup_from(&[(READINESS_TIMEOUT_ENV, raw)]));
        assert_eq!(config.readiness_timeout_ms, None, "{raw}");
    }

    let config = BootConfig::default().with_env_overrides(lookup_from(&[
        (READINESS_TIMEOUT_ENV, " 1500 "),
        (FRAME_INTERVAL_ENV, "8"),
        (DEFAULT_LOCALE_ENV, "fr_FR.UTF-8"),
    ]));
    assert_eq!(config.readiness_timeout_ms, Some(1500));
    assert_eq!(config.frame_interval_ms, 8);
    assert_eq!(config.normalized().default_locale, "fr-FR");
}

#[test]
fn env_overrides_should_ignore_garbage_values() {
    let config = BootConfig::default().with_env_overrides(lookup_from(&[
        (READINESS_TIMEOUT_ENV, "soon"),
        (FRAME_INTERVAL_ENV, "-3"),
        (DEFAULT_LOCALE_ENV, "   "),
    ]));
    assert_eq!(config, BootConfig::default());
}

#[test]
fn normalized_should_clamp_intervals_and_repair_locales() {
    let config = BootConfig {
        frame_interval_ms: 0,
        readiness_timeout_ms: Some(10_000_000),
        fetch_timeout_ms: Some(1),
        default_locale: "!!".to_string(),
        fallback_locale: "en".to_string(),
    }
    .normalized();

    assert_eq!(config.frame_interval_ms, 1);
    assert_eq!(config.readiness_timeout_ms, Some(600_000));
    assert_eq!(config.fetch_timeout_ms, Some(100));
    assert_eq!(config.default_locale, "zh-CN");
    assert_eq!(config.fallback_locale, "en-US");
}

#[test]
fn normalized_should_keep_readiness_timeout_at_least_one_frame() {
    let config = BootConfig {
        frame_interval_ms: 50,
        readiness_timeout_ms: Some(10),
        ..BootConfig::default()
    }
    .normalized();
    assert_eq!(config.readiness_timeout_ms, Some(50));
}

#[test]
fn resolve_path_should_prefer_env_value() {
    assert_eq!(
        BootConfig::resolve_path(lookup_from(&[])),
        PathBuf::from("configs/boot.json")
    );
    assert_eq!(
        BootConfig::resolve_path(lookup_from(&[(BOOT_CONFIG_ENV, "/etc/shellboot.json")])),
        PathBuf::from("/etc/shellboot.json")
    );
}

#[test]
fn load_or_default_should_fall_back_on_corrupted_or_unreadable_file() {
    let path = unique_temp_path("corrupted");
    fs::write(&path, "{ not json").expect("write broken config");
    assert_eq!(BootConfig::load_or_default(&path), BootConfig::default());
    let _ = fs::remove_file(&path);

    let dir = unique_temp_path("directory");
    fs::create_dir_all(&dir).expect("create dir");
    assert!(BootConfig::load(&dir).is_err());
    assert_eq!(BootConfig::load_or_default(&dir), BootConfig::default());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn load_or_default_should_keep_valid_file() {
    let path = unique_temp_path("valid");
    fs::write(&path, r#"{ "fetchTimeoutMs": 250 }"#).expect("write config");
    assert_eq!(BootConfig::load_or_default(&path).fetch_timeout_ms, Some(250));
    let _ = fs::remove_file(&path);
}

#[test]
fn zero_readiness_timeout_should_mean_unbounded_from_file_and_env() {
    let from_file = BootConfig::from_json_str(r#"{ "readinessTimeoutMs": 0 }"#)
        .expect("config parsed")
        .normalized();
    let from_env = BootConfig::default()
        .with_env_overrides(lookup_from(&[(READINESS_TIMEOUT_ENV, "0")]))
        .normalized();

    assert_eq!(from_file.readiness_timeout_ms, None);
    assert_eq!(from_env.readiness_timeout_ms, None);
    assert_eq!(from_file.readiness_policy().timeout, None);
}
