use super::*;
use std::time::UNIX_EPOCH;

fn temp_log_dir(prefix: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!(
        "shellboot-logs-{prefix}-{}-{now}",
        std::process::id()
    ))
}

#[test]
fn resolve_log_level_should_accept_known_levels() {
    assert_eq!(resolve_log_level_from(Some(" WARN ".to_string())), "warn");
    assert_eq!(resolve_log_level_from(Some("trace".to_string())), "trace");
}

#[test]
fn resolve_log_level_should_fall_back_by_build_mode() {
    let expected = if cfg!(debug_assertions) { "debug" } else { "info" };
    assert_eq!(resolve_log_level_from(Some("verbose".to_string())), expected);
    assert_eq!(resolve_log_level_from(None), expected);
}

#[test]
fn cleanup_should_ignore_missing_dir() {
    let dir = temp_log_dir("missing");
    let removed = cleanup_expired_logs(&dir, "shellboot", 7).expect("cleanup missing dir");
    assert_eq!(removed, 0);
}

#[test]
fn cleanup_should_remove_only_expired_log_files() {
    let dir = temp_log_dir("expire");
    fs::create_dir_all(&dir).expect("create log dir");
    fs::write(dir.join("shellboot.2026-01-01.log"), "{}").expect("write log");
    fs::write(dir.join("notes.txt"), "keep").expect("write other file");
    fs::write(dir.join("changelog"), "keep").expect("write changelog");
    fs::write(dir.join("catalog"), "keep").expect("write catalog");
    fs::write(dir.join("other.2026-01-01.log"), "keep").expect("write foreign log");

    let later = SystemTime::now() + Duration::from_secs(3 * 24 * 60 * 60);
    let removed = cleanup_expired_logs_with_duration(&dir, "shellboot", Duration::from_secs(60), later)
        .expect("cleanup expired");
    assert_eq!(removed, 1);
    assert!(!dir.join("shellboot.2026-01-01.log").exists());
    assert!(dir.join("notes.txt").exists());
    assert!(dir.join("changelog").exists());
    assert!(dir.join("catalog").exists());
    assert!(dir.join("other.2026-01-01.log").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn is_log_file_should_match_appender_names_only() {
    assert!(is_log_file(Path::new("shellboot.2026-01-01.log"), "shellboot"));
    assert!(is_log_file(Path::new("shellboot.log"), "shellboot"));
    assert!(!is_log_file(Path::new("shellbootlog"), "shellboot"));
    assert!(!is_log_file(Path::new("shellboot.changelog"), "shellboot"));
    assert!(!is_log_file(Path::new("changelog"), "shellboot"));
}

#[test]
fn cleanup_should_keep_recent_log_files() {
    let dir = temp_log_dir("recent");
    fs::create_dir_all(&dir).expect("create log dir");
    fs::write(dir.join("shellboot.log"), "{}").expect("write log");

    let removed = cleanup_expired_logs(&dir, "shellboot", 7).expect("cleanup recent");
    assert_eq!(removed, 0);
    assert!(dir.join("shellboot.log").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn options_default_should_be_console_only() {
    let options = LoggingOptions::default();
    assert!(options.log_dir.is_none());
    assert_eq!(options.keep_days, DEFAULT_KEEP_DAYS);
    assert_eq!(options.file_prefix, DEFAULT_FILE_PREFIX);
}
