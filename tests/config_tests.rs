use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use jaimes::config::{ConfigError, JaimesConfig, DEFAULT_CATALOG_PATH};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = JaimesConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, JaimesConfig::default());
    assert_eq!(config.catalog_path, Some(PathBuf::from(DEFAULT_CATALOG_PATH)));
    assert!(config.session_dir.is_none());
    assert!(config.llm_url.is_none());
    assert_eq!(config.llm_timeout(), Duration::from_millis(2000));
    assert_eq!(config.policy.max_turns, 5);
}

#[test]
fn test_overrides() {
    let config = JaimesConfig::from_lookup(lookup(&[
        ("JAIMES_CATALOG_PATH", "/tmp/sheet.json"),
        ("JAIMES_SESSION_DIR", "/tmp/sessions"),
        ("JAIMES_LLM_URL", "http://localhost:8080/"),
        ("JAIMES_LLM_TIMEOUT_MS", "750"),
        ("JAIMES_MAX_TURNS", "3"),
    ]))
    .unwrap();

    assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/sheet.json")));
    assert_eq!(config.session_dir, Some(PathBuf::from("/tmp/sessions")));
    assert_eq!(config.llm_url.as_deref(), Some("http://localhost:8080"));
    assert_eq!(config.llm_timeout_ms, 750);
    assert_eq!(config.policy.max_turns, 3);
}

#[test]
fn test_empty_values_are_ignored() {
    let config = JaimesConfig::from_lookup(lookup(&[("JAIMES_LLM_URL", "  "), ("JAIMES_MAX_TURNS", "")])).unwrap();
    assert!(config.llm_url.is_none());
    assert_eq!(config.policy.max_turns, 5);
}

#[test]
fn test_invalid_numbers() {
    let err = JaimesConfig::from_lookup(lookup(&[("JAIMES_LLM_TIMEOUT_MS", "soon")])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidValue { key: "JAIMES_LLM_TIMEOUT_MS".to_string(), value: "soon".to_string() }
    );

    let err = JaimesConfig::from_lookup(lookup(&[("JAIMES_MAX_TURNS", "0")])).unwrap_err();
    assert!(err.to_string().contains("JAIMES_MAX_TURNS"));
}

#[test]
fn test_policy_from_partial_json() {
    let config: JaimesConfig = serde_json::from_str(r#"{"policy": {"max_turns": 7}}"#).unwrap();
    assert_eq!(config.policy.max_turns, 7);
    assert_eq!(config.policy.fast_path_min_turns, 2);
    assert_eq!(config.llm_timeout_ms, 2000);
}
