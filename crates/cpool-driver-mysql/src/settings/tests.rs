//! Tests for MySQL settings and key validation

use super::*;
use std::collections::HashMap;

fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_settings_defaults_when_unset() {
    let settings = MySqlSettings::from_lookup(lookup_from(&[])).expect("settings");
    assert_eq!(settings, MySqlSettings::default());
    assert_eq!(settings.host, "localhost");
    assert_eq!(settings.port, 3306);
    assert_eq!(settings.username, "user");
    assert_eq!(settings.password, "password");
}

#[test]
fn test_settings_from_variables() {
    let settings = MySqlSettings::from_lookup(lookup_from(&[
        ("MYSQL_HOST", "db.internal"),
        ("MYSQL_PORT", " 3307 "),
        ("MYSQL_USERNAME", "app"),
        ("MYSQL_PASSWORD", "s3cret"),
    ]))
    .expect("settings");

    assert_eq!(settings.host, "db.internal");
    assert_eq!(settings.port, 3307);
    assert_eq!(settings.username, "app");
    assert_eq!(settings.password, "s3cret");
}

#[test]
fn test_settings_invalid_port() {
    let err = MySqlSettings::from_lookup(lookup_from(&[("MYSQL_PORT", "mysql")])).unwrap_err();
    assert!(matches!(err, CpoolError::Configuration(_)));
    assert!(err.to_string().contains("MYSQL_PORT"));
}

#[test]
fn test_settings_deserialize_with_defaults() {
    let settings: MySqlSettings =
        serde_json::from_str(r#"{"host": "10.0.0.5", "password": "pw"}"#).expect("deserialize");
    assert_eq!(settings.host, "10.0.0.5");
    assert_eq!(settings.port, 3306);
    assert_eq!(settings.username, "user");
    assert_eq!(settings.password, "pw");
}

#[test]
fn test_redacted_dsn_masks_password() {
    let settings = MySqlSettings {
        host: "db.internal".into(),
        port: 3307,
        username: "app".into(),
        password: "s3cret".into(),
    };

    assert_eq!(
        settings.redacted_dsn("orders"),
        "app:***@tcp(db.internal:3307)/orders?parseTime=true&tls=skip-verify"
    );
    assert!(!settings.redacted_dsn("orders").contains("s3cret"));
}

#[test]
fn test_debug_hides_password() {
    let settings = MySqlSettings {
        password: "hunter2".into(),
        ..MySqlSettings::default()
    };
    let debug = format!("{:?}", settings);
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("***"));
}

#[test]
fn test_valid_database_names() {
    let longest = "a".repeat(64);
    for name in ["mysql", "orders_2024", "tenant-42", "dbé", longest.as_str()] {
        assert!(validate_database_name(name).is_ok(), "{name} should be valid");
    }
}

#[test]
fn test_invalid_database_names() {
    let too_long = "a".repeat(65);
    for name in ["", "a/b", "a\\b", "a.b", "trailing ", "nul\0", too_long.as_str()] {
        let err = validate_database_name(name).unwrap_err();
        assert!(
            matches!(err, CpoolError::Connection(_)),
            "{name:?} should be rejected as a connection error"
        );
    }
}
