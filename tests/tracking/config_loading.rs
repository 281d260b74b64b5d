//! Declarative configuration loading and validation.

use super::test_utils::{new_a, reference_schema};
use trackle::config::TrackingConfig;
use trackle::error::ConfigError;
use trackle::graph::{wrap, TrackedValue};
use trackle::value::Value;

#[test]
fn test_config_loaded_from_file_drives_tracking() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tracking.toml");
    std::fs::write(
        &path,
        r#"
[types.A.properties.Items]

[types.Dog.properties.Name]
"#,
    )
    .unwrap();

    let config = TrackingConfig::load_from_file(&path, &reference_schema()).unwrap();
    let a = wrap(&new_a(), &config);
    a.sequence_mut("Items")
        .unwrap()
        .push(TrackedValue::Plain(Value::text("hola")));
    assert!(a.has_changed("Items"));
}

#[test]
fn test_unknown_property_in_file_fails_before_any_wrap() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tracking.toml");
    std::fs::write(&path, "[types.A.properties.Nope]\n").unwrap();

    let error = TrackingConfig::load_from_file(&path, &reference_schema()).unwrap_err();
    assert!(matches!(
        error,
        ConfigError::UnknownProperty { type_name, property }
            if type_name == "A" && property == "Nope"
    ));
}

#[test]
fn test_missing_file_reports_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let error = TrackingConfig::load_from_file(&path, &reference_schema()).unwrap_err();
    assert!(matches!(error, ConfigError::Io(_)));
}

#[test]
fn test_malformed_toml_reports_parse_error() {
    let error =
        TrackingConfig::from_toml_str("types = \"not a table\"", &reference_schema()).unwrap_err();
    assert!(matches!(error, ConfigError::Parse(_)));
}
