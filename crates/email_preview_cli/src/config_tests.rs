use super::*;
use std::fs;
use tempfile::TempDir;

fn write_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

#[test]
fn test_app_config_load_full() {
    let (temp_dir, config_path) = write_config(
        r#"
[paths]
components = "components"
engines = "/opt/engines"
emails = "emails"

[data]
company = "Acme"
greeting = ["Hi", "Hello"]

[limits]
max_include_depth = 8

[css]
inline = true
"#,
    );

    let config = AppConfig::load(&config_path).expect("Failed to load config");

    assert_eq!(config.components_dir(), temp_dir.path().join("components"));
    assert_eq!(config.engines_dir(), Some(PathBuf::from("/opt/engines")));
    assert_eq!(config.emails_dir(), Some(temp_dir.path().join("emails")));
    assert_eq!(
        config.data.get("company"),
        Some(&DataEntry::Text("Acme".to_string()))
    );
    assert_eq!(
        config.data.get("greeting"),
        Some(&DataEntry::Choices(vec![
            "Hi".to_string(),
            "Hello".to_string()
        ]))
    );
    assert_eq!(config.limits.max_include_depth, 8);
    assert_eq!(config.limits.max_loop_iterations, 1000);
    assert!(config.css.inline);
}

#[test]
fn test_app_config_load_minimal_uses_defaults() {
    let (_temp_dir, config_path) = write_config("[paths]\ncomponents = \"parts\"\n");

    let config = AppConfig::load(&config_path).expect("Failed to load config");

    assert!(config.data.is_empty());
    assert_eq!(config.limits, PipelineConfig::default());
    assert!(config.css.inline);
    assert_eq!(config.engines_dir(), None);
}

#[test]
fn test_app_config_load_nonexistent_file() {
    let nonexistent_path = PathBuf::from("nonexistent_email_preview.toml");
    let result = AppConfig::load(&nonexistent_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Configuration file not found"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_app_config_load_invalid_toml() {
    let (_temp_dir, config_path) = write_config("invalid = toml = syntax");

    let result = AppConfig::load(&config_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Failed to parse configuration file"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_app_config_requires_components_path() {
    let (_temp_dir, missing) = write_config("[paths]\nengines = \"engines\"\n");
    assert!(matches!(AppConfig::load(&missing), Err(Error::Config(_))));

    let (_temp_dir, empty) = write_config("[paths]\ncomponents = \"  \"\n");
    match AppConfig::load(&empty) {
        Err(Error::Config(msg)) => assert!(msg.contains("paths.components")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_custom_data_conversion() {
    let mut config = AppConfig::new("components");
    config
        .data
        .insert("company".to_string(), DataEntry::Text("Acme".to_string()));
    config.data.insert(
        "color".to_string(),
        DataEntry::Choices(vec!["red".to_string()]),
    );

    let data = config.custom_data();

    assert_eq!(data.len(), 2);
    assert!(matches!(data.get("company"), Some(DataValue::Literal(v)) if v == "Acme"));
    assert!(matches!(data.get("color"), Some(DataValue::OneOf(v)) if v == &vec!["red".to_string()]));
}

#[test]
fn test_get_config_path() {
    assert_eq!(
        get_config_path(Some("custom.toml")),
        PathBuf::from("custom.toml")
    );
    assert!(get_config_path(None).ends_with(DEFAULT_CONFIG_FILENAME));
}

#[test]
fn test_app_config_css_inline_can_be_disabled() {
    let (_temp_dir, config_path) =
        write_config("[paths]\ncomponents = \"parts\"\n\n[css]\ninline = false\n");

    let config = AppConfig::load(&config_path).expect("Failed to load config");
    assert!(!config.css.inline);
}

#[test]
fn test_app_config_empty_css_table_keeps_inlining() {
    let (_temp_dir, config_path) = write_config("[paths]\ncomponents = \"parts\"\n\n[css]\n");

    let config = AppConfig::load(&config_path).expect("Failed to load config");
    assert!(config.css.inline);
}
