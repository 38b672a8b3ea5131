use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_format_engines_aligns_extensions() {
    colored::control::set_override(false);
    let listing = format_engines(&[
        ("hbs".to_string(), "Handlebars".to_string()),
        ("liquid".to_string(), "Liquid".to_string()),
    ]);

    assert_eq!(
        listing,
        "Available template engines:\n  hbs     Handlebars\n  liquid  Liquid\n"
    );
}

#[test]
fn test_format_engines_empty() {
    assert_eq!(format_engines(&[]), "No template engines available\n");
}

#[tokio::test]
async fn test_execute_loads_engine_definitions() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path();
    fs::create_dir_all(root.join("components")).expect("Failed to create components");
    fs::create_dir_all(root.join("engines")).expect("Failed to create engines");
    fs::write(
        root.join("engines").join("jinja.toml"),
        "name = \"Jinja\"\nextension = \"j2\"\nvariable = \"{{{{ {key} }}}}\"\n",
    )
    .expect("Failed to write engine");
    fs::write(
        root.join("email-preview.toml"),
        "[paths]\ncomponents = \"components\"\nengines = \"engines\"\n",
    )
    .expect("Failed to write config");

    let args = EnginesArgs {
        config: ConfigArgs {
            config: Some(root.join("email-preview.toml").to_string_lossy().to_string()),
        },
    };
    execute(&args).await.expect("engines should list");
}
