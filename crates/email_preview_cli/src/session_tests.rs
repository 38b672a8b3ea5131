use super::*;
use crate::config::DataEntry;
use email_template_engine::VariableSource;
use tempfile::TempDir;

fn workspace() -> (TempDir, AppConfig) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let components = temp_dir.path().join("components");
    fs::create_dir_all(&components).expect("Failed to create components");
    fs::write(components.join("footer.html"), "<footer>{{company}}</footer>")
        .expect("Failed to write component");

    let config = AppConfig::new(components.to_string_lossy().to_string());
    (temp_dir, config)
}

#[test]
fn test_overrides_win_over_config_data() {
    let (_temp_dir, mut config) = workspace();
    config
        .data
        .insert("company".to_string(), DataEntry::Text("Config Co".to_string()));

    let session = PreviewSession::new(
        config,
        &[("company".to_string(), "Flag Co".to_string())],
    );

    assert_eq!(
        session.variables().resolve("company").expect("literal"),
        "Flag Co"
    );
    assert_eq!(
        session.variables().source_of("company"),
        Some(VariableSource::Custom)
    );
    assert_eq!(
        session.variables().source_of("first_name"),
        Some(VariableSource::Default)
    );
}

#[test]
fn test_validator_knows_components_on_disk() {
    let (_temp_dir, config) = workspace();
    let session = PreviewSession::new(config, &[]);

    let validator = session.validator();
    assert!(validator.components().contains("footer"));
    assert!(validator.variables().contains("first_name"));
}

#[test]
fn test_validator_with_missing_components_dir_is_empty() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = AppConfig::new(temp_dir.path().join("nope").to_string_lossy().to_string());

    let validator = PreviewSession::new(config, &[]).validator();
    assert!(validator.components().is_empty());
}

#[tokio::test]
async fn test_pipeline_uses_components_dir() {
    let (_temp_dir, config) = workspace();
    let session = PreviewSession::new(config, &[("company".to_string(), "Acme".to_string())]);

    let html = session.pipeline().render("{{include 'footer'}}").await;
    assert_eq!(html, "<footer>Acme</footer>");
}

#[tokio::test]
async fn test_pipeline_inlines_css_by_default() {
    let (_temp_dir, config) = workspace();
    let session = PreviewSession::new(config, &[]);

    let html = session
        .pipeline()
        .render("<style>b { color: red }</style><b>x</b>")
        .await;
    assert_eq!(html, "<b style=\"color: red\">x</b>");
}

#[tokio::test]
async fn test_pipeline_keeps_style_blocks_when_inlining_disabled() {
    let (_temp_dir, mut config) = workspace();
    config.css.inline = false;
    let session = PreviewSession::new(config, &[]);

    let html = session
        .pipeline()
        .render("<style>b { color: red }</style><b>x</b>")
        .await;
    assert_eq!(html, "<style>b { color: red }</style><b>x</b>");
}

#[test]
fn test_engines_include_builtin_and_loaded() {
    let (temp_dir, mut config) = workspace();
    let engines = temp_dir.path().join("engines");
    fs::create_dir_all(&engines).expect("Failed to create engines");
    fs::write(
        engines.join("mailchimp.toml"),
        "name = \"Mailchimp\"\nextension = \"mc\"\nvariable = \"*|{key}|*\"\n",
    )
    .expect("Failed to write engine");
    config.paths.engines = Some(engines.to_string_lossy().to_string());

    let registry = PreviewSession::new(config, &[]).engines();
    let extensions: Vec<_> = registry.available().into_iter().map(|(ext, _)| ext).collect();
    assert_eq!(extensions, vec!["hbs", "liquid", "mc"]);
}

#[test]
fn test_read_template_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let result = read_template(&temp_dir.path().join("missing.html"));
    assert!(matches!(result, Err(Error::LoadFile(_))));
}

#[test]
fn test_write_output_creates_parent_directories() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = temp_dir.path().join("out").join("email.html");

    write_output(Some(&output), "<p>hi</p>").expect("Failed to write output");
    assert_eq!(
        fs::read_to_string(&output).expect("Failed to read output"),
        "<p>hi</p>"
    );
}

#[test]
fn test_load_reports_missing_config() {
    let args = ConfigArgs {
        config: Some("definitely-missing-email-preview.toml".to_string()),
    };
    assert!(matches!(
        PreviewSession::load(&args, &[]),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_template_path_falls_back_to_emails_dir() {
    let (temp_dir, mut config) = workspace();
    let emails = temp_dir.path().join("emails");
    fs::create_dir_all(&emails).expect("Failed to create emails");
    fs::write(emails.join("welcome.html"), "<p>hi</p>").expect("Failed to write email");
    config.paths.emails = Some(emails.to_string_lossy().to_string());

    let session = PreviewSession::new(config, &[]);

    assert_eq!(
        session.template_path(Path::new("welcome.html")),
        emails.join("welcome.html")
    );
    assert_eq!(
        session.template_path(Path::new("unknown.html")),
        PathBuf::from("unknown.html")
    );
}

#[test]
fn test_template_path_prefers_existing_path() {
    let (temp_dir, mut config) = workspace();
    let direct = temp_dir.path().join("direct.html");
    fs::write(&direct, "<p>direct</p>").expect("Failed to write template");
    config.paths.emails = Some(temp_dir.path().join("emails").to_string_lossy().to_string());

    let session = PreviewSession::new(config, &[]);
    assert_eq!(session.template_path(&direct), direct);
}
