use super::*;
use std::fs;
use tempfile::TempDir;
use tracing_test::traced_test;

fn mailchimp() -> PatternEngine {
    PatternEngine::new("Mailchimp", "mc", "*|{key}|*").with_indexed_variable("*|{key}_{index}|*")
}

#[test]
fn test_pattern_engine_convert_variable() {
    let engine = mailchimp();
    assert_eq!(engine.convert_variable("first_name", None), "*|first_name|*");
    assert_eq!(engine.convert_variable("item", Some(2)), "*|item_2|*");

    let plain = PatternEngine::new("Plain", "txt", "${key}");
    assert_eq!(plain.convert_variable("item", Some(3)), "$item_3");
}

#[test]
fn test_builtin_engines() {
    let registry = EngineRegistry::with_builtin();

    assert_eq!(
        registry.available(),
        vec![
            ("hbs".to_string(), "Handlebars".to_string()),
            ("liquid".to_string(), "Liquid".to_string()),
        ]
    );

    let liquid = registry.get("liquid").expect("liquid should be built in");
    assert_eq!(liquid.convert_variable("name", None), "{{ name }}");
    assert_eq!(liquid.convert_variable("name", Some(1)), "{{ name_1 }}");

    let hbs = registry.get("hbs").expect("hbs should be built in");
    assert_eq!(hbs.convert_variable("name", None), "{{name}}");
    assert_eq!(hbs.convert_variable("name", Some(4)), "{{name_4}}");
}

#[test]
fn test_convert_only_rewrites_keyed_directives() {
    let mut registry = EngineRegistry::new();
    registry.register(Arc::new(mailchimp()));

    let content = "<p>{{greeting, 'Hi'}} {{first_name}} {{component 'x'}} {{ company , boss }}</p>";
    let output = registry.convert(content, "mc").expect("mc is registered");

    assert_eq!(
        output,
        "<p>*|greeting|* {{first_name}} {{component 'x'}} *|company|*</p>"
    );
}

#[test]
fn test_convert_inside_loop_emits_indexed_placeholders() {
    let mut registry = EngineRegistry::new();
    registry.register(Arc::new(mailchimp()));

    let content = "<ul>\n{{loop 3}}\n    <li>{{item, 'x'}}</li>\n{{/loop}}\n</ul>";
    let output = registry.convert(content, "mc").expect("mc is registered");

    assert_eq!(
        output,
        "<ul>\n{{loop 3}}\n    <li>*|item_1|*\n        *|item_2|*\n        *|item_3|*</li>\n{{/loop}}\n</ul>"
    );
}

#[test]
fn test_convert_respects_iteration_cap() {
    let mut registry = EngineRegistry::new().with_max_loop_iterations(2);
    registry.register(Arc::new(mailchimp()));

    let output = registry
        .convert("{{loop 50}}{{item, 'x'}}{{/loop}}", "mc")
        .expect("mc is registered");
    assert_eq!(output, "{{loop 50}}*|item_1|*\n           *|item_2|*{{/loop}}");
}

#[test]
fn test_convert_unknown_extension_fails() {
    let registry = EngineRegistry::with_builtin();
    let result = registry.convert("{{a, b}}", "jinja");

    match result {
        Err(Error::EngineNotFound { extension }) => assert_eq!(extension, "jinja"),
        other => panic!("Expected EngineNotFound, got {other:?}"),
    }
}

#[test]
#[traced_test]
fn test_load_dir_skips_invalid_definitions() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        temp_dir.path().join("mailchimp.toml"),
        "name = \"Mailchimp\"\nextension = \"mc\"\nvariable = \"*|{key}|*\"\n",
    )
    .expect("Failed to write engine");
    fs::write(temp_dir.path().join("broken.toml"), "name = [").expect("Failed to write engine");
    fs::write(
        temp_dir.path().join("nokey.toml"),
        "name = \"Bad\"\nextension = \"bad\"\nvariable = \"{{ x }}\"\n",
    )
    .expect("Failed to write engine");
    fs::write(temp_dir.path().join("readme.md"), "ignored").expect("Failed to write readme");

    let mut registry = EngineRegistry::with_builtin();
    let loaded = registry.load_dir(temp_dir.path());

    assert_eq!(loaded, 1);
    assert!(registry.get("mc").is_some());
    assert!(registry.get("bad").is_none());
    assert_eq!(registry.available().len(), 3);
    assert!(logs_contain("Loaded template engine: Mailchimp (.mc)"));
    assert!(logs_contain("Failed to load engine"));
    assert!(logs_contain("variable pattern must contain {key}"));
}

#[test]
#[traced_test]
fn test_load_dir_missing_directory_is_not_fatal() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut registry = EngineRegistry::with_builtin();

    assert_eq!(registry.load_dir(&temp_dir.path().join("engines")), 0);
    assert_eq!(registry.available().len(), 2);
    assert!(logs_contain("Could not load template engines"));
}

#[test]
fn test_loaded_engine_overrides_builtin() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        temp_dir.path().join("hbs.toml"),
        "name = \"Custom Handlebars\"\nextension = \"hbs\"\nvariable = \"{{{{key}}}}\"\n",
    )
    .expect("Failed to write engine");

    let mut registry = EngineRegistry::with_builtin();
    registry.load_dir(temp_dir.path());

    let hbs = registry.get("hbs").expect("hbs should exist");
    assert_eq!(hbs.name(), "Custom Handlebars");
    assert_eq!(hbs.convert_variable("x", None), "{{{x}}}");
}

#[test]
fn test_pattern_engine_load_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("empty.toml");
    fs::write(&path, "name = \"\"\nextension = \"e\"\nvariable = \"{key}\"\n")
        .expect("Failed to write engine");

    match PatternEngine::load(&path) {
        Err(Error::EngineDefinition { path: reported, reason }) => {
            assert_eq!(reported, path);
            assert_eq!(reason, "name must not be empty");
        }
        other => panic!("Expected EngineDefinition, got {other:?}"),
    }
}
