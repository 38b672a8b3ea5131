use super::*;
use std::fs;
use tempfile::TempDir;

fn components_dir() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("header.html"), "<h1>{{company}}</h1>")
        .expect("Failed to write header");
    fs::create_dir_all(temp_dir.path().join("buttons")).expect("Failed to create subdirectory");
    fs::write(
        temp_dir.path().join("buttons").join("primary.html"),
        "<a class=\"btn\">Go</a>",
    )
    .expect("Failed to write button");
    fs::write(temp_dir.path().join("notes.txt"), "not a component").expect("Failed to write notes");
    temp_dir
}

#[tokio::test]
async fn test_filesystem_loader_reads_component() {
    let dir = components_dir();
    let loader = FileSystemComponentLoader::new(dir.path());

    assert_eq!(
        loader.load("header").await.as_deref(),
        Some("<h1>{{company}}</h1>")
    );
    assert_eq!(
        loader.load("buttons/primary").await.as_deref(),
        Some("<a class=\"btn\">Go</a>")
    );
}

#[tokio::test]
async fn test_filesystem_loader_missing_component_is_none() {
    let dir = components_dir();
    let loader = FileSystemComponentLoader::new(dir.path());
    assert_eq!(loader.load("footer").await, None);
}

#[tokio::test]
async fn test_filesystem_loader_rejects_unsafe_names() {
    let dir = components_dir();
    let loader = FileSystemComponentLoader::new(dir.path().join("buttons"));

    assert_eq!(loader.load("../header").await, None);
    assert_eq!(loader.load("/etc/passwd").await, None);
    assert_eq!(loader.load("").await, None);
}

#[tokio::test]
async fn test_in_memory_loader() {
    let loader = InMemoryComponentLoader::new()
        .with_component("footer", "<footer>bye</footer>")
        .with_component("header", "<header>hi</header>");

    assert_eq!(
        loader.load("footer").await.as_deref(),
        Some("<footer>bye</footer>")
    );
    assert_eq!(loader.load("sidebar").await, None);
    assert_eq!(
        loader.names().into_iter().collect::<Vec<_>>(),
        vec!["footer", "header"]
    );
}

#[test]
fn test_scan_component_names_recurses_and_strips_extension() {
    let dir = components_dir();
    let names = scan_component_names(dir.path()).expect("scan should succeed");
    assert_eq!(
        names.into_iter().collect::<Vec<_>>(),
        vec!["buttons/primary", "header"]
    );
}

#[test]
fn test_scan_component_names_missing_directory() {
    let dir = components_dir();
    let result = scan_component_names(&dir.path().join("does-not-exist"));
    assert!(matches!(result, Err(Error::ComponentsDirectory { .. })));
}
