use super::*;
use std::io;

#[test]
fn test_config_error_display() {
    let error = Error::Config("components path is required".to_string());
    assert_eq!(
        error.to_string(),
        "Configuration error: components path is required"
    );
}

#[test]
fn test_invalid_arguments_error_display() {
    let error = Error::InvalidArguments("--engine is required".to_string());
    assert_eq!(error.to_string(), "Invalid arguments: --engine is required");
}

#[test]
fn test_load_file_error_display() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
    let error = Error::LoadFile(io_error);
    assert_eq!(error.to_string(), "Failed to load file: File not found");
}

#[test]
fn test_engine_error_is_transparent() {
    let error: Error = email_template_engine::Error::EngineNotFound {
        extension: "jinja".to_string(),
    }
    .into();
    assert_eq!(error.to_string(), "Engine not found: jinja");
}

#[test]
fn test_error_debug_format() {
    let error = Error::Serialize("bad".to_string());
    let debug_output = format!("{:?}", error);
    assert!(debug_output.contains("Serialize"));
    assert!(debug_output.contains("bad"));
}

#[test]
fn test_exit_codes() {
    assert_eq!(Error::Config("x".to_string()).exit_code(), 2);
    assert_eq!(Error::InvalidArguments("x".to_string()).exit_code(), 2);
    assert_eq!(
        Error::LoadFile(io::Error::new(io::ErrorKind::Other, "x")).exit_code(),
        1
    );
    assert_eq!(Error::Serialize("x".to_string()).exit_code(), 1);
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
