use chat_config::LogLevel;
use chat_server::ServerError;
use chat_server::logger::{LogTarget, initialize};

use log::LevelFilter;
use tempfile::TempDir;

// The global logger can be installed once per process, so this binary holds a single test.
#[test]
fn given_file_target_when_initialized_then_lines_written_and_second_install_rejected() {
    // Given
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chat.log");

    // When
    initialize(LogLevel(LevelFilter::Info), LogTarget::File(path.clone())).unwrap();
    log::warn!("disk almost full");
    log::debug!("below the configured level");
    log::logger().flush();

    // Then
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains(" - INFO] Logger initialized: level=INFO, file="));
    assert!(contents.contains(" - WARN] disk almost full ["));
    assert!(contents.contains("logger_tests.rs:"));
    assert!(!contents.contains("below the configured level"));

    // When - a second install
    let second = initialize(LogLevel(LevelFilter::Info), LogTarget::Stdout { colored: false });

    // Then
    assert!(matches!(second, Err(ServerError::Logger { .. })));
}
