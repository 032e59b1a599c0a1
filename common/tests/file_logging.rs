//! File logging installs a process-wide subscriber, so it gets its own test binary.

use common::log_setup::{LogConfig, LogSetupError, setup_logging};

#[test]
fn test_setup_logging_creates_log_file_once() {
    let dir = std::env::temp_dir().join(format!("common_file_logging_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let config = LogConfig {
        base_level: "debug".to_string(),
        dir: dir.clone(),
        file_prefix: "measure".to_string(),
        max_files: 2,
    };

    setup_logging(&config).unwrap();
    tracing::info!("written to the rolling file");

    let files: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(
        files.iter().any(|name| name.starts_with("measure") && name.ends_with(".log")),
        "no log file in {:?}: {:?}",
        dir,
        files
    );

    let err = setup_logging(&config).unwrap_err();
    assert!(matches!(err, LogSetupError::AlreadyInitialized), "{err}");

    let _ = std::fs::remove_dir_all(&dir);
}
