use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use vreg_logger::{LevelFilter, Logger};

#[test]
fn file_logging_writes_registration_events() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder()
        .name("vreg-file-logging")
        .console(false)
        .path(&log_dir)
        .json()
        .level(LevelFilter::INFO)
        .init()?;

    tracing::info!(plate = "12가3456", "registration submitted");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    assert!(contents.contains("registration submitted"));
    assert!(contents.contains("\"plate\""), "json output should carry structured fields");

    Ok(())
}
