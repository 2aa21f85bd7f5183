use ogs_domain::config::LoggingConfig;
use ogs_logger::Logger;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_logging_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let config = LoggingConfig {
        level: "info".to_owned(),
        filter: None,
        directory: Some(log_dir.clone()),
        json: true,
        max_files: 2,
    };

    let logger = Logger::builder().name("integration-file-logging").config(&config)?.init()?;
    assert!(logger.writes_files());

    tracing::info!(room = "Schulhof", "session opened");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let line = contents.lines().next().expect("at least one line");
    let event: serde_json::Value = serde_json::from_str(line)?;
    assert_eq!(event["fields"]["room"], "Schulhof");

    Ok(())
}
