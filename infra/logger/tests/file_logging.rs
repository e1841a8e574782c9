use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use tessera_logger::Logger;
use tessera_domain::config::LoggingConfig;

#[test]
fn config_with_directory_writes_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");
    let config =
        LoggingConfig { level: "debug".to_owned(), directory: Some(log_dir.clone()), json: true };

    let logger = Logger::from_config("integration-file", &config)?;
    assert!(logger.has_file_output());

    tracing::info!(module = "core", "Module initialized");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let line = contents.lines().find(|l| l.contains("Module initialized")).expect("event logged");
    let parsed: serde_json::Value = serde_json::from_str(line)?;
    assert_eq!(parsed["fields"]["module"], "core");

    Ok(())
}
