use ogs_kernel::config::load_config;
use ogs_kernel::domain::config::ApiConfig;
use serial_test::serial;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn file_values_override_defaults() {
    let file = write_config(
        r#"
        [server]
        port = 9000

        [schulhof]
        room_name = "Pausenhof"
        "#,
    );

    let cfg: ApiConfig = load_config(Some(file.path())).unwrap();
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.schulhof.room_name, "Pausenhof");
    assert_eq!(cfg.schulhof.activity_name, "Schulhof");
    assert_eq!(cfg.database.url, "mem://");
}

#[test]
#[serial]
fn json_files_are_supported() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{ "logging": { "level": "debug", "json": true } }"#).unwrap();

    let cfg: ApiConfig = load_config(Some(file.path())).unwrap();
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    let result = load_config::<ApiConfig>(Some("/nonexistent/ogs/server.toml"));
    assert!(result.is_err());
}
