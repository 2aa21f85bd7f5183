use ogs_domain::config::{ApiConfig, DatabaseConfig, LoggingConfig, SchulhofConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "ogs");
    assert_eq!(db.database, "core");
    assert!(db.credentials.is_none());

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.directory.is_none());

    let schulhof = SchulhofConfig::default();
    assert_eq!(schulhof.room_name, "Schulhof");
    assert_eq!(schulhof.category_color, "#7ED321");
    assert_eq!(schulhof.max_participants, 250);
}

#[test]
fn api_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": { "url": "mem://", "namespace": "n", "database": "d", "credentials": null },
        "schulhof": { "room_name": "Pausenhof", "capacity": 80 }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.namespace, "n");
    assert_eq!(cfg.schulhof.room_name, "Pausenhof");
    assert_eq!(cfg.schulhof.capacity, 80);
    assert_eq!(cfg.schulhof.activity_name, "Schulhof");
    assert!(!cfg.logging.json);
}

#[test]
fn mutating_a_clone_leaves_the_original_untouched() {
    let original = ApiConfig::default();
    let mut copy = original.clone();
    copy.schulhof.capacity = 12;

    assert_eq!(original.schulhof.capacity, 200);
    assert_eq!(copy.schulhof.capacity, 12);
}
