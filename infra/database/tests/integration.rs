use ogs_database::*;

async fn memory() -> Database {
    Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://")
}

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = memory().await;

    db.health().await.expect("health check");
    assert_eq!(db.namespace(), "test_ns");
    assert_eq!(db.database(), "test_db");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn unique_index_violation_is_a_conflict() {
    let db = memory().await;

    execute!(db.query("CREATE room SET name = $name").bind(("name", "Schulhof")))
        .await
        .expect("first room");

    let err = execute!(db.query("CREATE room SET name = $name").bind(("name", "Schulhof")))
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "unexpected error: {err}");
}

#[tokio::test]
async fn duplicate_record_id_is_a_conflict() {
    let db = memory().await;

    execute!(db.query("CREATE rfid_card:⟨04A1B2C3⟩ SET person_id = 'p1'")).await.expect("card");
    let err = execute!(db.query("CREATE rfid_card:⟨04A1B2C3⟩ SET person_id = 'p2'"))
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "unexpected error: {err}");
}

#[tokio::test]
async fn reopening_applies_no_migration_twice() {
    let db = memory().await;

    let mut response = execute!(db.query("RETURN count((SELECT VALUE id FROM migration))"))
        .await
        .expect("count migrations");
    let count = response.take::<Option<i64>>(0).expect("take count");
    assert_eq!(count, Some(6));
}
