use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// Schema scripts compiled into the binary, applied in order.
static MIGRATIONS: &[Migration] = &[
    Migration::new("facilities", "0001", include_str!("../migrations/0001_facilities.surql")),
    Migration::new("users", "0002", include_str!("../migrations/0002_users.surql")),
    Migration::new("activities", "0003", include_str!("../migrations/0003_activities.surql")),
    Migration::new("groups", "0004", include_str!("../migrations/0004_groups.surql")),
    Migration::new("active", "0005", include_str!("../migrations/0005_active.surql")),
    Migration::new("feedback", "0006", include_str!("../migrations/0006_feedback.surql")),
];

#[derive(Debug)]
pub(crate) struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub(crate) const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    /// Stable content hash; any edit to an applied script is detected on the next start.
    pub(crate) fn checksum(&self) -> String {
        format!("{:016x}", fxhash::hash64(self.script))
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }

    fn to_applied(&self) -> AppliedMigration {
        AppliedMigration {
            slice: self.slice.to_owned(),
            version: self.version.to_owned(),
            checksum: self.checksum(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct MigrationReport {
    pub applied: Vec<AppliedMigration>,
    pub skipped: Vec<AppliedMigration>,
}

#[derive(Debug, Clone, SurrealValue)]
pub(crate) struct AppliedMigration {
    pub slice: String,
    pub version: String,
    pub checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner {
    db: Surreal<Any>,
}

impl MigrationRunner {
    #[must_use]
    pub(crate) const fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        self.run_with(MIGRATIONS).await
    }

    pub(crate) async fn run_with(
        &self,
        migrations: &[Migration],
    ) -> Result<MigrationReport, DatabaseError> {
        self.db
            .query("DEFINE TABLE OVERWRITE migration SCHEMALESS;")
            .await
            .context("Defining migration table")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let mut report = MigrationReport::default();
        let applied_migrations = self.get_migrations_map().await?;

        for migration in migrations {
            if let Some(applied) = applied_migrations.get(&migration.key()) {
                ensure_checksum_match(migration, &applied.checksum)?;
                report.skipped.push(migration.to_applied());
                continue;
            }

            self.apply_migration(migration).await?;
            report.applied.push(migration.to_applied());
        }

        Ok(report)
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration SET slice = $slice, version = $version, checksum = $checksum, applied_at = time::now();
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", migration.checksum()))
            .await
            .context(format!("SQL execution failed at {}", migration.key()))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Migration {} rejected", migration.key()))?;

        Ok(())
    }

    async fn get_migrations_map(
        &self,
    ) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing migrations map")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry))
            .collect())
    }
}

fn ensure_checksum_match(migration: &Migration, existing: &str) -> Result<(), DatabaseError> {
    let expected = migration.checksum();
    if existing != expected {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {} (recorded {existing}, embedded {expected})",
                migration.key(),
            )
            .into(),
            context: Some("Migration already applied with different checksum".into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::engine::any::connect;

    async fn memory() -> Surreal<Any> {
        let db = connect("mem://").await.expect("mem engine");
        db.use_ns("test").use_db("migrations").await.expect("session");
        db
    }

    #[test]
    fn versions_are_unique_and_ordered() {
        let versions: Vec<_> = MIGRATIONS.iter().map(|m| m.version).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(versions, sorted);
    }

    #[test]
    fn checksum_tracks_script_content() {
        let a = Migration::new("rooms", "0001", "DEFINE TABLE room;");
        let b = Migration::new("rooms", "0001", "DEFINE TABLE room SCHEMALESS;");
        assert_eq!(a.checksum(), a.checksum());
        assert_ne!(a.checksum(), b.checksum());
        assert_eq!(a.checksum().len(), 16);
    }

    #[tokio::test]
    async fn second_run_skips_applied_scripts() {
        let db = memory().await;
        let runner = MigrationRunner::new(db);

        let first = runner.run().await.expect("first run");
        assert_eq!(first.applied.len(), MIGRATIONS.len());
        assert!(first.skipped.is_empty());

        let second = runner.run().await.expect("second run");
        assert!(second.applied.is_empty());
        assert_eq!(second.skipped.len(), MIGRATIONS.len());
    }

    #[tokio::test]
    async fn drifted_script_is_refused() {
        let db = memory().await;
        let runner = MigrationRunner::new(db);

        let original = [Migration::new("rooms", "0001", "DEFINE TABLE OVERWRITE room SCHEMALESS;")];
        runner.run_with(&original).await.expect("apply original");

        let edited = [Migration::new(
            "rooms",
            "0001",
            "DEFINE TABLE OVERWRITE room SCHEMALESS; DEFINE FIELD name ON room TYPE string;",
        )];
        let err = runner.run_with(&edited).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Migration { .. }));
    }
}
