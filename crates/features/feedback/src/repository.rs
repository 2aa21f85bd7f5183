use crate::model::{FeedbackQuery, FeedbackRecord, NewFeedback};
use ogs_database::{Database, DatabaseError, DatabaseErrorExt, execute};
use ogs_kernel::domain::constants::FEEDBACK;
use ogs_kernel::safe_nanoid;
use ogs_kernel::security::resource::ResourceGuard;
use ogs_kernel::time::now_millis;
use tracing::trace;

const FIELDS: &str = "id.id() AS id, student_id, value, day, time, is_mensa_feedback, created_at";

#[derive(Debug, Clone)]
pub struct FeedbackRepository {
    db: Database,
}

impl FeedbackRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, entry: &NewFeedback) -> Result<FeedbackRecord, DatabaseError> {
        let key = safe_nanoid!();
        let query = format!(
            "CREATE {} SET student_id = $student_id, value = $value, day = $day, time = $time, \
             is_mensa_feedback = $mensa, created_at = $now",
            ResourceGuard::record(FEEDBACK, &key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("student_id", entry.student_id.clone()))
                .bind(("value", entry.value.to_string()))
                .bind(("day", entry.day.clone()))
                .bind(("time", entry.time.clone()))
                .bind(("mensa", entry.is_mensa_feedback))
                .bind(("now", now_millis()))
        )
        .await
        .context("Storing feedback")?;

        trace!(%key, "Feedback stored");
        self.get(&key).await?.ok_or_else(|| "Stored feedback vanished".into())
    }

    pub async fn get(&self, key: &str) -> Result<Option<FeedbackRecord>, DatabaseError> {
        let query = format!("SELECT {FIELDS} FROM {}", ResourceGuard::record(FEEDBACK, key));
        let mut response = execute!(self.db.query(&query)).await.context("Loading feedback")?;
        Ok(response.take::<Vec<FeedbackRecord>>(0)?.into_iter().next())
    }

    /// Entries matching every provided filter, newest first.
    pub async fn list(&self, filter: &FeedbackQuery) -> Result<Vec<FeedbackRecord>, DatabaseError> {
        let mut conditions = Vec::new();
        if filter.student_id.is_some() {
            conditions.push("student_id = $student_id");
        }
        if filter.day.is_some() {
            conditions.push("day = $day");
        }
        if filter.from.is_some() {
            conditions.push("day >= $from");
        }
        if filter.to.is_some() {
            conditions.push("day <= $to");
        }
        if filter.mensa.is_some() {
            conditions.push("is_mensa_feedback = $mensa");
        }
        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let query = format!(
            "SELECT {FIELDS} FROM feedback{clause} ORDER BY day DESC, time DESC, created_at DESC"
        );

        let mut response = execute!(
            self.db
                .query(&query)
                .bind(("student_id", filter.student_id.clone()))
                .bind(("day", filter.day.clone()))
                .bind(("from", filter.from.clone()))
                .bind(("to", filter.to.clone()))
                .bind(("mensa", filter.mensa))
        )
        .await
        .context("Listing feedback")?;
        Ok(response.take::<Vec<FeedbackRecord>>(0)?)
    }

    pub async fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!("DELETE {}", ResourceGuard::record(FEEDBACK, key));
        execute!(self.db.query(&query)).await.context("Deleting feedback")?;
        Ok(())
    }
}
