use crate::model::{ActiveGroup, Supervision, Visit};
use ogs_database::{Database, DatabaseError, DatabaseErrorExt, execute};
use ogs_kernel::domain::constants::{ACTIVE_GROUP, SUPERVISION, VISIT};
use ogs_kernel::safe_nanoid;
use ogs_kernel::security::resource::ResourceGuard;
use ogs_kernel::time::now_millis;
use tracing::{debug, instrument, trace};

const SESSION_FIELDS: &str = "id.id() AS id, activity_id, room_id, day, started_at, ended_at";
const SUPERVISION_FIELDS: &str =
    "id.id() AS id, active_group_id, staff_id, started_at, ended_at";
const VISIT_FIELDS: &str = "id.id() AS id, student_id, active_group_id, entered_at, exited_at";

/// `SurrealQL` persistence for `active_group` sessions.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: Database,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Opens a session; a second one for the same `(activity, day)` is a conflict.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        activity_id: &str,
        room_id: &str,
        day: &str,
    ) -> Result<ActiveGroup, DatabaseError> {
        let key = safe_nanoid!();
        let query = format!(
            "CREATE {} SET activity_id = $activity_id, room_id = $room_id, day = $day, \
             started_at = $now",
            ResourceGuard::record(ACTIVE_GROUP, &key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("activity_id", activity_id.to_owned()))
                .bind(("room_id", room_id.to_owned()))
                .bind(("day", day.to_owned()))
                .bind(("now", now_millis()))
        )
        .await
        .context("Opening session")?;

        debug!(%key, "Session opened");
        self.get(&key).await?.ok_or_else(|| "Opened session vanished".into())
    }

    pub async fn get(&self, key: &str) -> Result<Option<ActiveGroup>, DatabaseError> {
        let query =
            format!("SELECT {SESSION_FIELDS} FROM {}", ResourceGuard::record(ACTIVE_GROUP, key));
        let mut response = execute!(self.db.query(&query)).await.context("Loading session")?;
        Ok(response.take::<Vec<ActiveGroup>>(0)?.into_iter().next())
    }

    pub async fn find(
        &self,
        activity_id: &str,
        day: &str,
    ) -> Result<Option<ActiveGroup>, DatabaseError> {
        let query = format!(
            "SELECT {SESSION_FIELDS} FROM active_group \
             WHERE activity_id = $activity_id AND day = $day LIMIT 1"
        );
        let mut response = execute!(
            self.db
                .query(&query)
                .bind(("activity_id", activity_id.to_owned()))
                .bind(("day", day.to_owned()))
        )
        .await
        .context("Finding session")?;
        Ok(response.take::<Vec<ActiveGroup>>(0)?.into_iter().next())
    }

    /// The open session hosted by a room, if any.
    pub async fn open_in_room(&self, room_id: &str) -> Result<Option<ActiveGroup>, DatabaseError> {
        let query = format!(
            "SELECT {SESSION_FIELDS} FROM active_group \
             WHERE room_id = $room_id AND ended_at = NONE LIMIT 1"
        );
        let mut response = execute!(self.db.query(&query).bind(("room_id", room_id.to_owned())))
            .await
            .context("Checking room occupancy")?;
        Ok(response.take::<Vec<ActiveGroup>>(0)?.into_iter().next())
    }

    pub async fn list(
        &self,
        day: Option<&str>,
        open_only: bool,
    ) -> Result<Vec<ActiveGroup>, DatabaseError> {
        let mut conditions = Vec::new();
        if day.is_some() {
            conditions.push("day = $day");
        }
        if open_only {
            conditions.push("ended_at = NONE");
        }
        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let query = format!(
            "SELECT {SESSION_FIELDS} FROM active_group{clause} ORDER BY day DESC, started_at DESC"
        );

        let mut response = execute!(self.db.query(&query).bind(("day", day.map(str::to_owned))))
            .await
            .context("Listing sessions")?;
        Ok(response.take::<Vec<ActiveGroup>>(0)?)
    }

    /// Open sessions of an activity from days before `before_day`.
    pub async fn stale(
        &self,
        activity_id: &str,
        before_day: &str,
    ) -> Result<Vec<ActiveGroup>, DatabaseError> {
        let query = format!(
            "SELECT {SESSION_FIELDS} FROM active_group \
             WHERE activity_id = $activity_id AND day < $day AND ended_at = NONE \
             ORDER BY day ASC"
        );
        let mut response = execute!(
            self.db
                .query(&query)
                .bind(("activity_id", activity_id.to_owned()))
                .bind(("day", before_day.to_owned()))
        )
        .await
        .context("Finding stale sessions")?;
        Ok(response.take::<Vec<ActiveGroup>>(0)?)
    }

    /// Opens an ended session again, possibly in another room.
    pub async fn reopen(&self, key: &str, room_id: &str) -> Result<(), DatabaseError> {
        let query = format!(
            "UPDATE {} SET ended_at = NONE, room_id = $room_id",
            ResourceGuard::record(ACTIVE_GROUP, key)
        );
        execute!(self.db.query(&query).bind(("room_id", room_id.to_owned())))
            .await
            .context("Reopening session")?;
        Ok(())
    }

    /// Ends the session with its open supervisions and visits in one transaction.
    #[instrument(skip(self))]
    pub async fn end(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            UPDATE supervision SET ended_at = $now WHERE active_group_id = $group AND ended_at = NONE;
            UPDATE visit SET exited_at = $now WHERE active_group_id = $group AND exited_at = NONE;
            UPDATE {} SET ended_at = $now;
            COMMIT TRANSACTION;",
            ResourceGuard::record(ACTIVE_GROUP, key),
        );

        execute!(
            self.db.query(&query).bind(("group", key.to_owned())).bind(("now", now_millis()))
        )
        .await
        .context("Ending session")?;

        debug!("Session ended");
        Ok(())
    }
}

/// `SurrealQL` persistence for the `supervision` table.
#[derive(Debug, Clone)]
pub struct SupervisionRepository {
    db: Database,
}

impl SupervisionRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Records a new supervision; one row exists per `(session, staff)`.
    pub async fn create(
        &self,
        active_group_id: &str,
        staff_id: &str,
    ) -> Result<Supervision, DatabaseError> {
        let key = safe_nanoid!();
        let query = format!(
            "CREATE {} SET active_group_id = $group, staff_id = $staff, started_at = $now",
            ResourceGuard::record(SUPERVISION, &key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("group", active_group_id.to_owned()))
                .bind(("staff", staff_id.to_owned()))
                .bind(("now", now_millis()))
        )
        .await
        .context("Starting supervision")?;

        self.get(&key).await?.ok_or_else(|| "Started supervision vanished".into())
    }

    pub async fn get(&self, key: &str) -> Result<Option<Supervision>, DatabaseError> {
        let query = format!(
            "SELECT {SUPERVISION_FIELDS} FROM {}",
            ResourceGuard::record(SUPERVISION, key)
        );
        let mut response = execute!(self.db.query(&query)).await.context("Loading supervision")?;
        Ok(response.take::<Vec<Supervision>>(0)?.into_iter().next())
    }

    pub async fn find(
        &self,
        active_group_id: &str,
        staff_id: &str,
    ) -> Result<Option<Supervision>, DatabaseError> {
        let query = format!(
            "SELECT {SUPERVISION_FIELDS} FROM supervision \
             WHERE active_group_id = $group AND staff_id = $staff LIMIT 1"
        );
        let mut response = execute!(
            self.db
                .query(&query)
                .bind(("group", active_group_id.to_owned()))
                .bind(("staff", staff_id.to_owned()))
        )
        .await
        .context("Finding supervision")?;
        Ok(response.take::<Vec<Supervision>>(0)?.into_iter().next())
    }

    pub async fn open_for(&self, active_group_id: &str) -> Result<Vec<Supervision>, DatabaseError> {
        let query = format!(
            "SELECT {SUPERVISION_FIELDS} FROM supervision \
             WHERE active_group_id = $group AND ended_at = NONE ORDER BY started_at ASC"
        );
        let mut response =
            execute!(self.db.query(&query).bind(("group", active_group_id.to_owned())))
                .await
                .context("Listing supervisions")?;
        Ok(response.take::<Vec<Supervision>>(0)?)
    }

    pub async fn reopen(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!(
            "UPDATE {} SET ended_at = NONE, started_at = $now",
            ResourceGuard::record(SUPERVISION, key)
        );
        execute!(self.db.query(&query).bind(("now", now_millis())))
            .await
            .context("Resuming supervision")?;
        Ok(())
    }

    pub async fn end(&self, key: &str) -> Result<(), DatabaseError> {
        let query =
            format!("UPDATE {} SET ended_at = $now", ResourceGuard::record(SUPERVISION, key));
        execute!(self.db.query(&query).bind(("now", now_millis())))
            .await
            .context("Ending supervision")?;
        Ok(())
    }
}

/// `SurrealQL` persistence for the `visit` table.
#[derive(Debug, Clone)]
pub struct VisitRepository {
    db: Database,
}

impl VisitRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Opens a visit while the group has fewer than `capacity` present, closing `previous`
    /// in the same transaction. `None` when the group is full.
    ///
    /// Every check-in also stamps the session record, so two check-ins racing for the last
    /// place conflict at commit instead of both seeing a free place.
    #[instrument(skip(self))]
    pub async fn check_in(
        &self,
        student_id: &str,
        active_group_id: &str,
        previous: Option<&str>,
        capacity: i64,
    ) -> Result<Option<Visit>, DatabaseError> {
        let key = safe_nanoid!();
        let close = previous
            .map(|prev| format!("UPDATE {} SET exited_at = $now;", ResourceGuard::record(VISIT, prev)))
            .unwrap_or_default();
        let query = format!(
            "BEGIN TRANSACTION;
            LET $present = count((SELECT VALUE id FROM visit \
                WHERE active_group_id = $group AND exited_at = NONE));
            IF $present < $capacity {{
                UPDATE {} SET last_check_in_at = $now;
                {close}
                CREATE {} SET student_id = $student, active_group_id = $group, entered_at = $now;
            }};
            COMMIT TRANSACTION;",
            ResourceGuard::record(ACTIVE_GROUP, active_group_id),
            ResourceGuard::record(VISIT, &key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("student", student_id.to_owned()))
                .bind(("group", active_group_id.to_owned()))
                .bind(("capacity", capacity))
                .bind(("now", now_millis()))
        )
        .await
        .context("Checking in")?;

        let visit = self.get(&key).await?;
        if visit.is_some() {
            trace!(%key, "Visit opened");
        }
        Ok(visit)
    }

    pub async fn get(&self, key: &str) -> Result<Option<Visit>, DatabaseError> {
        let query = format!("SELECT {VISIT_FIELDS} FROM {}", ResourceGuard::record(VISIT, key));
        let mut response = execute!(self.db.query(&query)).await.context("Loading visit")?;
        Ok(response.take::<Vec<Visit>>(0)?.into_iter().next())
    }

    pub async fn open_for_student(&self, student_id: &str) -> Result<Option<Visit>, DatabaseError> {
        let query = format!(
            "SELECT {VISIT_FIELDS} FROM visit \
             WHERE student_id = $student AND exited_at = NONE ORDER BY entered_at DESC LIMIT 1"
        );
        let mut response = execute!(self.db.query(&query).bind(("student", student_id.to_owned())))
            .await
            .context("Finding open visit")?;
        Ok(response.take::<Vec<Visit>>(0)?.into_iter().next())
    }

    pub async fn count_open(&self, active_group_id: &str) -> Result<i64, DatabaseError> {
        let query = "RETURN count((SELECT VALUE id FROM visit \
                     WHERE active_group_id = $group AND exited_at = NONE))";
        let mut response =
            execute!(self.db.query(query).bind(("group", active_group_id.to_owned())))
                .await
                .context("Counting visits")?;
        Ok(response.take::<Option<i64>>(0)?.unwrap_or_default())
    }

    pub async fn list(
        &self,
        active_group_id: &str,
        open_only: bool,
    ) -> Result<Vec<Visit>, DatabaseError> {
        let open = if open_only { " AND exited_at = NONE" } else { "" };
        let query = format!(
            "SELECT {VISIT_FIELDS} FROM visit WHERE active_group_id = $group{open} \
             ORDER BY entered_at ASC"
        );
        let mut response =
            execute!(self.db.query(&query).bind(("group", active_group_id.to_owned())))
                .await
                .context("Listing visits")?;
        Ok(response.take::<Vec<Visit>>(0)?)
    }

    pub async fn close(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!("UPDATE {} SET exited_at = $now", ResourceGuard::record(VISIT, key));
        execute!(self.db.query(&query).bind(("now", now_millis())))
            .await
            .context("Checking out")?;
        Ok(())
    }
}
