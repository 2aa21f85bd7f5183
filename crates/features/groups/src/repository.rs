use crate::model::{CreateGroupRequest, SchoolGroup, UpdateGroupRequest};
use ogs_database::{Database, DatabaseError, DatabaseErrorExt, SurrealValue, execute};
use ogs_kernel::domain::constants::{GROUP_MEMBER, SCHOOL_GROUP};
use ogs_kernel::safe_nanoid;
use ogs_kernel::security::resource::ResourceGuard;
use ogs_kernel::time::now_millis;
use tracing::{debug, instrument};

const FIELDS: &str = "id.id() AS id, name, room_id, created_at, updated_at";
const MEMBER_FIELDS: &str = "group_id, student_id, joined_at";

/// Stored membership row, keyed by the student.
#[derive(Debug, Clone, SurrealValue)]
pub struct Membership {
    pub group_id: String,
    pub student_id: String,
    pub joined_at: i64,
}

#[derive(Debug, Clone)]
pub struct GroupRepository {
    db: Database,
}

impl GroupRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self, group), fields(name = %group.name))]
    pub async fn create(&self, group: &CreateGroupRequest) -> Result<SchoolGroup, DatabaseError> {
        let key = safe_nanoid!();
        let query = format!(
            "CREATE {} SET name = $name, room_id = $room_id, created_at = $now, updated_at = $now",
            ResourceGuard::record(SCHOOL_GROUP, &key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("name", group.name.clone()))
                .bind(("room_id", group.room_id.clone()))
                .bind(("now", now_millis()))
        )
        .await
        .context("Creating school group")?;

        debug!(%key, "School group created");
        self.get(&key).await?.ok_or_else(|| "Created school group vanished".into())
    }

    pub async fn get(&self, key: &str) -> Result<Option<SchoolGroup>, DatabaseError> {
        let query = format!("SELECT {FIELDS} FROM {}", ResourceGuard::record(SCHOOL_GROUP, key));
        let mut response = execute!(self.db.query(&query)).await.context("Loading school group")?;
        Ok(response.take::<Vec<SchoolGroup>>(0)?.into_iter().next())
    }

    pub async fn list(&self) -> Result<Vec<SchoolGroup>, DatabaseError> {
        let query = format!("SELECT {FIELDS} FROM school_group ORDER BY name ASC");
        let mut response = execute!(self.db.query(&query)).await.context("Listing school groups")?;
        Ok(response.take::<Vec<SchoolGroup>>(0)?)
    }

    pub async fn update(&self, key: &str, changes: &UpdateGroupRequest) -> Result<(), DatabaseError> {
        let mut sets = vec!["updated_at = $now"];
        if changes.name.is_some() {
            sets.push("name = $name");
        }
        if changes.room_id.is_some() {
            sets.push("room_id = $room_id");
        }
        let query =
            format!("UPDATE {} SET {}", ResourceGuard::record(SCHOOL_GROUP, key), sets.join(", "));

        execute!(
            self.db
                .query(&query)
                .bind(("name", changes.name.clone()))
                .bind(("room_id", changes.room_id.clone()))
                .bind(("now", now_millis()))
        )
        .await
        .context("Updating school group")?;
        Ok(())
    }

    /// Removes the group and all of its memberships.
    pub async fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            DELETE group_member WHERE group_id = $group;
            DELETE {};
            COMMIT TRANSACTION;",
            ResourceGuard::record(SCHOOL_GROUP, key),
        );
        execute!(self.db.query(&query).bind(("group", key.to_owned())))
            .await
            .context("Deleting school group")?;
        Ok(())
    }

    /// Puts the student into the group, moving them out of any previous one.
    pub async fn upsert_member(
        &self,
        group_key: &str,
        student_key: &str,
    ) -> Result<Membership, DatabaseError> {
        let query = format!(
            "UPSERT {} SET group_id = $group, student_id = $student, joined_at = $now",
            ResourceGuard::record(GROUP_MEMBER, student_key),
        );
        execute!(
            self.db
                .query(&query)
                .bind(("group", group_key.to_owned()))
                .bind(("student", student_key.to_owned()))
                .bind(("now", now_millis()))
        )
        .await
        .context("Adding group member")?;

        self.membership(student_key).await?.ok_or_else(|| "Stored membership vanished".into())
    }

    pub async fn membership(&self, student_key: &str) -> Result<Option<Membership>, DatabaseError> {
        let query = format!(
            "SELECT {MEMBER_FIELDS} FROM {}",
            ResourceGuard::record(GROUP_MEMBER, student_key)
        );
        let mut response = execute!(self.db.query(&query)).await.context("Loading membership")?;
        Ok(response.take::<Vec<Membership>>(0)?.into_iter().next())
    }

    pub async fn members(&self, group_key: &str) -> Result<Vec<Membership>, DatabaseError> {
        let query = format!(
            "SELECT {MEMBER_FIELDS} FROM group_member WHERE group_id = $group ORDER BY joined_at ASC"
        );
        let mut response = execute!(self.db.query(&query).bind(("group", group_key.to_owned())))
            .await
            .context("Listing group members")?;
        Ok(response.take::<Vec<Membership>>(0)?)
    }

    pub async fn remove_member(&self, student_key: &str) -> Result<(), DatabaseError> {
        let query = format!("DELETE {}", ResourceGuard::record(GROUP_MEMBER, student_key));
        execute!(self.db.query(&query)).await.context("Removing group member")?;
        Ok(())
    }
}
