use crate::model::{CreatePersonRequest, Person, UpdatePersonRequest};
use ogs_database::{Database, DatabaseError, DatabaseErrorExt, SurrealValue, execute};
use ogs_kernel::domain::constants::{PERSON, RFID_CARD, STAFF, STUDENT};
use ogs_kernel::safe_nanoid;
use ogs_kernel::security::resource::ResourceGuard;
use ogs_kernel::time::now_millis;
use tracing::{debug, instrument};

const PERSON_FIELDS: &str = "id.id() AS id, first_name, last_name, tag_id, created_at, updated_at";
const STUDENT_FIELDS: &str =
    "id.id() AS id, person_id, school_class, guardian_name, guardian_contact, created_at";
const STAFF_FIELDS: &str = "id.id() AS id, person_id, position, created_at";

/// Stored `student` row; names live on the person.
#[derive(Debug, Clone, SurrealValue)]
pub struct StudentRecord {
    pub id: String,
    pub person_id: String,
    pub school_class: String,
    pub guardian_name: Option<String>,
    pub guardian_contact: Option<String>,
    pub created_at: i64,
}

/// Stored `staff` row; names live on the person.
#[derive(Debug, Clone, SurrealValue)]
pub struct StaffRecord {
    pub id: String,
    pub person_id: String,
    pub position: Option<String>,
    pub created_at: i64,
}

/// An RFID card, keyed by its normalized tag.
#[derive(Debug, Clone, SurrealValue)]
pub struct RfidCard {
    pub id: String,
    pub person_id: String,
    pub assigned_at: i64,
}

/// Renders `FROM` targets for a batch of keys (`person:⟨a⟩, person:⟨b⟩`).
fn targets(table: &str, keys: &[String]) -> String {
    keys.iter().map(|key| ResourceGuard::record(table, key)).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone)]
pub struct PersonRepository {
    db: Database,
}

impl PersonRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, person: &CreatePersonRequest) -> Result<Person, DatabaseError> {
        let key = safe_nanoid!();
        let query = format!(
            "CREATE {} SET first_name = $first_name, last_name = $last_name, \
             created_at = $now, updated_at = $now",
            ResourceGuard::record(PERSON, &key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("first_name", person.first_name.clone()))
                .bind(("last_name", person.last_name.clone()))
                .bind(("now", now_millis()))
        )
        .await
        .context("Creating person")?;

        self.get(&key).await?.ok_or_else(|| "Created person vanished".into())
    }

    pub async fn get(&self, key: &str) -> Result<Option<Person>, DatabaseError> {
        let query = format!("SELECT {PERSON_FIELDS} FROM {}", ResourceGuard::record(PERSON, key));
        let mut response = execute!(self.db.query(&query)).await.context("Loading person")?;
        Ok(response.take::<Vec<Person>>(0)?.into_iter().next())
    }

    /// Loads several persons at once; unknown keys are skipped.
    pub async fn get_many(&self, keys: &[String]) -> Result<Vec<Person>, DatabaseError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {PERSON_FIELDS} FROM {}", targets(PERSON, keys));
        let mut response = execute!(self.db.query(&query)).await.context("Loading persons")?;
        Ok(response.take::<Vec<Person>>(0)?)
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Person>, DatabaseError> {
        let clause = if search.is_some() {
            " WHERE string::contains(string::lowercase(first_name), $search) \
              OR string::contains(string::lowercase(last_name), $search)"
        } else {
            ""
        };
        let query = format!(
            "SELECT {PERSON_FIELDS} FROM person{clause} ORDER BY last_name ASC, first_name ASC"
        );

        let mut response = execute!(
            self.db.query(&query).bind(("search", search.map(str::to_lowercase)))
        )
        .await
        .context("Listing persons")?;
        Ok(response.take::<Vec<Person>>(0)?)
    }

    pub async fn update(&self, key: &str, changes: &UpdatePersonRequest) -> Result<(), DatabaseError> {
        let mut sets = vec!["updated_at = $now"];
        if changes.first_name.is_some() {
            sets.push("first_name = $first_name");
        }
        if changes.last_name.is_some() {
            sets.push("last_name = $last_name");
        }
        let query =
            format!("UPDATE {} SET {}", ResourceGuard::record(PERSON, key), sets.join(", "));

        execute!(
            self.db
                .query(&query)
                .bind(("first_name", changes.first_name.clone()))
                .bind(("last_name", changes.last_name.clone()))
                .bind(("now", now_millis()))
        )
        .await
        .context("Updating person")?;
        Ok(())
    }

    /// Removes the person together with their RFID card.
    pub async fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            DELETE rfid_card WHERE person_id = $person;
            DELETE {};
            COMMIT TRANSACTION;",
            ResourceGuard::record(PERSON, key),
        );
        execute!(self.db.query(&query).bind(("person", key.to_owned())))
            .await
            .context("Deleting person")?;
        Ok(())
    }

    pub async fn card(&self, tag: &str) -> Result<Option<RfidCard>, DatabaseError> {
        let query = format!(
            "SELECT id.id() AS id, person_id, assigned_at FROM {}",
            ResourceGuard::record(RFID_CARD, tag),
        );
        let mut response = execute!(self.db.query(&query)).await.context("Loading RFID card")?;
        Ok(response.take::<Vec<RfidCard>>(0)?.into_iter().next())
    }

    /// Gives `tag` to the person and releases their previous card in one transaction.
    ///
    /// The card is created first so a tag taken concurrently fails the transaction with a conflict.
    #[instrument(skip(self))]
    pub async fn assign_tag(&self, key: &str, tag: &str) -> Result<(), DatabaseError> {
        let card = ResourceGuard::record(RFID_CARD, tag);
        let query = format!(
            "BEGIN TRANSACTION;
            CREATE {card} SET person_id = $person, assigned_at = $now;
            DELETE rfid_card WHERE person_id = $person AND id != {card};
            UPDATE {} SET tag_id = $tag, updated_at = $now;
            COMMIT TRANSACTION;",
            ResourceGuard::record(PERSON, key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("person", key.to_owned()))
                .bind(("tag", tag.to_owned()))
                .bind(("now", now_millis()))
        )
        .await
        .context("Assigning RFID tag")?;

        debug!("RFID tag assigned");
        Ok(())
    }

    pub async fn unassign_tag(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            DELETE rfid_card WHERE person_id = $person;
            UPDATE {} SET tag_id = NONE, updated_at = $now;
            COMMIT TRANSACTION;",
            ResourceGuard::record(PERSON, key),
        );

        execute!(
            self.db.query(&query).bind(("person", key.to_owned())).bind(("now", now_millis()))
        )
        .await
        .context("Releasing RFID tag")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StudentRepository {
    db: Database,
}

impl StudentRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        person_id: &str,
        school_class: &str,
        guardian_name: Option<&str>,
        guardian_contact: Option<&str>,
    ) -> Result<StudentRecord, DatabaseError> {
        let key = safe_nanoid!();
        let mut sets = vec![
            "person_id = $person_id",
            "school_class = $school_class",
            "created_at = $now",
        ];
        if guardian_name.is_some() {
            sets.push("guardian_name = $guardian_name");
        }
        if guardian_contact.is_some() {
            sets.push("guardian_contact = $guardian_contact");
        }
        let query =
            format!("CREATE {} SET {}", ResourceGuard::record(STUDENT, &key), sets.join(", "));

        execute!(
            self.db
                .query(&query)
                .bind(("person_id", person_id.to_owned()))
                .bind(("school_class", school_class.to_owned()))
                .bind(("guardian_name", guardian_name.map(str::to_owned)))
                .bind(("guardian_contact", guardian_contact.map(str::to_owned)))
                .bind(("now", now_millis()))
        )
        .await
        .context("Creating student")?;

        self.get(&key).await?.ok_or_else(|| "Created student vanished".into())
    }

    pub async fn get(&self, key: &str) -> Result<Option<StudentRecord>, DatabaseError> {
        let query =
            format!("SELECT {STUDENT_FIELDS} FROM {}", ResourceGuard::record(STUDENT, key));
        let mut response = execute!(self.db.query(&query)).await.context("Loading student")?;
        Ok(response.take::<Vec<StudentRecord>>(0)?.into_iter().next())
    }

    pub async fn get_many(&self, keys: &[String]) -> Result<Vec<StudentRecord>, DatabaseError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {STUDENT_FIELDS} FROM {}", targets(STUDENT, keys));
        let mut response = execute!(self.db.query(&query)).await.context("Loading students")?;
        Ok(response.take::<Vec<StudentRecord>>(0)?)
    }

    pub async fn find_by_person(
        &self,
        person_id: &str,
    ) -> Result<Option<StudentRecord>, DatabaseError> {
        let query = format!("SELECT {STUDENT_FIELDS} FROM student WHERE person_id = $person LIMIT 1");
        let mut response = execute!(self.db.query(&query).bind(("person", person_id.to_owned())))
            .await
            .context("Finding student by person")?;
        Ok(response.take::<Vec<StudentRecord>>(0)?.into_iter().next())
    }

    pub async fn list(&self, school_class: Option<&str>) -> Result<Vec<StudentRecord>, DatabaseError> {
        let clause = if school_class.is_some() { " WHERE school_class = $school_class" } else { "" };
        let query = format!("SELECT {STUDENT_FIELDS} FROM student{clause} ORDER BY created_at ASC");
        let mut response = execute!(
            self.db.query(&query).bind(("school_class", school_class.map(str::to_owned)))
        )
        .await
        .context("Listing students")?;
        Ok(response.take::<Vec<StudentRecord>>(0)?)
    }

    pub async fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!("DELETE {}", ResourceGuard::record(STUDENT, key));
        execute!(self.db.query(&query)).await.context("Deleting student")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StaffRepository {
    db: Database,
}

impl StaffRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        person_id: &str,
        position: Option<&str>,
    ) -> Result<StaffRecord, DatabaseError> {
        let key = safe_nanoid!();
        let position_set = if position.is_some() { ", position = $position" } else { "" };
        let query = format!(
            "CREATE {} SET person_id = $person_id, created_at = $now{position_set}",
            ResourceGuard::record(STAFF, &key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("person_id", person_id.to_owned()))
                .bind(("position", position.map(str::to_owned)))
                .bind(("now", now_millis()))
        )
        .await
        .context("Creating staff")?;

        self.get(&key).await?.ok_or_else(|| "Created staff vanished".into())
    }

    pub async fn get(&self, key: &str) -> Result<Option<StaffRecord>, DatabaseError> {
        let query = format!("SELECT {STAFF_FIELDS} FROM {}", ResourceGuard::record(STAFF, key));
        let mut response = execute!(self.db.query(&query)).await.context("Loading staff")?;
        Ok(response.take::<Vec<StaffRecord>>(0)?.into_iter().next())
    }

    pub async fn get_many(&self, keys: &[String]) -> Result<Vec<StaffRecord>, DatabaseError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {STAFF_FIELDS} FROM {}", targets(STAFF, keys));
        let mut response = execute!(self.db.query(&query)).await.context("Loading staff")?;
        Ok(response.take::<Vec<StaffRecord>>(0)?)
    }

    pub async fn find_by_person(
        &self,
        person_id: &str,
    ) -> Result<Option<StaffRecord>, DatabaseError> {
        let query = format!("SELECT {STAFF_FIELDS} FROM staff WHERE person_id = $person LIMIT 1");
        let mut response = execute!(self.db.query(&query).bind(("person", person_id.to_owned())))
            .await
            .context("Finding staff by person")?;
        Ok(response.take::<Vec<StaffRecord>>(0)?.into_iter().next())
    }

    pub async fn list(&self) -> Result<Vec<StaffRecord>, DatabaseError> {
        let query = format!("SELECT {STAFF_FIELDS} FROM staff ORDER BY created_at ASC");
        let mut response = execute!(self.db.query(&query)).await.context("Listing staff")?;
        Ok(response.take::<Vec<StaffRecord>>(0)?)
    }

    pub async fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!("DELETE {}", ResourceGuard::record(STAFF, key));
        execute!(self.db.query(&query)).await.context("Deleting staff")?;
        Ok(())
    }
}
