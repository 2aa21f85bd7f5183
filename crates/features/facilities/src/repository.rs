use crate::model::{CreateRoomRequest, Room, RoomQuery, UpdateRoomRequest};
use ogs_database::{Database, DatabaseError, DatabaseErrorExt, execute};
use ogs_kernel::domain::constants::ROOM;
use ogs_kernel::safe_nanoid;
use ogs_kernel::security::resource::ResourceGuard;
use ogs_kernel::time::now_millis;
use tracing::{debug, instrument};

const FIELDS: &str =
    "id.id() AS id, name, building, floor, capacity, category, color, created_at, updated_at";

/// `SurrealQL` persistence for the `room` table.
#[derive(Debug, Clone)]
pub struct RoomRepository {
    db: Database,
}

impl RoomRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts a room; a taken name surfaces as [`DatabaseError::Conflict`].
    #[instrument(skip(self, room), fields(name = %room.name))]
    pub async fn create(&self, room: &CreateRoomRequest) -> Result<Room, DatabaseError> {
        let key = safe_nanoid!();
        let now = now_millis();
        let query = format!(
            "CREATE {} SET name = $name, building = $building, floor = $floor, \
             capacity = $capacity, category = $category, color = $color, \
             created_at = $now, updated_at = $now",
            ResourceGuard::record(ROOM, &key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("name", room.name.clone()))
                .bind(("building", room.building.clone()))
                .bind(("floor", room.floor))
                .bind(("capacity", room.capacity))
                .bind(("category", room.category.clone()))
                .bind(("color", room.color.clone()))
                .bind(("now", now))
        )
        .await
        .context("Creating room")?;

        debug!(%key, "Room created");
        self.get(&key).await?.ok_or_else(|| "Created room vanished".into())
    }

    pub async fn get(&self, key: &str) -> Result<Option<Room>, DatabaseError> {
        let query = format!("SELECT {FIELDS} FROM {}", ResourceGuard::record(ROOM, key));
        let mut response = execute!(self.db.query(&query)).await.context("Loading room")?;
        Ok(response.take::<Vec<Room>>(0)?.into_iter().next())
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Room>, DatabaseError> {
        let query = format!("SELECT {FIELDS} FROM room WHERE name = $name LIMIT 1");
        let mut response = execute!(self.db.query(&query).bind(("name", name.to_owned())))
            .await
            .context("Finding room by name")?;
        Ok(response.take::<Vec<Room>>(0)?.into_iter().next())
    }

    pub async fn list(&self, filter: &RoomQuery) -> Result<Vec<Room>, DatabaseError> {
        let mut conditions = Vec::new();
        if filter.building.is_some() {
            conditions.push("building = $building");
        }
        if filter.category.is_some() {
            conditions.push("category = $category");
        }
        let clause =
            if conditions.is_empty() { String::new() } else { format!(" WHERE {}", conditions.join(" AND ")) };
        let query = format!("SELECT {FIELDS} FROM room{clause} ORDER BY name ASC");

        let mut response = execute!(
            self.db
                .query(&query)
                .bind(("building", filter.building.clone()))
                .bind(("category", filter.category.clone()))
        )
        .await
        .context("Listing rooms")?;
        Ok(response.take::<Vec<Room>>(0)?)
    }

    /// Applies the provided fields; renaming onto a taken name is a conflict.
    pub async fn update(&self, key: &str, changes: &UpdateRoomRequest) -> Result<(), DatabaseError> {
        let mut sets = vec!["updated_at = $now"];
        if changes.name.is_some() {
            sets.push("name = $name");
        }
        if changes.building.is_some() {
            sets.push("building = $building");
        }
        if changes.floor.is_some() {
            sets.push("floor = $floor");
        }
        if changes.capacity.is_some() {
            sets.push("capacity = $capacity");
        }
        if changes.category.is_some() {
            sets.push("category = $category");
        }
        if changes.color.is_some() {
            sets.push("color = $color");
        }
        let query =
            format!("UPDATE {} SET {}", ResourceGuard::record(ROOM, key), sets.join(", "));

        execute!(
            self.db
                .query(&query)
                .bind(("name", changes.name.clone()))
                .bind(("building", changes.building.clone()))
                .bind(("floor", changes.floor))
                .bind(("capacity", changes.capacity))
                .bind(("category", changes.category.clone()))
                .bind(("color", changes.color.clone()))
                .bind(("now", now_millis()))
        )
        .await
        .context("Updating room")?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!("DELETE {}", ResourceGuard::record(ROOM, key));
        execute!(self.db.query(&query)).await.context("Deleting room")?;
        Ok(())
    }
}
