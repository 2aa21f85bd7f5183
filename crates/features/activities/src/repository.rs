use crate::model::{
    Activity, Category, CreateActivityRequest, CreateCategoryRequest, UpdateActivityRequest,
};
use ogs_database::{Database, DatabaseError, DatabaseErrorExt, execute};
use ogs_kernel::domain::constants::{ACTIVITY, CATEGORY};
use ogs_kernel::safe_nanoid;
use ogs_kernel::security::resource::ResourceGuard;
use ogs_kernel::time::now_millis;
use tracing::{debug, instrument};

const CATEGORY_FIELDS: &str = "id.id() AS id, name, description, color, created_at";
const ACTIVITY_FIELDS: &str = "id.id() AS id, name, category_id, max_participants, is_open, \
                               planned_room_id, weekdays, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: Database,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self, category), fields(name = %category.name))]
    pub async fn create(&self, category: &CreateCategoryRequest) -> Result<Category, DatabaseError> {
        let key = safe_nanoid!();
        let query = format!(
            "CREATE {} SET name = $name, description = $description, color = $color, \
             created_at = $now",
            ResourceGuard::record(CATEGORY, &key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("name", category.name.clone()))
                .bind(("description", category.description.clone()))
                .bind(("color", category.color.clone()))
                .bind(("now", now_millis()))
        )
        .await
        .context("Creating category")?;

        debug!(%key, "Category created");
        self.get(&key).await?.ok_or_else(|| "Created category vanished".into())
    }

    pub async fn get(&self, key: &str) -> Result<Option<Category>, DatabaseError> {
        let query =
            format!("SELECT {CATEGORY_FIELDS} FROM {}", ResourceGuard::record(CATEGORY, key));
        let mut response = execute!(self.db.query(&query)).await.context("Loading category")?;
        Ok(response.take::<Vec<Category>>(0)?.into_iter().next())
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DatabaseError> {
        let query = format!("SELECT {CATEGORY_FIELDS} FROM category WHERE name = $name LIMIT 1");
        let mut response = execute!(self.db.query(&query).bind(("name", name.to_owned())))
            .await
            .context("Finding category by name")?;
        Ok(response.take::<Vec<Category>>(0)?.into_iter().next())
    }

    pub async fn list(&self) -> Result<Vec<Category>, DatabaseError> {
        let query = format!("SELECT {CATEGORY_FIELDS} FROM category ORDER BY name ASC");
        let mut response = execute!(self.db.query(&query)).await.context("Listing categories")?;
        Ok(response.take::<Vec<Category>>(0)?)
    }

    pub async fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!("DELETE {}", ResourceGuard::record(CATEGORY, key));
        execute!(self.db.query(&query)).await.context("Deleting category")?;
        Ok(())
    }
}

/// `SurrealQL` persistence for the `activity` table.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    db: Database,
}

impl ActivityRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts an activity; a taken `(category, name)` pair is a conflict.
    #[instrument(skip(self, activity), fields(name = %activity.name))]
    pub async fn create(&self, activity: &CreateActivityRequest) -> Result<Activity, DatabaseError> {
        let key = safe_nanoid!();
        let query = format!(
            "CREATE {} SET name = $name, category_id = $category_id, \
             max_participants = $max_participants, is_open = $is_open, \
             planned_room_id = $planned_room_id, weekdays = $weekdays, \
             created_at = $now, updated_at = $now",
            ResourceGuard::record(ACTIVITY, &key),
        );

        execute!(
            self.db
                .query(&query)
                .bind(("name", activity.name.clone()))
                .bind(("category_id", activity.category_id.clone()))
                .bind(("max_participants", activity.max_participants))
                .bind(("is_open", activity.is_open))
                .bind(("planned_room_id", activity.planned_room_id.clone()))
                .bind(("weekdays", i64::from(activity.weekdays.bits())))
                .bind(("now", now_millis()))
        )
        .await
        .context("Creating activity")?;

        debug!(%key, "Activity created");
        self.get(&key).await?.ok_or_else(|| "Created activity vanished".into())
    }

    pub async fn get(&self, key: &str) -> Result<Option<Activity>, DatabaseError> {
        let query =
            format!("SELECT {ACTIVITY_FIELDS} FROM {}", ResourceGuard::record(ACTIVITY, key));
        let mut response = execute!(self.db.query(&query)).await.context("Loading activity")?;
        Ok(response.take::<Vec<Activity>>(0)?.into_iter().next())
    }

    pub async fn find(&self, category_id: &str, name: &str) -> Result<Option<Activity>, DatabaseError> {
        let query = format!(
            "SELECT {ACTIVITY_FIELDS} FROM activity \
             WHERE category_id = $category_id AND name = $name LIMIT 1"
        );
        let mut response = execute!(
            self.db
                .query(&query)
                .bind(("category_id", category_id.to_owned()))
                .bind(("name", name.to_owned()))
        )
        .await
        .context("Finding activity")?;
        Ok(response.take::<Vec<Activity>>(0)?.into_iter().next())
    }

    pub async fn list(&self, category_id: Option<&str>) -> Result<Vec<Activity>, DatabaseError> {
        let clause = if category_id.is_some() { " WHERE category_id = $category_id" } else { "" };
        let query = format!("SELECT {ACTIVITY_FIELDS} FROM activity{clause} ORDER BY name ASC");
        let mut response = execute!(
            self.db.query(&query).bind(("category_id", category_id.map(str::to_owned)))
        )
        .await
        .context("Listing activities")?;
        Ok(response.take::<Vec<Activity>>(0)?)
    }

    pub async fn count_in_category(&self, category_id: &str) -> Result<i64, DatabaseError> {
        let query = "RETURN count((SELECT VALUE id FROM activity WHERE category_id = $category_id))";
        let mut response =
            execute!(self.db.query(query).bind(("category_id", category_id.to_owned())))
                .await
                .context("Counting activities")?;
        Ok(response.take::<Option<i64>>(0)?.unwrap_or_default())
    }

    pub async fn update(
        &self,
        key: &str,
        changes: &UpdateActivityRequest,
    ) -> Result<(), DatabaseError> {
        let mut sets = vec!["updated_at = $now"];
        if changes.name.is_some() {
            sets.push("name = $name");
        }
        if changes.max_participants.is_some() {
            sets.push("max_participants = $max_participants");
        }
        if changes.is_open.is_some() {
            sets.push("is_open = $is_open");
        }
        if changes.planned_room_id.is_some() {
            sets.push("planned_room_id = $planned_room_id");
        }
        if changes.weekdays.is_some() {
            sets.push("weekdays = $weekdays");
        }
        let query =
            format!("UPDATE {} SET {}", ResourceGuard::record(ACTIVITY, key), sets.join(", "));

        execute!(
            self.db
                .query(&query)
                .bind(("name", changes.name.clone()))
                .bind(("max_participants", changes.max_participants))
                .bind(("is_open", changes.is_open))
                .bind(("planned_room_id", changes.planned_room_id.clone()))
                .bind(("weekdays", changes.weekdays.map(|w| i64::from(w.bits()))))
                .bind(("now", now_millis()))
        )
        .await
        .context("Updating activity")?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        let query = format!("DELETE {}", ResourceGuard::record(ACTIVITY, key));
        execute!(self.db.query(&query)).await.context("Deleting activity")?;
        Ok(())
    }
}
