use crate::error::{ActivitiesError, ActivitiesErrorExt};
use crate::model::{
    Activity, ActivityQuery, Category, CreateActivityRequest, CreateCategoryRequest,
    UpdateActivityRequest,
};
use crate::repository::{ActivityRepository, CategoryRepository};
use ogs_facilities::service::RoomService;
use ogs_kernel::prelude::*;
use tracing::info;

/// Business rules for activity categories.
#[derive(Debug, Clone)]
pub struct CategoryService {
    repo: CategoryRepository,
    activities: ActivityRepository,
}

impl CategoryService {
    #[must_use]
    pub const fn new(repo: CategoryRepository, activities: ActivityRepository) -> Self {
        Self { repo, activities }
    }

    pub async fn create(&self, request: CreateCategoryRequest) -> Result<Category, ActivitiesError> {
        let request = request.validate()?;
        match self.repo.create(&request).await {
            Ok(category) => {
                info!(category_id = %category.id, name = %category.name, "Category created");
                Ok(category)
            },
            Err(err) if err.is_conflict() => Err(ActivitiesError::conflict(format!(
                "a category named '{}' already exists",
                request.name
            ))),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Category, ActivitiesError> {
        let key = ResourceGuard::key(id, CATEGORY)?;
        self.repo.get(&key).await?.ok_or_else(|| ActivitiesError::not_found("category", &key))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, ActivitiesError> {
        self.repo.find_by_name(name.trim()).await.context("Finding category by name")
    }

    pub async fn list(&self) -> Result<Vec<Category>, ActivitiesError> {
        self.repo.list().await.context("Listing categories")
    }

    /// Deletes a category no activity belongs to.
    pub async fn delete(&self, id: &str) -> Result<(), ActivitiesError> {
        let category = self.get(id).await?;
        let in_use = self.activities.count_in_category(&category.id).await?;
        if in_use > 0 {
            return Err(ActivitiesError::conflict(format!(
                "category '{}' is used by {in_use} activities",
                category.name
            )));
        }

        self.repo.delete(&category.id).await.context("Deleting category")?;
        info!(category_id = %category.id, "Category deleted");
        Ok(())
    }

    /// Find-or-create by name.
    pub async fn ensure(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<Ensured<Category>, ActivitiesError> {
        let request = request.validate()?;
        let category = find_or_create(
            "category",
            || self.repo.find_by_name(&request.name),
            || self.repo.create(&request),
        )
        .await
        .context("Ensuring category")?;

        if category.created {
            let value = &category.value;
            info!(category_id = %value.id, name = %value.name, "Category provisioned");
        }
        Ok(category)
    }
}

/// Business rules for scheduled activities.
#[derive(Debug, Clone)]
pub struct ActivityService {
    repo: ActivityRepository,
    categories: CategoryRepository,
    rooms: RoomService,
}

impl ActivityService {
    #[must_use]
    pub const fn new(
        repo: ActivityRepository,
        categories: CategoryRepository,
        rooms: RoomService,
    ) -> Self {
        Self { repo, categories, rooms }
    }

    /// Checks the references of a new activity and stores them as bare keys.
    async fn resolve(
        &self,
        mut request: CreateActivityRequest,
    ) -> Result<CreateActivityRequest, ActivitiesError> {
        let category_key = ResourceGuard::key(&request.category_id, CATEGORY)?;
        if self.categories.get(&category_key).await?.is_none() {
            return Err(ActivitiesError::not_found("category", &category_key));
        }
        request.category_id = category_key;

        if let Some(room_id) = request.planned_room_id.as_deref() {
            let room = self.rooms.get(room_id).await.context("Resolving planned room")?;
            request.planned_room_id = Some(room.id);
        }
        Ok(request)
    }

    pub async fn create(&self, request: CreateActivityRequest) -> Result<Activity, ActivitiesError> {
        let request = self.resolve(request.validate()?).await?;
        match self.repo.create(&request).await {
            Ok(activity) => {
                info!(activity_id = %activity.id, name = %activity.name, "Activity created");
                Ok(activity)
            },
            Err(err) if err.is_conflict() => Err(ActivitiesError::conflict(format!(
                "activity '{}' already exists in this category",
                request.name
            ))),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Activity, ActivitiesError> {
        let key = ResourceGuard::key(id, ACTIVITY)?;
        self.repo.get(&key).await?.ok_or_else(|| ActivitiesError::not_found("activity", &key))
    }

    pub async fn find(
        &self,
        category_id: &str,
        name: &str,
    ) -> Result<Option<Activity>, ActivitiesError> {
        let category_key = ResourceGuard::key(category_id, CATEGORY)?;
        self.repo.find(&category_key, name.trim()).await.context("Finding activity")
    }

    /// Activities ordered by name, optionally limited to a category and a weekday.
    pub async fn list(&self, filter: &ActivityQuery) -> Result<Vec<Activity>, ActivitiesError> {
        let weekdays = filter.weekdays()?;
        let category_key = filter
            .category_id
            .as_deref()
            .map(|id| ResourceGuard::key(id, CATEGORY))
            .transpose()?;

        let activities =
            self.repo.list(category_key.as_deref()).await.context("Listing activities")?;
        Ok(match weekdays {
            Some(days) => activities.into_iter().filter(|a| a.schedule().intersects(days)).collect(),
            None => activities,
        })
    }

    pub async fn update(
        &self,
        id: &str,
        changes: UpdateActivityRequest,
    ) -> Result<Activity, ActivitiesError> {
        let mut changes = changes.validate()?;
        let activity = self.get(id).await?;
        if let Some(room_id) = changes.planned_room_id.as_deref() {
            let room = self.rooms.get(room_id).await.context("Resolving planned room")?;
            changes.planned_room_id = Some(room.id);
        }

        match self.repo.update(&activity.id, &changes).await {
            Ok(()) => {},
            Err(err) if err.is_conflict() => {
                return Err(ActivitiesError::conflict(format!(
                    "activity '{}' already exists in this category",
                    changes.name.as_deref().unwrap_or(&activity.name)
                )));
            },
            Err(err) => return Err(err.into()),
        }

        self.get(&activity.id).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ActivitiesError> {
        let activity = self.get(id).await?;
        self.repo.delete(&activity.id).await.context("Deleting activity")?;
        info!(activity_id = %activity.id, "Activity deleted");
        Ok(())
    }

    /// Find-or-create by `(category, name)`.
    ///
    /// A concurrent caller that loses the creation race reads the winner's activity back.
    pub async fn ensure(
        &self,
        request: CreateActivityRequest,
    ) -> Result<Ensured<Activity>, ActivitiesError> {
        let request = self.resolve(request.validate()?).await?;
        let activity = find_or_create(
            "activity",
            || self.repo.find(&request.category_id, &request.name),
            || self.repo.create(&request),
        )
        .await
        .context("Ensuring activity")?;

        if activity.created {
            let value = &activity.value;
            info!(activity_id = %value.id, name = %value.name, "Activity provisioned");
        }
        Ok(activity)
    }
}
