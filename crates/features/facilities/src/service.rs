use crate::error::{FacilitiesError, FacilitiesErrorExt};
use crate::model::{CreateRoomRequest, Room, RoomQuery, UpdateRoomRequest};
use crate::repository::RoomRepository;
use ogs_kernel::domain::constants::ROOM;
use ogs_kernel::ensure::{Ensured, find_or_create};
use ogs_kernel::security::resource::ResourceGuard;
use tracing::info;

/// Business rules for rooms.
#[derive(Debug, Clone)]
pub struct RoomService {
    repo: RoomRepository,
}

impl RoomService {
    #[must_use]
    pub const fn new(repo: RoomRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, request: CreateRoomRequest) -> Result<Room, FacilitiesError> {
        let request = request.validate()?;
        match self.repo.create(&request).await {
            Ok(room) => {
                info!(room_id = %room.id, name = %room.name, "Room created");
                Ok(room)
            },
            Err(err) if err.is_conflict() => Err(FacilitiesError::Conflict {
                message: format!("a room named '{}' already exists", request.name).into(),
                context: None,
            }),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Room, FacilitiesError> {
        let key = ResourceGuard::key(id, ROOM)?;
        self.repo.get(&key).await?.ok_or_else(|| FacilitiesError::not_found(&key))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Room>, FacilitiesError> {
        self.repo.find_by_name(name.trim()).await.context("Finding room by name")
    }

    pub async fn list(&self, filter: &RoomQuery) -> Result<Vec<Room>, FacilitiesError> {
        self.repo.list(filter).await.context("Listing rooms")
    }

    pub async fn update(
        &self,
        id: &str,
        changes: UpdateRoomRequest,
    ) -> Result<Room, FacilitiesError> {
        let changes = changes.validate()?;
        let room = self.get(id).await?;

        match self.repo.update(&room.id, &changes).await {
            Ok(()) => {},
            Err(err) if err.is_conflict() => {
                return Err(FacilitiesError::Conflict {
                    message: format!(
                        "a room named '{}' already exists",
                        changes.name.as_deref().unwrap_or(&room.name)
                    )
                    .into(),
                    context: None,
                });
            },
            Err(err) => return Err(err.into()),
        }

        self.get(&room.id).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), FacilitiesError> {
        let room = self.get(id).await?;
        self.repo.delete(&room.id).await.context("Deleting room")?;
        info!(room_id = %room.id, "Room deleted");
        Ok(())
    }

    /// Find-or-create by name.
    ///
    /// A concurrent caller that loses the creation race reads the winner's room back.
    pub async fn ensure(
        &self,
        request: CreateRoomRequest,
    ) -> Result<Ensured<Room>, FacilitiesError> {
        let request = request.validate()?;
        let room = find_or_create(
            "room",
            || self.repo.find_by_name(&request.name),
            || self.repo.create(&request),
        )
        .await
        .context("Ensuring room")?;

        if room.created {
            info!(room_id = %room.value.id, name = %room.value.name, "Room provisioned");
        }
        Ok(room)
    }
}
