use crate::error::{SchulhofError, SchulhofErrorExt};
use crate::model::{
    SchulhofInfrastructure, SchulhofStatus, SupervisionAction, SupervisionOutcome,
};
use ogs_active::model::ActiveGroup;
use ogs_active::service::{SessionService, SupervisionService, VisitService};
use ogs_activities::model::{Activity, CreateActivityRequest, CreateCategoryRequest};
use ogs_activities::service::{ActivityService, CategoryService};
use ogs_facilities::model::{CreateRoomRequest, Room};
use ogs_facilities::service::RoomService;
use ogs_kernel::domain::config::SchulhofConfig;
use ogs_kernel::domain::schedule::Weekdays;
use ogs_kernel::prelude::*;
use ogs_users::service::StaffService;
use tracing::{debug, info, instrument};

/// Collaborators from the other slices.
#[derive(Debug, Clone)]
pub struct SchulhofDeps {
    pub rooms: RoomService,
    pub categories: CategoryService,
    pub activities: ActivityService,
    pub sessions: SessionService,
    pub supervision: SupervisionService,
    pub visits: VisitService,
    pub staff: StaffService,
}

/// Lazily provisioned schoolyard supervision.
#[derive(Debug, Clone)]
pub struct SchulhofService {
    config: SchulhofConfig,
    deps: SchulhofDeps,
}

impl SchulhofService {
    #[must_use]
    pub const fn new(config: SchulhofConfig, deps: SchulhofDeps) -> Self {
        Self { config, deps }
    }

    /// Find-or-create the Schulhof room, category and activity.
    #[instrument(skip(self))]
    pub async fn ensure_infrastructure(&self) -> Result<SchulhofInfrastructure, SchulhofError> {
        let cfg = &self.config;

        let room = self
            .deps
            .rooms
            .ensure(CreateRoomRequest {
                name: cfg.room_name.clone(),
                building: Some(cfg.building.clone()),
                floor: None,
                capacity: i64::from(cfg.capacity),
                category: cfg.room_category.clone(),
                color: Some(cfg.category_color.clone()),
            })
            .await
            .context("Provisioning Schulhof room")?;

        let category = self
            .deps
            .categories
            .ensure(CreateCategoryRequest {
                name: cfg.category_name.clone(),
                description: Some("Ad-hoc supervision of the schoolyard".to_owned()),
                color: Some(cfg.category_color.clone()),
            })
            .await
            .context("Provisioning Schulhof category")?;

        let activity = self
            .deps
            .activities
            .ensure(CreateActivityRequest {
                name: cfg.activity_name.clone(),
                category_id: category.value.id.clone(),
                max_participants: i64::from(cfg.max_participants),
                is_open: true,
                planned_room_id: Some(room.value.id.clone()),
                weekdays: Weekdays::ALL,
            })
            .await
            .context("Provisioning Schulhof activity")?;

        if room.created || category.created || activity.created {
            info!(
                room_id = %room.value.id,
                category_id = %category.value.id,
                activity_id = %activity.value.id,
                "Schulhof infrastructure provisioned"
            );
        }

        Ok(SchulhofInfrastructure {
            room: room.into_inner(),
            category: category.into_inner(),
            activity: activity.into_inner(),
        })
    }

    /// Today's Schulhof session, opened if needed.
    pub async fn ensure_session(&self) -> Result<ActiveGroup, SchulhofError> {
        self.ensure_session_on(&today()).await
    }

    /// Opens (or reuses) the session of `day` after closing sessions left open on earlier days.
    pub async fn ensure_session_on(&self, day: &str) -> Result<ActiveGroup, SchulhofError> {
        let infra = self.ensure_infrastructure().await?;

        let closed = self.deps.sessions.close_stale(&infra.activity.id, day).await?;
        if !closed.is_empty() {
            info!(count = closed.len(), "Closed Schulhof sessions of earlier days");
        }

        let session = self
            .deps
            .sessions
            .start_on(&infra.activity.id, &infra.room.id, day)
            .await
            .context("Opening Schulhof session")?;
        if session.created {
            info!(active_group_id = %session.value.id, %day, "Schulhof session opened");
        }
        Ok(session.into_inner())
    }

    /// The provisioned room and activity, looked up without creating anything.
    async fn lookup(&self) -> Result<(Option<Room>, Option<Activity>), SchulhofError> {
        let room = self.deps.rooms.find_by_name(&self.config.room_name).await?;
        let Some(category) = self.deps.categories.find_by_name(&self.config.category_name).await?
        else {
            return Ok((room, None));
        };
        let activity =
            self.deps.activities.find(&category.id, &self.config.activity_name).await?;
        Ok((room, activity))
    }

    /// The open session of `day`, if the infrastructure exists.
    async fn open_session(&self, day: &str) -> Result<Option<ActiveGroup>, SchulhofError> {
        let (_, activity) = self.lookup().await?;
        let Some(activity) = activity else {
            return Ok(None);
        };
        let session = self.deps.sessions.find(&activity.id, day).await?;
        Ok(session.filter(ActiveGroup::is_open))
    }

    pub async fn status(&self, staff_id: Option<&str>) -> Result<SchulhofStatus, SchulhofError> {
        self.status_on(staff_id, &today()).await
    }

    /// Read-only view of the Schulhof on `day`.
    pub async fn status_on(
        &self,
        staff_id: Option<&str>,
        day: &str,
    ) -> Result<SchulhofStatus, SchulhofError> {
        let staff_key = staff_id.map(|id| ResourceGuard::key(id, STAFF)).transpose()?;
        let (room, activity) = self.lookup().await?;

        let mut status = SchulhofStatus {
            exists: room.is_some() && activity.is_some(),
            room_id: room.as_ref().map(|r| r.id.clone()),
            room_name: room.map_or_else(|| self.config.room_name.clone(), |r| r.name),
            activity_id: activity.as_ref().map(|a| a.id.clone()),
            active_group_id: None,
            is_user_supervising: false,
            supervisor_count: 0,
            student_count: 0,
            supervisors: Vec::new(),
        };

        let Some(activity) = activity else {
            return Ok(status);
        };
        let session = self.deps.sessions.find(&activity.id, day).await?;
        let Some(session) = session.filter(ActiveGroup::is_open) else {
            return Ok(status);
        };

        let supervisors = self.deps.supervision.supervisors(&session.id).await?;
        status.is_user_supervising =
            staff_key.is_some_and(|key| supervisors.iter().any(|s| s.staff_id == key));
        status.supervisor_count = supervisors.len();
        status.supervisors = supervisors;
        status.student_count = self.deps.visits.count_present(&session.id).await?;
        status.active_group_id = Some(session.id);
        Ok(status)
    }

    pub async fn toggle_supervision(
        &self,
        staff_id: &str,
        action: SupervisionAction,
    ) -> Result<SupervisionOutcome, SchulhofError> {
        self.toggle_supervision_on(staff_id, action, &today()).await
    }

    /// Starts or stops the staff member's supervision of the `day` session.
    #[instrument(skip(self))]
    pub async fn toggle_supervision_on(
        &self,
        staff_id: &str,
        action: SupervisionAction,
        day: &str,
    ) -> Result<SupervisionOutcome, SchulhofError> {
        let session = match action {
            SupervisionAction::Start => {
                let staff = self.deps.staff.get(staff_id).await.context("Resolving supervisor")?;
                let session = self.ensure_session_on(day).await?;
                self.deps.supervision.claim(&session.id, &staff.id).await?;
                info!(staff_id = %staff.id, active_group_id = %session.id, "Schulhof supervision started");
                session
            },
            SupervisionAction::Stop => {
                let session = self.open_session(day).await?.ok_or_else(|| SchulhofError::NotFound {
                    message: "no active Schulhof session".into(),
                    context: None,
                })?;
                self.deps.supervision.release(&session.id, staff_id).await?;
                info!(%staff_id, active_group_id = %session.id, "Schulhof supervision stopped");
                session
            },
        };

        let supervisors = self.deps.supervision.supervisors(&session.id).await?;
        let staff_key = ResourceGuard::key(staff_id, STAFF)?;
        let is_user_supervising = supervisors.iter().any(|s| s.staff_id == staff_key);
        debug!(supervisor_count = supervisors.len(), "Schulhof supervisors counted");

        Ok(SupervisionOutcome {
            action,
            active_group_id: session.id,
            supervisor_count: supervisors.len(),
            is_user_supervising,
        })
    }
}
