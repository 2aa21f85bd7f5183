//! Active feature slice: daily sessions of activities, their supervisors and the
//! students checked into them.

mod error;
mod handlers;
pub mod model;
pub mod repository;
mod router;
pub mod service;

pub use crate::error::{ActiveError, ActiveErrorExt};
pub use crate::router::router;
use crate::repository::{SessionRepository, SupervisionRepository, VisitRepository};
use crate::service::{SessionService, SupervisionService, VisitService};
use ogs_activities::Activities;
use ogs_database::Database;
use ogs_facilities::Facilities;
use ogs_users::Users;

/// Active feature state.
#[ogs_derive::ogs_slice]
pub struct Active {
    pub sessions: SessionService,
    pub supervision: SupervisionService,
    pub visits: VisitService,
}

/// Initialize the active feature.
pub fn init(
    database: &Database,
    facilities: &Facilities,
    activities: &Activities,
    users: &Users,
) -> Result<Active, ActiveError> {
    tracing::info!("Active slice initialized");

    let sessions = SessionService::new(
        SessionRepository::new(database.clone()),
        activities.activities.clone(),
        facilities.rooms.clone(),
    );
    let supervision = SupervisionService::new(
        SupervisionRepository::new(database.clone()),
        sessions.clone(),
        users.staff.clone(),
    );
    let visits = VisitService::new(
        VisitRepository::new(database.clone()),
        sessions.clone(),
        activities.activities.clone(),
        users.persons.clone(),
        users.students.clone(),
    );

    Ok(Active::new(ActiveInner { sessions, supervision, visits }))
}
