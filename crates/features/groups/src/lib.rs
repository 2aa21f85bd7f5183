//! Groups feature slice: school groups and student membership.

mod error;
mod handlers;
pub mod model;
pub mod repository;
mod router;
pub mod service;

pub use crate::error::{GroupsError, GroupsErrorExt};
pub use crate::router::router;
use crate::repository::GroupRepository;
use crate::service::GroupService;
use ogs_database::Database;
use ogs_facilities::Facilities;
use ogs_users::Users;

/// Groups feature state.
#[ogs_derive::ogs_slice]
pub struct Groups {
    pub groups: GroupService,
}

/// Initialize the groups feature.
pub fn init(
    database: &Database,
    facilities: &Facilities,
    users: &Users,
) -> Result<Groups, GroupsError> {
    tracing::info!("Groups slice initialized");

    let groups = GroupService::new(
        GroupRepository::new(database.clone()),
        facilities.rooms.clone(),
        users.students.clone(),
    );
    Ok(Groups::new(GroupsInner { groups }))
}
