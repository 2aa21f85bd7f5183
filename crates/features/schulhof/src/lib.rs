//! Schulhof feature slice: ad-hoc schoolyard supervision on top of the active sessions.
//!
//! The room, category and activity are created on first use, so a fresh installation
//! needs no seeding before staff can start supervising.

mod error;
mod handlers;
pub mod model;
mod router;
pub mod service;

pub use crate::error::{SchulhofError, SchulhofErrorExt};
pub use crate::router::router;
use crate::service::{SchulhofDeps, SchulhofService};
use ogs_active::Active;
use ogs_activities::Activities;
use ogs_facilities::Facilities;
use ogs_kernel::domain::config::SchulhofConfig;
use ogs_users::Users;

/// Schulhof feature state.
#[ogs_derive::ogs_slice]
pub struct Schulhof {
    pub svc: SchulhofService,
}

/// Initialize the Schulhof feature.
pub fn init(
    config: &SchulhofConfig,
    facilities: &Facilities,
    activities: &Activities,
    active: &Active,
    users: &Users,
) -> Result<Schulhof, SchulhofError> {
    tracing::info!(room = %config.room_name, "Schulhof slice initialized");

    let deps = SchulhofDeps {
        rooms: facilities.rooms.clone(),
        categories: activities.categories.clone(),
        activities: activities.activities.clone(),
        sessions: active.sessions.clone(),
        supervision: active.supervision.clone(),
        visits: active.visits.clone(),
        staff: users.staff.clone(),
    };
    Ok(Schulhof::new(SchulhofInner { svc: SchulhofService::new(config.clone(), deps) }))
}
