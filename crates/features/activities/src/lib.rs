//! Activities feature slice: categories and weekly scheduled activities.

mod error;
mod handlers;
pub mod model;
pub mod repository;
mod router;
pub mod service;

pub use crate::error::{ActivitiesError, ActivitiesErrorExt};
pub use crate::router::router;
use crate::repository::{ActivityRepository, CategoryRepository};
use crate::service::{ActivityService, CategoryService};
use ogs_database::Database;
use ogs_facilities::Facilities;

/// Activities feature state.
#[ogs_derive::ogs_slice]
pub struct Activities {
    pub categories: CategoryService,
    pub activities: ActivityService,
}

/// Initialize the activities feature on top of the facilities slice.
pub fn init(database: &Database, facilities: &Facilities) -> Result<Activities, ActivitiesError> {
    tracing::info!("Activities slice initialized");

    let categories = CategoryRepository::new(database.clone());
    let activities = ActivityRepository::new(database.clone());

    Ok(Activities::new(ActivitiesInner {
        categories: CategoryService::new(categories.clone(), activities.clone()),
        activities: ActivityService::new(activities, categories, facilities.rooms.clone()),
    }))
}
