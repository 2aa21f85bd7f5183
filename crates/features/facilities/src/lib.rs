//! Facilities feature slice: rooms.

mod error;
mod handlers;
pub mod model;
pub mod repository;
mod router;
pub mod service;

pub use crate::error::{FacilitiesError, FacilitiesErrorExt};
pub use crate::router::router;
use crate::repository::RoomRepository;
use crate::service::RoomService;
use ogs_database::Database;

/// Facilities feature state.
#[ogs_derive::ogs_slice]
pub struct Facilities {
    pub rooms: RoomService,
}

/// Initialize the facilities feature.
pub fn init(database: &Database) -> Result<Facilities, FacilitiesError> {
    tracing::info!("Facilities slice initialized");

    let rooms = RoomService::new(RoomRepository::new(database.clone()));
    Ok(Facilities::new(FacilitiesInner { rooms }))
}
