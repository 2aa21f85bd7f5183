//! Feedback feature slice.

mod error;
mod handlers;
pub mod model;
pub mod repository;
mod router;
pub mod service;

pub use crate::error::{FeedbackError, FeedbackErrorExt};
pub use crate::router::router;
use crate::repository::FeedbackRepository;
use crate::service::FeedbackService;
use ogs_database::Database;
use ogs_users::Users;

/// Feedback feature state.
#[ogs_derive::ogs_slice]
pub struct Feedback {
    pub entries: FeedbackService,
}

/// Initialize the feedback feature.
pub fn init(database: &Database, users: &Users) -> Result<Feedback, FeedbackError> {
    tracing::info!("Feedback slice initialized");

    let entries =
        FeedbackService::new(FeedbackRepository::new(database.clone()), users.students.clone());
    Ok(Feedback::new(FeedbackInner { entries }))
}
