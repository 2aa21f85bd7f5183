//! Users feature slice: persons, RFID tags, students and staff.

mod error;
mod handlers;
pub mod model;
pub mod repository;
mod router;
pub mod service;

pub use crate::error::{UsersError, UsersErrorExt};
pub use crate::router::router;
use crate::repository::{PersonRepository, StaffRepository, StudentRepository};
use crate::service::{PersonService, StaffService, StudentService};
use ogs_database::Database;

/// Users feature state.
#[ogs_derive::ogs_slice]
pub struct Users {
    pub persons: PersonService,
    pub students: StudentService,
    pub staff: StaffService,
}

/// Initialize the users feature.
pub fn init(database: &Database) -> Result<Users, UsersError> {
    tracing::info!("Users slice initialized");

    let student_repo = StudentRepository::new(database.clone());
    let staff_repo = StaffRepository::new(database.clone());
    let persons = PersonService::new(
        PersonRepository::new(database.clone()),
        student_repo.clone(),
        staff_repo.clone(),
    );

    Ok(Users::new(UsersInner {
        students: StudentService::new(student_repo, persons.clone()),
        staff: StaffService::new(staff_repo, persons.clone()),
        persons,
    }))
}
