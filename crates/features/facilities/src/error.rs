use ogs_database::DatabaseError;
use ogs_kernel::security::resource::ResourceGuardError;
use ogs_kernel::server::ApiError;
use std::borrow::Cow;

/// A specialized [`FacilitiesError`] enum of this crate.
#[ogs_derive::ogs_error]
pub enum FacilitiesError {
    #[error("Invalid room{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Room not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Room conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Rejected room id{}: {source}", format_context(.context))]
    Id { source: ResourceGuardError, context: Option<Cow<'static, str>> },

    #[error("Room storage error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Internal facilities error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl FacilitiesError {
    pub(crate) fn not_found(id: &str) -> Self {
        Self::NotFound { message: id.to_owned().into(), context: None }
    }
}

impl From<FacilitiesError> for ApiError {
    fn from(err: FacilitiesError) -> Self {
        let message = err.to_string();
        match err {
            FacilitiesError::Validation { .. } | FacilitiesError::Id { .. } => {
                Self::bad_request(message)
            },
            FacilitiesError::NotFound { .. } => Self::not_found(message),
            FacilitiesError::Conflict { .. } => Self::conflict(message),
            FacilitiesError::Database { source, .. } if source.is_conflict() => {
                Self::conflict(message)
            },
            FacilitiesError::Database { .. } | FacilitiesError::Internal { .. } => {
                Self::internal(message)
            },
        }
    }
}
