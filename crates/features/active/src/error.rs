use ogs_activities::ActivitiesError;
use ogs_database::DatabaseError;
use ogs_facilities::FacilitiesError;
use ogs_kernel::security::resource::ResourceGuardError;
use ogs_kernel::server::ApiError;
use ogs_users::UsersError;
use std::borrow::Cow;

/// A specialized [`ActiveError`] enum of this crate.
#[ogs_derive::ogs_error]
pub enum ActiveError {
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Rejected id{}: {source}", format_context(.context))]
    Id { source: ResourceGuardError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Facilities { source: FacilitiesError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Activities { source: ActivitiesError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Users { source: UsersError, context: Option<Cow<'static, str>> },

    #[error("Attendance storage error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Internal attendance error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ActiveError {
    pub(crate) fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    pub(crate) fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict { message: message.into(), context: None }
    }

    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }
}

impl From<ActiveError> for ApiError {
    fn from(err: ActiveError) -> Self {
        let message = err.to_string();
        match err {
            ActiveError::Validation { .. } | ActiveError::Id { .. } => Self::bad_request(message),
            ActiveError::NotFound { .. } => Self::not_found(message),
            ActiveError::Conflict { .. } => Self::conflict(message),
            ActiveError::Facilities { source, .. } => source.into(),
            ActiveError::Activities { source, .. } => source.into(),
            ActiveError::Users { source, .. } => source.into(),
            ActiveError::Database { source, .. } if source.is_conflict() => Self::conflict(message),
            ActiveError::Database { .. } | ActiveError::Internal { .. } => Self::internal(message),
        }
    }
}
