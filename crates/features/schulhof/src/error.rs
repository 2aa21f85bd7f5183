use ogs_active::ActiveError;
use ogs_activities::ActivitiesError;
use ogs_facilities::FacilitiesError;
use ogs_kernel::security::resource::ResourceGuardError;
use ogs_kernel::server::ApiError;
use ogs_users::UsersError;
use std::borrow::Cow;

/// A specialized [`SchulhofError`] enum of this crate.
#[ogs_derive::ogs_error]
pub enum SchulhofError {
    #[error("Schulhof not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Rejected id{}: {source}", format_context(.context))]
    Id { source: ResourceGuardError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Facilities { source: FacilitiesError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Activities { source: ActivitiesError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Active { source: ActiveError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Users { source: UsersError, context: Option<Cow<'static, str>> },

    #[error("Internal Schulhof error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<SchulhofError> for ApiError {
    fn from(err: SchulhofError) -> Self {
        let message = err.to_string();
        match err {
            SchulhofError::Id { .. } => Self::bad_request(message),
            SchulhofError::NotFound { .. } => Self::not_found(message),
            SchulhofError::Facilities { source, .. } => source.into(),
            SchulhofError::Activities { source, .. } => source.into(),
            SchulhofError::Active { source, .. } => source.into(),
            SchulhofError::Users { source, .. } => source.into(),
            SchulhofError::Internal { .. } => Self::internal(message),
        }
    }
}
