use ogs_database::DatabaseError;
use ogs_facilities::FacilitiesError;
use ogs_kernel::security::resource::ResourceGuardError;
use ogs_kernel::server::ApiError;
use ogs_users::UsersError;
use std::borrow::Cow;

/// A specialized [`GroupsError`] enum of this crate.
#[ogs_derive::ogs_error]
pub enum GroupsError {
    #[error("Invalid group{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Group conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Rejected group id{}: {source}", format_context(.context))]
    Id { source: ResourceGuardError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Facilities { source: FacilitiesError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Users { source: UsersError, context: Option<Cow<'static, str>> },

    #[error("Group storage error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Internal groups error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl GroupsError {
    pub(crate) fn not_found(kind: &str, id: &str) -> Self {
        Self::NotFound { message: format!("{kind} '{id}'").into(), context: None }
    }
}

impl From<GroupsError> for ApiError {
    fn from(err: GroupsError) -> Self {
        let message = err.to_string();
        match err {
            GroupsError::Validation { .. } | GroupsError::Id { .. } => Self::bad_request(message),
            GroupsError::NotFound { .. } => Self::not_found(message),
            GroupsError::Conflict { .. } => Self::conflict(message),
            GroupsError::Facilities { source, .. } => source.into(),
            GroupsError::Users { source, .. } => source.into(),
            GroupsError::Database { source, .. } if source.is_conflict() => Self::conflict(message),
            GroupsError::Database { .. } | GroupsError::Internal { .. } => Self::internal(message),
        }
    }
}
