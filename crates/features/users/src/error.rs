use ogs_database::DatabaseError;
use ogs_kernel::security::resource::ResourceGuardError;
use ogs_kernel::server::ApiError;
use std::borrow::Cow;

/// A specialized [`UsersError`] enum of this crate.
#[ogs_derive::ogs_error]
pub enum UsersError {
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Rejected id{}: {source}", format_context(.context))]
    Id { source: ResourceGuardError, context: Option<Cow<'static, str>> },

    #[error("User storage error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Internal users error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl UsersError {
    pub(crate) fn not_found(kind: &str, id: &str) -> Self {
        Self::NotFound { message: format!("{kind} '{id}'").into(), context: None }
    }

    pub(crate) fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict { message: message.into(), context: None }
    }

    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }
}

impl From<UsersError> for ApiError {
    fn from(err: UsersError) -> Self {
        let message = err.to_string();
        match err {
            UsersError::Validation { .. } | UsersError::Id { .. } => Self::bad_request(message),
            UsersError::NotFound { .. } => Self::not_found(message),
            UsersError::Conflict { .. } => Self::conflict(message),
            UsersError::Database { source, .. } if source.is_conflict() => Self::conflict(message),
            UsersError::Database { .. } | UsersError::Internal { .. } => Self::internal(message),
        }
    }
}
