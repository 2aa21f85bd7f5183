use ogs_database::DatabaseError;
use ogs_kernel::security::resource::ResourceGuardError;
use ogs_kernel::server::ApiError;
use ogs_users::UsersError;
use std::borrow::Cow;

/// A specialized [`FeedbackError`] enum of this crate.
#[ogs_derive::ogs_error]
pub enum FeedbackError {
    #[error("Invalid feedback{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Feedback not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Rejected feedback id{}: {source}", format_context(.context))]
    Id { source: ResourceGuardError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Users { source: UsersError, context: Option<Cow<'static, str>> },

    #[error("Feedback storage error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Internal feedback error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl FeedbackError {
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }
}

impl From<FeedbackError> for ApiError {
    fn from(err: FeedbackError) -> Self {
        let message = err.to_string();
        match err {
            FeedbackError::Validation { .. } | FeedbackError::Id { .. } => {
                Self::bad_request(message)
            },
            FeedbackError::NotFound { .. } => Self::not_found(message),
            FeedbackError::Users { source, .. } => source.into(),
            FeedbackError::Database { source, .. } if source.is_conflict() => {
                Self::conflict(message)
            },
            FeedbackError::Database { .. } | FeedbackError::Internal { .. } => {
                Self::internal(message)
            },
        }
    }
}
