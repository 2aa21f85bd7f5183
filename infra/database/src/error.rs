use std::borrow::Cow;

/// A specialized [`DatabaseError`] enum of this crate.
#[ogs_derive::ogs_error]
pub enum DatabaseError {
    /// Validation errors.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Occurs when connectivity or health checks fail.
    #[error("Database connection failed{}: {message}", format_context(.context))]
    Connection { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Occurs when authentication fails.
    #[error("Authentication failed{}: {message}", format_context(.context))]
    Auth { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A write lost to another writer: a unique index, an already existing record id, or a
    /// transaction conflict the engine reports as retryable.
    #[error("Conflicting write{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A wrapper for underlying `SurrealDB` engine errors.
    #[error("SurrealDB error{}: {source}", format_context(.context))]
    Surreal {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Migration failures or invariant violations.
    #[error("Migration error{}: {message}", format_context(.context))]
    Migration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal database error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl DatabaseError {
    /// `true` when the write lost a race and re-reading (or retrying) is the right response.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Classifies an engine error, turning lost write races into [`DatabaseError::Conflict`].
    #[must_use]
    pub fn classify(source: surrealdb::Error) -> Self {
        let message = source.to_string();
        if is_write_conflict(&message) {
            Self::Conflict { message: message.into(), context: None }
        } else {
            Self::Surreal { source, context: None }
        }
    }
}

/// Unique index hits, duplicate record ids and optimistic transaction conflicts.
///
/// The engine words transaction conflicts differently across versions, but every one of
/// them carries the "can be retried" hint.
fn is_write_conflict(message: &str) -> bool {
    const MARKERS: [&str; 5] = [
        "already contains",
        "already exists",
        "read or write conflict",
        "Transaction conflict",
        "can be retried",
    ];
    MARKERS.iter().any(|marker| message.contains(marker))
}
