use ogs_database::DatabaseError;
use std::time::Duration;
use tracing::warn;

/// Attempts an idempotent write makes before a contended record is reported as a conflict.
pub const ENSURE_ATTEMPTS: u32 = 5;

/// Outcome of an idempotent find-or-create.
///
/// `created` is `false` both when the record already existed and when a concurrent writer
/// won the race and its record was read back instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ensured<T> {
    pub value: T,
    pub created: bool,
}

impl<T> Ensured<T> {
    pub const fn created(value: T) -> Self {
        Self { value, created: true }
    }

    pub const fn existing(value: T) -> Self {
        Self { value, created: false }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Ensured<U> {
        Ensured { value: f(self.value), created: self.created }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Waits a little longer after every lost race so the winner's commit becomes visible.
pub async fn backoff(attempt: u32) {
    tokio::time::sleep(Duration::from_millis(5 << attempt.min(6))).await;
}

/// Reads a record and creates it when missing.
///
/// A create that loses to a concurrent writer (unique index hit or transaction conflict)
/// is not an error: the loop backs off and reads again, returning the winner's record as
/// [`Ensured::existing`]. After [`ENSURE_ATTEMPTS`] lost rounds the conflict is returned.
///
/// ```rust,ignore
/// let room = find_or_create(
///     "room",
///     || repo.find_by_name(&name),
///     || repo.create(&request),
/// )
/// .await?;
/// ```
pub async fn find_or_create<T, Find, FindFut, Create, CreateFut>(
    what: &str,
    find: Find,
    create: Create,
) -> Result<Ensured<T>, DatabaseError>
where
    Find: Fn() -> FindFut,
    FindFut: Future<Output = Result<Option<T>, DatabaseError>>,
    Create: Fn() -> CreateFut,
    CreateFut: Future<Output = Result<T, DatabaseError>>,
{
    let mut attempt = 1;
    loop {
        if let Some(found) = find().await? {
            return Ok(Ensured::existing(found));
        }
        match create().await {
            Ok(value) => return Ok(Ensured::created(value)),
            Err(err) if err.is_conflict() && attempt < ENSURE_ATTEMPTS => {
                warn!(what, attempt, "Lost a write race, reading the winner");
                backoff(attempt).await;
                attempt += 1;
            },
            Err(err) => return Err(err),
        }
    }
}
