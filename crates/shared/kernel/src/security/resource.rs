use std::borrow::Cow;

/// Longest record key accepted from clients.
pub const MAX_KEY_LEN: usize = 64;

#[ogs_derive::ogs_error]
pub enum ResourceGuardError {
    #[error("Resource validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Utilities for safe resource handling and ID validation.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Validates a record id against a specific table and returns it as `table:key`.
    ///
    /// Prevents "ID Spoofing" where a caller provides an ID from a different table
    /// (e.g., a `staff:..` id passed to a student endpoint).
    ///
    /// # Errors
    /// Returns an error if the table does not match or the key is malformed.
    pub fn verify<I, T>(id: I, expected_table: T) -> Result<String, ResourceGuardError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let table = expected_table.as_ref();
        let key = Self::key(id, table)?;
        Ok(format!("{table}:{key}"))
    }

    /// Validates an id (`key` or `table:key`) and returns the bare key.
    ///
    /// Keys are 1..=64 characters of ASCII letters, digits, `-` and `_`.
    ///
    /// # Errors
    /// Returns an error if the table does not match or the key is malformed.
    pub fn key<I, T>(id: I, expected_table: T) -> Result<String, ResourceGuardError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let id_ref = id.as_ref().trim();
        let table_ref = expected_table.as_ref();

        let key = match id_ref.split_once(':') {
            Some((table, _)) if table != table_ref => {
                return Err(ResourceGuardError::Validation {
                    message: format!("Expected '{table_ref}', got '{table}'").into(),
                    context: Some("ID table mismatch".into()),
                });
            },
            Some((_, key)) => key,
            None => id_ref,
        };

        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return Err(ResourceGuardError::Validation {
                message: format!("'{id_ref}' is not a valid {table_ref} id").into(),
                context: Some("ID length".into()),
            });
        }
        if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(ResourceGuardError::Validation {
                message: format!("'{id_ref}' is not a valid {table_ref} id").into(),
                context: Some("ID characters".into()),
            });
        }

        Ok(key.to_owned())
    }

    /// Renders a record id literal (`table:⟨key⟩`) for embedding into `SurrealQL`.
    ///
    /// The key is escaped, so it is safe even for keys that never went through [`Self::key`].
    #[must_use]
    pub fn record(table: &str, key: &str) -> String {
        let escaped = key.replace('\\', "\\\\").replace('⟩', "\\⟩");
        format!("{table}:⟨{escaped}⟩")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_verification() {
        assert_eq!(ResourceGuard::verify("student:abc123", "student").unwrap(), "student:abc123");
        assert_eq!(ResourceGuard::verify("abc123", "student").unwrap(), "student:abc123");
        assert!(ResourceGuard::verify("staff:abc123", "student").is_err());
    }

    #[test]
    fn keys_reject_query_syntax() {
        assert!(ResourceGuard::key("abc; DELETE room", "room").is_err());
        assert!(ResourceGuard::key("", "room").is_err());
        assert!(ResourceGuard::key("room:", "room").is_err());
        assert!(ResourceGuard::key("a".repeat(65), "room").is_err());
        assert_eq!(ResourceGuard::key(" room:Hof_1-a ", "room").unwrap(), "Hof_1-a");
    }

    #[test]
    fn record_literal_is_escaped() {
        assert_eq!(ResourceGuard::record("room", "abc"), "room:⟨abc⟩");
        assert_eq!(ResourceGuard::record("room", "a⟩b"), "room:⟨a\\⟩b⟩");
    }
}
