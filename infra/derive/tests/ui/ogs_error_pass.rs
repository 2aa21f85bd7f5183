use ogs_derive::ogs_error;
use std::borrow::Cow;

#[ogs_error]
pub enum RosterError {
    #[error("Roster file error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Student not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal roster error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_roster() -> Result<String, RosterError> {
    std::fs::read_to_string("/nonexistent/roster.csv").context("Reading roster")
}

fn main() {
    let err = read_roster().unwrap_err();
    assert!(err.to_string().contains("(Reading roster)"));

    let err: Result<(), RosterError> =
        Err(RosterError::NotFound { message: "student:abc".into(), context: None });
    let err = err.context("Check-in").unwrap_err();
    assert_eq!(err.to_string(), "Student not found (Check-in): student:abc");

    let internal: RosterError = "unexpected".into();
    assert!(matches!(internal, RosterError::Internal { .. }));
}
