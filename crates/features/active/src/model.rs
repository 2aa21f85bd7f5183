use crate::error::ActiveError;
use ogs_database::SurrealValue;
use ogs_derive::api_model;
use ogs_kernel::time::parse_day;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One day's session of an activity in a room.
#[api_model]
#[derive(Clone, PartialEq, Eq, SurrealValue)]
pub struct ActiveGroup {
    pub id: String,
    pub activity_id: String,
    pub room_id: String,
    /// Local calendar day, `YYYY-MM-DD`
    pub day: String,
    pub started_at: i64,
    pub ended_at: Option<i64>,
}

impl ActiveGroup {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

#[api_model]
pub struct StartSessionRequest {
    pub activity_id: String,
    pub room_id: String,
}

#[api_model]
pub struct StartedSession {
    pub session: ActiveGroup,
    /// `false` when an existing session of the day was reused or reopened
    pub created: bool,
}

#[api_model]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SessionQuery {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub open_only: bool,
}

impl SessionQuery {
    pub fn validate(mut self) -> Result<Self, ActiveError> {
        self.day = self.day.map(|day| valid_day(&day)).transpose()?;
        Ok(self)
    }
}

/// A staff member recorded as supervising a session.
#[api_model]
#[derive(Clone, PartialEq, Eq, SurrealValue)]
pub struct Supervision {
    pub id: String,
    pub active_group_id: String,
    pub staff_id: String,
    pub started_at: i64,
    pub ended_at: Option<i64>,
}

impl Supervision {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// An open supervision with the staff member's name.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Supervisor {
    pub staff_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub started_at: i64,
}

#[api_model]
pub struct ClaimSupervisionRequest {
    pub staff_id: String,
}

/// A student's stay in a session.
#[api_model]
#[derive(Clone, PartialEq, Eq, SurrealValue)]
pub struct Visit {
    pub id: String,
    pub student_id: String,
    pub active_group_id: String,
    pub entered_at: i64,
    pub exited_at: Option<i64>,
}

impl Visit {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.exited_at.is_none()
    }
}

#[api_model]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VisitQuery {
    #[serde(default)]
    pub open_only: bool,
}

#[api_model]
pub struct CheckInRequest {
    pub active_group_id: String,
    pub student_id: String,
}

#[api_model]
pub struct CheckOutRequest {
    pub student_id: String,
}

/// Result of a check-in.
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub visit: Visit,
    /// The visit that was closed to move the student here
    pub transferred_from: Option<Visit>,
    /// The student was already present, nothing changed
    pub already_present: bool,
}

#[api_model]
pub struct ScanRequest {
    /// Raw tag as read by the scanner
    pub tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScanAction {
    CheckedIn,
    CheckedOut,
    Transferred,
}

#[api_model]
pub struct ScanOutcome {
    pub action: ScanAction,
    pub visit: Visit,
}

/// Checks a `YYYY-MM-DD` day and returns it trimmed.
pub fn valid_day(day: &str) -> Result<String, ActiveError> {
    let day = day.trim();
    if parse_day(day).is_none() {
        return Err(ActiveError::invalid(format!("'{day}' is not a YYYY-MM-DD date")));
    }
    Ok(day.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_actions_are_snake_case() {
        assert_eq!(serde_json::to_string(&ScanAction::CheckedOut).unwrap(), "\"checked_out\"");
        let action: ScanAction = serde_json::from_str("\"transferred\"").unwrap();
        assert_eq!(action, ScanAction::Transferred);
    }

    #[test]
    fn session_query_checks_the_day() {
        let query = SessionQuery { day: Some(" 2025-03-14 ".to_owned()), open_only: true };
        assert_eq!(query.validate().unwrap().day.as_deref(), Some("2025-03-14"));

        let query = SessionQuery { day: Some("14.03.2025".to_owned()), open_only: false };
        assert!(matches!(query.validate(), Err(ActiveError::Validation { .. })));
    }

    #[test]
    fn open_is_derived_from_end_time() {
        let mut visit = Visit {
            id: "v".to_owned(),
            student_id: "s".to_owned(),
            active_group_id: "g".to_owned(),
            entered_at: 1,
            exited_at: None,
        };
        assert!(visit.is_open());
        visit.exited_at = Some(2);
        assert!(!visit.is_open());
    }
}
