use ogs_active::model::Supervisor;
use ogs_activities::model::{Activity, Category};
use ogs_derive::api_model;
use ogs_facilities::model::Room;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// The provisioned Schulhof records.
#[api_model]
#[derive(Clone)]
pub struct SchulhofInfrastructure {
    pub room: Room,
    pub category: Category,
    pub activity: Activity,
}

/// Snapshot of today's Schulhof supervision.
#[api_model]
#[derive(Clone)]
pub struct SchulhofStatus {
    /// Room, category and activity have been provisioned
    pub exists: bool,
    pub room_id: Option<String>,
    pub room_name: String,
    pub activity_id: Option<String>,
    /// Today's open session
    pub active_group_id: Option<String>,
    pub is_user_supervising: bool,
    pub supervisor_count: usize,
    pub student_count: i64,
    pub supervisors: Vec<Supervisor>,
}

#[api_model]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// Staff member asking, for `isUserSupervising`
    #[serde(default)]
    pub staff_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SupervisionAction {
    Start,
    Stop,
}

#[api_model]
pub struct ToggleSupervisionRequest {
    pub staff_id: String,
    pub action: SupervisionAction,
}

#[api_model]
pub struct SupervisionOutcome {
    pub action: SupervisionAction,
    pub active_group_id: String,
    pub supervisor_count: usize,
    pub is_user_supervising: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_request_uses_lowercase_actions() {
        let raw = r#"{ "staffId": "anna", "action": "stop" }"#;
        let request: ToggleSupervisionRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.action, SupervisionAction::Stop);

        let raw = r#"{ "staffId": "anna", "action": "pause" }"#;
        assert!(serde_json::from_str::<ToggleSupervisionRequest>(raw).is_err());
    }
}
