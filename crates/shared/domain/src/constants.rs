//! Table names and `OpenAPI` tags.
//!
//! Table names double as the prefix accepted in `table:key` identifiers.

pub const ROOM: &str = "room";
pub const PERSON: &str = "person";
pub const RFID_CARD: &str = "rfid_card";
pub const STUDENT: &str = "student";
pub const STAFF: &str = "staff";
pub const CATEGORY: &str = "category";
pub const ACTIVITY: &str = "activity";
pub const SCHOOL_GROUP: &str = "school_group";
pub const GROUP_MEMBER: &str = "group_member";
pub const ACTIVE_GROUP: &str = "active_group";
pub const SUPERVISION: &str = "supervision";
pub const VISIT: &str = "visit";
pub const FEEDBACK: &str = "feedback";

pub const SYSTEM_TAG: &str = "System";
pub const USERS_TAG: &str = "Users";
pub const FACILITIES_TAG: &str = "Facilities";
pub const ACTIVITIES_TAG: &str = "Activities";
pub const GROUPS_TAG: &str = "Groups";
pub const ACTIVE_TAG: &str = "Active Groups";
pub const FEEDBACK_TAG: &str = "Feedback";
pub const SCHULHOF_TAG: &str = "Schulhof";
