use crate::error::GroupsError;
use ogs_database::SurrealValue;
use ogs_derive::api_model;

/// A class or OGS group students are assigned to.
#[api_model]
#[derive(Clone, PartialEq, Eq, SurrealValue)]
pub struct SchoolGroup {
    pub id: String,
    pub name: String,
    /// Home room of the group
    pub room_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[api_model]
#[derive(Clone)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub room_id: Option<String>,
}

impl CreateGroupRequest {
    pub fn validate(mut self) -> Result<Self, GroupsError> {
        self.name = required_name(&self.name)?;
        self.room_id = self.room_id.map(|id| id.trim().to_owned()).filter(|id| !id.is_empty());
        Ok(self)
    }
}

#[api_model]
#[derive(Clone, Default)]
pub struct UpdateGroupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

impl UpdateGroupRequest {
    pub fn validate(mut self) -> Result<Self, GroupsError> {
        self.name = self.name.as_deref().map(required_name).transpose()?;
        self.room_id = self.room_id.map(|id| id.trim().to_owned()).filter(|id| !id.is_empty());
        Ok(self)
    }
}

#[api_model]
pub struct AddMemberRequest {
    pub student_id: String,
}

/// A student's membership, with the student's name embedded.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub group_id: String,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub school_class: String,
    pub joined_at: i64,
}

fn required_name(name: &str) -> Result<String, GroupsError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GroupsError::Validation { message: "name must not be empty".into(), context: None });
    }
    Ok(trimmed.to_owned())
}
