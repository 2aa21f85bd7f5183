use crate::error::FacilitiesError;
use ogs_database::SurrealValue;
use ogs_derive::api_model;
use utoipa::IntoParams;

/// A physical room (or outdoor area) students can be checked into.
#[api_model]
#[derive(Clone, PartialEq, Eq, SurrealValue)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub building: Option<String>,
    pub floor: Option<i64>,
    /// Maximum number of people
    pub capacity: i64,
    /// Free-form room kind, e.g. `Klassenzimmer` or `Außenbereich`
    pub category: String,
    /// Hex color used by the dashboards
    pub color: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[api_model]
#[derive(Clone)]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub floor: Option<i64>,
    pub capacity: i64,
    pub category: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl CreateRoomRequest {
    /// Trims text fields and checks the field rules.
    pub fn validate(mut self) -> Result<Self, FacilitiesError> {
        self.name = required("name", &self.name)?;
        self.category = required("category", &self.category)?;
        self.building = optional(self.building);
        self.color = optional(self.color);
        if self.capacity <= 0 {
            return Err(FacilitiesError::Validation {
                message: "capacity must be greater than zero".into(),
                context: None,
            });
        }
        Ok(self)
    }
}

#[api_model]
#[derive(Clone, Default)]
pub struct UpdateRoomRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub floor: Option<i64>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl UpdateRoomRequest {
    pub fn validate(mut self) -> Result<Self, FacilitiesError> {
        self.name = self.name.as_deref().map(|name| required("name", name)).transpose()?;
        self.category = self.category.as_deref().map(|c| required("category", c)).transpose()?;
        if self.capacity.is_some_and(|capacity| capacity <= 0) {
            return Err(FacilitiesError::Validation {
                message: "capacity must be greater than zero".into(),
                context: None,
            });
        }
        Ok(self)
    }
}

#[api_model]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoomQuery {
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn required(field: &str, value: &str) -> Result<String, FacilitiesError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FacilitiesError::Validation {
            message: format!("{field} must not be empty").into(),
            context: None,
        });
    }
    Ok(trimmed.to_owned())
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateRoomRequest {
        CreateRoomRequest {
            name: "  Werkraum ".to_owned(),
            building: Some(" ".to_owned()),
            floor: Some(1),
            capacity: 20,
            category: "Werkstatt".to_owned(),
            color: None,
        }
    }

    #[test]
    fn create_request_is_normalized() {
        let room = request().validate().unwrap();
        assert_eq!(room.name, "Werkraum");
        assert_eq!(room.building, None);
    }

    #[test]
    fn create_request_rejects_bad_fields() {
        let mut empty = request();
        empty.name = "   ".to_owned();
        assert!(matches!(empty.validate(), Err(FacilitiesError::Validation { .. })));

        let mut full = request();
        full.capacity = 0;
        assert!(matches!(full.validate(), Err(FacilitiesError::Validation { .. })));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"{ "name": "A", "capacity": 1, "category": "B", "size": 3 }"#;
        assert!(serde_json::from_str::<CreateRoomRequest>(raw).is_err());
    }
}
