use crate::error::UsersError;
use ogs_database::SurrealValue;
use ogs_derive::api_model;
use utoipa::IntoParams;

/// Shortest and longest accepted RFID tag, in hex digits.
pub const TAG_MIN_LEN: usize = 8;
pub const TAG_MAX_LEN: usize = 32;

/// A natural person; students and staff reference one.
#[api_model]
#[derive(Clone, PartialEq, Eq, SurrealValue)]
pub struct Person {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Normalized RFID tag currently assigned
    pub tag_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[api_model]
pub struct CreatePersonRequest {
    pub first_name: String,
    pub last_name: String,
}

impl CreatePersonRequest {
    pub fn validate(self) -> Result<Self, UsersError> {
        Ok(Self {
            first_name: required("first name", &self.first_name)?,
            last_name: required("last name", &self.last_name)?,
        })
    }
}

#[api_model]
#[derive(Default)]
pub struct UpdatePersonRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UpdatePersonRequest {
    pub fn validate(self) -> Result<Self, UsersError> {
        Ok(Self {
            first_name: self.first_name.as_deref().map(|v| required("first name", v)).transpose()?,
            last_name: self.last_name.as_deref().map(|v| required("last name", v)).transpose()?,
        })
    }
}

#[api_model]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PersonQuery {
    /// Case-insensitive substring of the first or last name
    #[serde(default)]
    pub search: Option<String>,
}

#[api_model]
pub struct AssignTagRequest {
    /// Raw tag as read by the scanner, separators allowed (`04:A1:B2:C3`)
    pub tag: String,
}

/// A student with the person's name embedded.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Student {
    pub id: String,
    pub person_id: String,
    pub first_name: String,
    pub last_name: String,
    pub school_class: String,
    pub guardian_name: Option<String>,
    pub guardian_contact: Option<String>,
    pub created_at: i64,
}

#[api_model]
pub struct CreateStudentRequest {
    pub person_id: String,
    pub school_class: String,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_contact: Option<String>,
}

impl CreateStudentRequest {
    pub fn validate(self) -> Result<Self, UsersError> {
        Ok(Self {
            person_id: self.person_id,
            school_class: required("school class", &self.school_class)?,
            guardian_name: optional(self.guardian_name),
            guardian_contact: optional(self.guardian_contact),
        })
    }
}

#[api_model]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentQuery {
    #[serde(default)]
    pub school_class: Option<String>,
}

/// A staff member with the person's name embedded.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Staff {
    pub id: String,
    pub person_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub created_at: i64,
}

#[api_model]
pub struct CreateStaffRequest {
    pub person_id: String,
    #[serde(default)]
    pub position: Option<String>,
}

impl CreateStaffRequest {
    pub fn validate(self) -> Self {
        Self { person_id: self.person_id, position: optional(self.position) }
    }
}

/// Canonical form of an RFID tag: separators removed, upper-case hex.
///
/// # Errors
/// Returns [`UsersError::Validation`] unless the result is 8..=32 hex digits.
pub fn normalize_tag(raw: &str) -> Result<String, UsersError> {
    let tag: String =
        raw.trim().chars().filter(|c| !matches!(c, ':' | '-')).collect::<String>().to_ascii_uppercase();

    if !(TAG_MIN_LEN..=TAG_MAX_LEN).contains(&tag.len()) {
        return Err(UsersError::invalid(format!(
            "RFID tag must have {TAG_MIN_LEN} to {TAG_MAX_LEN} hex digits, got {}",
            tag.len()
        )));
    }
    if !tag.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(UsersError::invalid("RFID tag must be hexadecimal"));
    }

    Ok(tag)
}

fn required(field: &str, value: &str) -> Result<String, UsersError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UsersError::invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_normalized() {
        assert_eq!(normalize_tag(" 04:a1:b2:c3 ").unwrap(), "04A1B2C3");
        assert_eq!(normalize_tag("04-A1-B2-C3-D4-E5-F6").unwrap(), "04A1B2C3D4E5F6");
    }

    #[test]
    fn malformed_tags_are_rejected() {
        assert!(normalize_tag("04A1B2").is_err());
        assert!(normalize_tag("04A1B2C3Z").is_err());
        assert!(normalize_tag(&"A".repeat(33)).is_err());
        assert!(normalize_tag("04 A1 B2 C3").is_err());
    }

    #[test]
    fn names_are_required() {
        let request = CreatePersonRequest { first_name: " Mia ".to_owned(), last_name: String::new() };
        assert!(matches!(request.validate(), Err(UsersError::Validation { .. })));

        let request =
            CreatePersonRequest { first_name: " Mia ".to_owned(), last_name: "Huber".to_owned() };
        assert_eq!(request.validate().unwrap().first_name, "Mia");
    }

    #[test]
    fn requests_use_camel_case() {
        let raw = r#"{ "personId": "abc", "schoolClass": "3b" }"#;
        let request: CreateStudentRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.school_class, "3b");
        assert!(request.guardian_name.is_none());
    }
}
