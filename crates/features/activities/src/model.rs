use crate::error::ActivitiesError;
use ogs_database::SurrealValue;
use ogs_derive::api_model;
use ogs_kernel::domain::schedule::Weekdays;
use ogs_kernel::time::weekday_index;
use utoipa::IntoParams;

/// Groups activities, e.g. `Sport` or `Schulhof`.
#[api_model]
#[derive(Clone, PartialEq, Eq, SurrealValue)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: i64,
}

#[api_model]
#[derive(Clone)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CreateCategoryRequest {
    pub fn validate(mut self) -> Result<Self, ActivitiesError> {
        self.name = required("name", &self.name)?;
        self.description = optional(self.description);
        self.color = optional(self.color);
        Ok(self)
    }
}

/// A recurring activity group offered on a set of weekdays.
#[api_model]
#[derive(Clone, PartialEq, Eq, SurrealValue)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub max_participants: i64,
    /// Open to every student rather than enrolled ones only
    pub is_open: bool,
    pub planned_room_id: Option<String>,
    /// Weekday bit set, Monday is bit 0
    pub weekdays: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Activity {
    #[must_use]
    pub fn schedule(&self) -> Weekdays {
        u8::try_from(self.weekdays).map_or_else(|_| Weekdays::empty(), Weekdays::from_bits_truncate)
    }

    /// Whether the activity takes place on `day` (`YYYY-MM-DD`).
    #[must_use]
    pub fn runs_on(&self, day: &str) -> bool {
        weekday_index(day).is_some_and(|index| self.schedule().includes_day(index))
    }
}

#[api_model]
#[derive(Clone)]
pub struct CreateActivityRequest {
    pub name: String,
    pub category_id: String,
    pub max_participants: i64,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub planned_room_id: Option<String>,
    /// Weekday bit set, defaults to Monday to Friday
    #[serde(default)]
    #[schema(value_type = u8)]
    pub weekdays: Weekdays,
}

impl CreateActivityRequest {
    pub fn validate(mut self) -> Result<Self, ActivitiesError> {
        self.name = required("name", &self.name)?;
        self.planned_room_id = optional(self.planned_room_id);
        positive(self.max_participants)?;
        scheduled(self.weekdays)?;
        Ok(self)
    }
}

#[api_model]
#[derive(Clone, Default)]
pub struct UpdateActivityRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub max_participants: Option<i64>,
    #[serde(default)]
    pub is_open: Option<bool>,
    #[serde(default)]
    pub planned_room_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<u8>)]
    pub weekdays: Option<Weekdays>,
}

impl UpdateActivityRequest {
    pub fn validate(mut self) -> Result<Self, ActivitiesError> {
        self.name = self.name.as_deref().map(|name| required("name", name)).transpose()?;
        self.planned_room_id = optional(self.planned_room_id);
        if let Some(max) = self.max_participants {
            positive(max)?;
        }
        if let Some(weekdays) = self.weekdays {
            scheduled(weekdays)?;
        }
        Ok(self)
    }
}

#[api_model]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    #[serde(default)]
    pub category_id: Option<String>,
    /// Weekday name (`mon`, `tuesday`, `di`) or a `YYYY-MM-DD` date
    #[serde(default)]
    pub weekday: Option<String>,
}

impl ActivityQuery {
    /// The weekday filter as a flag set; `None` lists every activity.
    pub fn weekdays(&self) -> Result<Option<Weekdays>, ActivitiesError> {
        let Some(raw) = self.weekday.as_deref().map(str::trim).filter(|w| !w.is_empty()) else {
            return Ok(None);
        };

        let flags = match weekday_index(raw) {
            Some(index) => Weekdays::from_monday_index(index),
            None => Weekdays::from(raw),
        };
        if flags.is_empty() {
            return Err(ActivitiesError::invalid(format!("unknown weekday '{raw}'")));
        }
        Ok(Some(flags))
    }
}

fn required(field: &str, value: &str) -> Result<String, ActivitiesError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ActivitiesError::invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn positive(max_participants: i64) -> Result<(), ActivitiesError> {
    if max_participants <= 0 {
        return Err(ActivitiesError::invalid("max participants must be greater than zero"));
    }
    Ok(())
}

fn scheduled(weekdays: Weekdays) -> Result<(), ActivitiesError> {
    if weekdays.is_empty() {
        return Err(ActivitiesError::invalid("an activity needs at least one weekday"));
    }
    Ok(())
}
