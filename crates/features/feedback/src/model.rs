use crate::error::FeedbackError;
use ogs_database::SurrealValue;
use ogs_derive::api_model;
use ogs_kernel::time::{parse_day, parse_time};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

/// Most entries accepted in one batch.
pub const MAX_BATCH: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackValue {
    Positive,
    Neutral,
    Negative,
}

impl FeedbackValue {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for FeedbackValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackValue {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(FeedbackError::invalid(format!(
                "value must be positive, neutral or negative, got '{other}'"
            ))),
        }
    }
}

/// Stored `feedback` row.
#[derive(Debug, Clone, SurrealValue)]
pub struct FeedbackRecord {
    pub id: String,
    pub student_id: String,
    pub value: String,
    pub day: String,
    pub time: String,
    pub is_mensa_feedback: bool,
    pub created_at: i64,
}

/// A student's rating of their day or of the canteen.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub id: String,
    pub student_id: String,
    pub value: FeedbackValue,
    /// `YYYY-MM-DD`
    pub day: String,
    /// `HH:MM:SS`
    pub time: String,
    pub is_mensa_feedback: bool,
    pub created_at: i64,
}

impl TryFrom<FeedbackRecord> for FeedbackEntry {
    type Error = FeedbackError;

    fn try_from(record: FeedbackRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            value: record.value.parse()?,
            id: record.id,
            student_id: record.student_id,
            day: record.day,
            time: record.time,
            is_mensa_feedback: record.is_mensa_feedback,
            created_at: record.created_at,
        })
    }
}

#[api_model]
#[derive(Clone)]
pub struct CreateFeedbackRequest {
    pub student_id: String,
    /// `positive`, `neutral` or `negative`
    pub value: String,
    /// `YYYY-MM-DD`
    pub day: String,
    /// `HH:MM` or `HH:MM:SS`
    pub time: String,
    #[serde(default)]
    pub is_mensa_feedback: bool,
}

/// A create request that passed field validation.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub student_id: String,
    pub value: FeedbackValue,
    pub day: String,
    pub time: String,
    pub is_mensa_feedback: bool,
}

impl CreateFeedbackRequest {
    pub fn validate(self) -> Result<NewFeedback, FeedbackError> {
        Ok(NewFeedback {
            value: self.value.parse()?,
            day: valid_day(&self.day)?,
            time: valid_time(&self.time)?,
            student_id: self.student_id,
            is_mensa_feedback: self.is_mensa_feedback,
        })
    }
}

#[api_model]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedbackQuery {
    #[serde(default)]
    pub student_id: Option<String>,
    /// Exact day
    #[serde(default)]
    pub day: Option<String>,
    /// First day of a range, inclusive
    #[serde(default)]
    pub from: Option<String>,
    /// Last day of a range, inclusive
    #[serde(default)]
    pub to: Option<String>,
    /// Only canteen (`true`) or only day (`false`) feedback
    #[serde(default)]
    pub mensa: Option<bool>,
}

impl FeedbackQuery {
    pub fn validate(mut self) -> Result<Self, FeedbackError> {
        self.day = self.day.as_deref().map(valid_day).transpose()?;
        self.from = self.from.as_deref().map(valid_day).transpose()?;
        self.to = self.to.as_deref().map(valid_day).transpose()?;
        if let (Some(from), Some(to)) = (&self.from, &self.to)
            && from > to
        {
            return Err(FeedbackError::invalid(format!("range start {from} is after {to}")));
        }
        Ok(self)
    }
}

#[api_model]
pub struct BatchFeedbackRequest {
    pub entries: Vec<CreateFeedbackRequest>,
}

/// Outcome for one entry of a batch, by position.
#[api_model]
pub struct BatchItemResult {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<FeedbackEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[api_model]
pub struct BatchFeedbackResponse {
    pub results: Vec<BatchItemResult>,
    pub created: usize,
    pub failed: usize,
}

fn valid_day(day: &str) -> Result<String, FeedbackError> {
    let day = day.trim();
    if parse_day(day).is_none() {
        return Err(FeedbackError::invalid(format!("day '{day}' is not a YYYY-MM-DD date")));
    }
    Ok(day.to_owned())
}

/// Accepts `HH:MM` or `HH:MM:SS` and returns `HH:MM:SS`.
fn valid_time(time: &str) -> Result<String, FeedbackError> {
    let time = time.trim();
    if parse_time(time).is_none() {
        return Err(FeedbackError::invalid(format!("time '{time}' is not HH:MM or HH:MM:SS")));
    }
    Ok(if time.len() == 5 { format!("{time}:00") } else { time.to_owned() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: &str, day: &str, time: &str) -> CreateFeedbackRequest {
        CreateFeedbackRequest {
            student_id: "s1".to_owned(),
            value: value.to_owned(),
            day: day.to_owned(),
            time: time.to_owned(),
            is_mensa_feedback: false,
        }
    }

    #[test]
    fn valid_request_is_normalized() {
        let new = request(" Positive ", "2025-03-14", "12:30").validate().unwrap();
        assert_eq!(new.value, FeedbackValue::Positive);
        assert_eq!(new.time, "12:30:00");
    }

    #[test]
    fn invalid_fields_are_rejected() {
        assert!(request("great", "2025-03-14", "12:30").validate().is_err());
        assert!(request("neutral", "14.03.2025", "12:30").validate().is_err());
        assert!(request("neutral", "2025-03-14", "25:00").validate().is_err());
        assert!(request("neutral", "2025-03-14", "noon").validate().is_err());
    }

    #[test]
    fn range_must_be_ordered() {
        let query = FeedbackQuery {
            from: Some("2025-03-14".to_owned()),
            to: Some("2025-03-01".to_owned()),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn values_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&FeedbackValue::Negative).unwrap(), "\"negative\"");
        assert_eq!(FeedbackValue::Neutral.to_string(), "neutral");
    }
}
