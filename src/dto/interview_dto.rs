use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::application_dto::non_empty;
use crate::error::Result;
use crate::models::interview::Interview;
use crate::services::schedule_service::TimeRange;
use crate::utils::{time, validation};

#[derive(Debug, Clone, Default, Validate)]
pub struct InterviewForm {
    #[validate(length(min = 1))]
    pub interview_title: String,
    pub start_datetime: String,
    pub end_datetime: String,
    pub location: Option<String>,
    pub interview_type: Option<String>,
    pub notes: Option<String>,
}

impl InterviewForm {
    pub fn from_interview(interview: &Interview) -> Self {
        Self {
            interview_title: interview.interview_title.clone(),
            start_datetime: interview.start_datetime.clone(),
            end_datetime: interview.end_datetime.clone(),
            location: interview.location.clone(),
            interview_type: interview.interview_type.clone(),
            notes: interview.notes.clone(),
        }
    }

    /// Checks the title and the time range; the overlap scan happens later
    /// against the current interview list.
    pub fn check(&self) -> Result<TimeRange> {
        validation::validate(self)?;
        validation::require_text("interview_title", &self.interview_title)?;
        Ok(TimeRange::parse(&self.start_datetime, &self.end_datetime)?)
    }

    pub(crate) fn into_payload(self, range: TimeRange) -> InterviewPayload {
        InterviewPayload {
            interview_title: self.interview_title.trim().to_string(),
            start_datetime: time::format_wire_datetime(&range.start),
            end_datetime: time::format_wire_datetime(&range.end),
            location: non_empty(self.location),
            interview_type: non_empty(self.interview_type),
            notes: non_empty(self.notes),
        }
    }
}

/// JSON body of `POST/PUT /api/interviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewPayload {
    pub interview_title: String,
    pub start_datetime: String,
    pub end_datetime: String,
    pub location: Option<String>,
    pub interview_type: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuery {
    pub year: i32,
    pub month: u32,
}
