use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::time;

pub const UNSPECIFIED_TYPE: &str = "Unspecified";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    #[serde(default, deserialize_with = "super::deserialize_id")]
    pub id: String,
    pub interview_title: String,
    pub start_datetime: String,
    pub end_datetime: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub interview_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Interview {
    pub fn start(&self) -> Option<NaiveDateTime> {
        time::parse_datetime(&self.start_datetime)
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        time::parse_datetime(&self.end_datetime)
    }

    /// Interview type for grouping; blank or missing types share one bucket.
    pub fn type_label(&self) -> &str {
        self.interview_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNSPECIFIED_TYPE)
    }
}
