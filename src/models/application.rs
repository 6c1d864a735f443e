use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Rejection,
    Offer,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Rejection,
        ApplicationStatus::Offer,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Rejection => "Rejection",
            Self::Offer => "Offer",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown status '{}', expected one of Applied, Interview, Rejection, Offer",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default, deserialize_with = "super::deserialize_id")]
    pub id: String,
    pub job_title: String,
    pub company: String,
    /// Raw value as stored by the backend. May be unparseable on partially
    /// filled records.
    #[serde(default)]
    pub application_date: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cv_file: Option<String>,
    #[serde(default, rename = "cover_letter")]
    pub cover_letter_notes: Option<String>,
}

impl Application {
    pub fn applied_on(&self) -> Option<NaiveDate> {
        time::parse_date(&self.application_date)
    }
}
