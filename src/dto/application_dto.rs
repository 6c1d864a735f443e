use chrono::NaiveDate;
use reqwest::multipart::Form;
use validator::Validate;

use crate::dto::upload_dto::FileUpload;
use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus};
use crate::utils::{time, validation};

/// Fields of the add/edit application form.
#[derive(Debug, Clone, Default, Validate)]
pub struct ApplicationForm {
    #[validate(length(min = 1))]
    pub job_title: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub application_date: String,
    pub status: ApplicationStatus,
    #[validate(url)]
    pub link: Option<String>,
    pub description: Option<String>,
    pub cover_letter_notes: Option<String>,
    pub cv_file: Option<FileUpload>,
}

impl ApplicationForm {
    /// Rebuilds the form from a stored record so a single field can change
    /// without losing the others. The CV is left untouched on the backend.
    pub fn from_application(app: &Application) -> Self {
        let application_date = app
            .applied_on()
            .map(|date| time::format_wire_date(&date))
            .unwrap_or_else(|| app.application_date.clone());

        Self {
            job_title: app.job_title.clone(),
            company: app.company.clone(),
            application_date,
            status: app.status,
            link: app.link.clone(),
            description: app.description.clone(),
            cover_letter_notes: app.cover_letter_notes.clone(),
            cv_file: None,
        }
    }

    /// Runs every local rule and returns the parsed application date.
    pub fn check(&self) -> Result<NaiveDate> {
        validation::validate(self)?;
        validation::require_text("job_title", &self.job_title)?;
        validation::require_text("company", &self.company)?;
        validation::require_date("application_date", &self.application_date)
    }

    pub(crate) fn into_multipart(self, date: NaiveDate) -> Result<Form> {
        let mut form = Form::new()
            .text("job_title", self.job_title.trim().to_string())
            .text("company", self.company.trim().to_string())
            .text("application_date", time::format_wire_date(&date))
            .text("status", self.status.label());

        if let Some(description) = non_empty(self.description) {
            form = form.text("description", description);
        }
        if let Some(link) = non_empty(self.link) {
            form = form.text("link", link);
        }
        if let Some(notes) = non_empty(self.cover_letter_notes) {
            form = form.text("cover_letter", notes);
        }
        if let Some(cv) = self.cv_file {
            form = form.part("cv_file", cv.into_part()?);
        }
        Ok(form)
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
