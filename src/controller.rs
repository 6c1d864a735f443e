use bytes::Bytes;
use serde::Serialize;
use tracing::{info, instrument};

use crate::dto::ai_dto::{AiCredentials, AiPayload, JobFitRequest};
use crate::dto::application_dto::ApplicationForm;
use crate::dto::interview_dto::{InterviewForm, InterviewQuery};
use crate::dto::profile_dto::{EducationForm, ExperienceForm, SkillForm};
use crate::dto::upload_dto::FileUpload;
use crate::error::{Error, Result};
use crate::models::ai::AiResult;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::Interview;
use crate::models::profile::Profile;
use crate::services::ai_service::AiService;
use crate::services::api_client::ApiClient;
use crate::services::application_service::ApplicationService;
use crate::services::calendar_service::{CalendarService, MiniMonth, MonthGrid};
use crate::services::dashboard_service::{Dashboard, DashboardScope, DashboardService};
use crate::services::health_service::{HealthService, HealthStatus};
use crate::services::interview_service::InterviewService;
use crate::services::listing_service::{ApplicationColumn, InterviewColumn, ListingService};
use crate::services::profile_service::ProfileService;
use crate::services::schedule_service::ScheduleService;
use crate::store::{Resource, Store};
use crate::utils::time::{self, Clock, SystemClock};

#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub grid: MonthGrid,
    pub upcoming: Vec<MiniMonth>,
}

/// Single owner of client state. Every flow validates locally, sends the
/// request, and only touches the store once the backend has answered.
/// Operations take `&mut self`, so a second submit cannot start while one
/// is in flight.
pub struct Controller<C = SystemClock> {
    applications: ApplicationService,
    interviews: InterviewService,
    profiles: ProfileService,
    ai: AiService,
    health: HealthService,
    store: Store,
    clock: C,
}

impl Controller<SystemClock> {
    pub fn new(api: ApiClient) -> Self {
        Self::with_clock(api, SystemClock)
    }
}

impl<C: Clock> Controller<C> {
    pub fn with_clock(api: ApiClient, clock: C) -> Self {
        Self {
            applications: ApplicationService::new(api.clone()),
            interviews: InterviewService::new(api.clone()),
            profiles: ProfileService::new(api.clone()),
            ai: AiService::new(api.clone()),
            health: HealthService::new(api),
            store: Store::new(),
            clock,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    fn require_application(&self, id: &str) -> Result<&Application> {
        self.store
            .find_application(id)
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    fn require_interview(&self, id: &str) -> Result<&Interview> {
        self.store
            .find_interview(id)
            .ok_or_else(|| Error::NotFound(format!("Interview {} not found", id)))
    }

    // Applications

    #[instrument(skip(self))]
    pub async fn refresh_applications(&mut self) -> Result<&[Application]> {
        let ticket = self.store.begin_fetch(Resource::Applications);
        let items = self.applications.list().await?;
        info!(count = items.len(), "applications loaded");
        self.store.apply_applications(ticket, items);
        Ok(self.store.applications())
    }

    pub async fn create_application(&mut self, form: ApplicationForm) -> Result<Application> {
        let created = self.applications.create(form).await?;
        self.store.upsert_application(created.clone());
        Ok(created)
    }

    pub async fn update_application(&mut self, id: &str, form: ApplicationForm) -> Result<Application> {
        self.require_application(id)?;
        let mut updated = self.applications.update(id, form).await?;
        if updated.id.is_empty() {
            updated.id = id.to_string();
        }
        self.store.upsert_application(updated.clone());
        Ok(updated)
    }

    /// Resends the stored record with only the status changed.
    pub async fn update_application_status(
        &mut self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let mut form = ApplicationForm::from_application(self.require_application(id)?);
        form.status = status;
        self.update_application(id, form).await
    }

    pub async fn delete_application(&mut self, id: &str) -> Result<()> {
        self.require_application(id)?;
        self.applications.delete(id).await?;
        self.store.remove_application(id);
        Ok(())
    }

    pub async fn download_cv(&self, id: &str) -> Result<Bytes> {
        if self.require_application(id)?.cv_file.is_none() {
            return Err(Error::NotFound(format!("Application {} has no CV attached", id)));
        }
        self.applications.download_cv(id).await
    }

    // Interviews

    #[instrument(skip(self))]
    pub async fn refresh_interviews(&mut self, year: i32, month: u32) -> Result<&[Interview]> {
        if time::days_in_month(year, month).is_none() {
            return Err(Error::Validation(format!("{}-{:02} is not a valid month", year, month)));
        }
        let ticket = self.store.begin_fetch(Resource::Interviews);
        let items = self
            .interviews
            .list(Some(InterviewQuery { year, month }))
            .await?;
        info!(count = items.len(), "interviews loaded");
        self.store.apply_interviews(ticket, items, Some((year, month)));
        Ok(self.store.interviews())
    }

    #[instrument(skip(self))]
    pub async fn refresh_all_interviews(&mut self) -> Result<&[Interview]> {
        let ticket = self.store.begin_fetch(Resource::Interviews);
        let items = self.interviews.list(None).await?;
        info!(count = items.len(), "interviews loaded");
        self.store.apply_interviews(ticket, items, None);
        Ok(self.store.interviews())
    }

    /// Rejects the slot locally if it collides with a loaded interview.
    pub async fn schedule_interview(&mut self, form: InterviewForm) -> Result<Interview> {
        let range = form.check()?;
        ScheduleService::ensure_free(&range, self.store.interviews(), None)?;
        let created = self.interviews.create(&form.into_payload(range)).await?;
        self.store.upsert_interview(created.clone());
        Ok(created)
    }

    pub async fn reschedule_interview(&mut self, id: &str, form: InterviewForm) -> Result<Interview> {
        self.require_interview(id)?;
        let range = form.check()?;
        ScheduleService::ensure_free(&range, self.store.interviews(), Some(id))?;
        let mut updated = self.interviews.update(id, &form.into_payload(range)).await?;
        if updated.id.is_empty() {
            updated.id = id.to_string();
        }
        self.store.upsert_interview(updated.clone());
        Ok(updated)
    }

    pub async fn delete_interview(&mut self, id: &str) -> Result<()> {
        self.require_interview(id)?;
        self.interviews.delete(id).await?;
        self.store.remove_interview(id);
        Ok(())
    }

    // Profile

    #[instrument(skip(self))]
    pub async fn refresh_profile(&mut self) -> Result<&Profile> {
        let ticket = self.store.begin_fetch(Resource::Profile);
        let profile = self.profiles.get().await?;
        self.store.apply_profile(ticket, profile);
        self.store
            .profile()
            .ok_or_else(|| Error::NotFound("Profile not loaded".to_string()))
    }

    pub async fn save_profile(&mut self, profile: Profile) -> Result<&Profile> {
        let saved = self.profiles.save(&profile).await?;
        Ok(self.store.set_profile(saved))
    }

    pub async fn upload_profile_cv(&mut self, file: FileUpload) -> Result<&Profile> {
        let saved = self.profiles.upload_cv(file).await?;
        Ok(self.store.set_profile(saved))
    }

    /// Applies `edit` to a copy of the profile and saves the copy.
    async fn edit_profile<F>(&mut self, edit: F) -> Result<&Profile>
    where
        F: FnOnce(&mut Profile) -> Result<()>,
    {
        let mut draft = match self.store.profile() {
            Some(profile) => profile.clone(),
            None => self.profiles.get().await?,
        };
        edit(&mut draft)?;
        self.save_profile(draft).await
    }

    pub async fn add_education(&mut self, form: EducationForm) -> Result<&Profile> {
        let entry = form.into_entry()?;
        self.edit_profile(move |p| {
            p.education.push(entry);
            Ok(())
        })
        .await
    }

    pub async fn update_education(&mut self, index: usize, form: EducationForm) -> Result<&Profile> {
        let entry = form.into_entry()?;
        self.edit_profile(move |p| replace_at(&mut p.education, index, entry, "Education"))
            .await
    }

    pub async fn remove_education(&mut self, index: usize) -> Result<&Profile> {
        self.edit_profile(move |p| remove_at(&mut p.education, index, "Education"))
            .await
    }

    pub async fn add_experience(&mut self, form: ExperienceForm) -> Result<&Profile> {
        let entry = form.into_entry()?;
        self.edit_profile(move |p| {
            p.experience.push(entry);
            Ok(())
        })
        .await
    }

    pub async fn update_experience(&mut self, index: usize, form: ExperienceForm) -> Result<&Profile> {
        let entry = form.into_entry()?;
        self.edit_profile(move |p| replace_at(&mut p.experience, index, entry, "Experience"))
            .await
    }

    pub async fn remove_experience(&mut self, index: usize) -> Result<&Profile> {
        self.edit_profile(move |p| remove_at(&mut p.experience, index, "Experience"))
            .await
    }

    pub async fn add_skill(&mut self, form: SkillForm) -> Result<&Profile> {
        let entry = form.into_entry()?;
        self.edit_profile(move |p| {
            p.skills.push(entry);
            Ok(())
        })
        .await
    }

    pub async fn update_skill(&mut self, index: usize, form: SkillForm) -> Result<&Profile> {
        let entry = form.into_entry()?;
        self.edit_profile(move |p| replace_at(&mut p.skills, index, entry, "Skill"))
            .await
    }

    pub async fn remove_skill(&mut self, index: usize) -> Result<&Profile> {
        self.edit_profile(move |p| remove_at(&mut p.skills, index, "Skill"))
            .await
    }

    pub async fn add_language(&mut self, language: &str) -> Result<&Profile> {
        let language = required_entry("language", language)?;
        self.edit_profile(move |p| {
            p.languages.push(language);
            Ok(())
        })
        .await
    }

    pub async fn remove_language(&mut self, index: usize) -> Result<&Profile> {
        self.edit_profile(move |p| remove_at(&mut p.languages, index, "Language"))
            .await
    }

    pub async fn add_certification(&mut self, certification: &str) -> Result<&Profile> {
        let certification = required_entry("certification", certification)?;
        self.edit_profile(move |p| {
            p.certifications.push(certification);
            Ok(())
        })
        .await
    }

    pub async fn remove_certification(&mut self, index: usize) -> Result<&Profile> {
        self.edit_profile(move |p| remove_at(&mut p.certifications, index, "Certification"))
            .await
    }

    // AI helpers

    /// Pairs a job description with the loaded profile, or a blank one.
    pub fn job_fit(&self, job_description: impl Into<String>) -> JobFitRequest {
        JobFitRequest {
            job_description: job_description.into(),
            profile: self.store.profile().cloned().unwrap_or_default(),
        }
    }

    pub async fn run_ai<P: AiPayload>(&self, credentials: &AiCredentials, payload: &P) -> Result<AiResult> {
        self.ai.run(credentials, payload).await
    }

    pub async fn fill_profile_from_resume(
        &mut self,
        credentials: &AiCredentials,
        resume: FileUpload,
    ) -> Result<&Profile> {
        let profile = self.ai.fill_profile_from_resume(credentials, resume).await?;
        Ok(self.store.set_profile(profile))
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.health.check().await
    }

    // Views

    /// Filters by `query`, then sorts. Passing a column records a sort
    /// request, so asking for the same column twice flips the direction.
    pub fn application_view(&mut self, query: &str, column: Option<ApplicationColumn>) -> Vec<&Application> {
        if let Some(column) = column {
            self.store.application_sort_mut().request(column);
        }
        let sort = self.store.application_sort().current();
        ListingService::view(self.store.applications(), query, sort)
    }

    pub fn interview_view(&mut self, query: &str, column: Option<InterviewColumn>) -> Vec<&Interview> {
        if let Some(column) = column {
            self.store.interview_sort_mut().request(column);
        }
        let sort = self.store.interview_sort().current();
        ListingService::view(self.store.interviews(), query, sort)
    }

    pub fn calendar(&self, year: i32, month: u32, mini_count: usize) -> Result<CalendarView> {
        let interviews = self.store.interviews();
        Ok(CalendarView {
            grid: CalendarService::month_grid(year, month, interviews)?,
            upcoming: CalendarService::upcoming_mini_months(year, month, mini_count, interviews)?,
        })
    }

    pub fn dashboard(&self, scope: DashboardScope) -> Result<Dashboard> {
        let skills = self.store.profile().map(|p| p.skills.as_slice()).unwrap_or(&[]);
        DashboardService::build(
            self.store.applications(),
            self.store.interviews(),
            skills,
            scope,
            &self.clock,
        )
    }
}

fn replace_at<T>(items: &mut [T], index: usize, value: T, what: &str) -> Result<()> {
    let slot = items
        .get_mut(index)
        .ok_or_else(|| Error::NotFound(format!("{} entry {} not found", what, index)))?;
    *slot = value;
    Ok(())
}

fn remove_at<T>(items: &mut Vec<T>, index: usize, what: &str) -> Result<()> {
    if index >= items.len() {
        return Err(Error::NotFound(format!("{} entry {} not found", what, index)));
    }
    items.remove(index);
    Ok(())
}

fn required_entry(field: &str, value: &str) -> Result<String> {
    crate::utils::validation::require_text(field, value)?;
    Ok(value.trim().to_string())
}
