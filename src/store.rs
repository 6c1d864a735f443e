use std::collections::HashMap;

use tracing::debug;

use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::models::profile::Profile;
use crate::services::listing_service::{ApplicationColumn, InterviewColumn, SortState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Applications,
    Interviews,
    Profile,
}

/// Issued when a fetch starts. Only the most recent ticket per resource may
/// write its result back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    resource: Resource,
    seq: u64,
}

impl FetchTicket {
    pub fn resource(&self) -> Resource {
        self.resource
    }
}

/// Client-side copy of everything the backend has told us.
#[derive(Debug, Default)]
pub struct Store {
    applications: Vec<Application>,
    interviews: Vec<Interview>,
    /// Month the interview list was narrowed to, `None` when it holds everything.
    interview_month: Option<(i32, u32)>,
    profile: Option<Profile>,
    application_sort: SortState<ApplicationColumn>,
    interview_sort: SortState<InterviewColumn>,
    next_seq: u64,
    latest: HashMap<Resource, u64>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self, resource: Resource) -> FetchTicket {
        self.next_seq += 1;
        self.latest.insert(resource, self.next_seq);
        FetchTicket {
            resource,
            seq: self.next_seq,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.latest.get(&ticket.resource) == Some(&ticket.seq)
    }

    fn accept(&self, ticket: &FetchTicket, resource: Resource) -> bool {
        let current = ticket.resource == resource && self.is_current(ticket);
        if !current {
            debug!(?resource, seq = ticket.seq, "dropping stale fetch result");
        }
        current
    }

    /// Replaces the application list. Returns `false` and keeps the current
    /// list when a newer fetch was started after `ticket`.
    pub fn apply_applications(&mut self, ticket: FetchTicket, items: Vec<Application>) -> bool {
        if !self.accept(&ticket, Resource::Applications) {
            return false;
        }
        self.applications = items;
        true
    }

    pub fn apply_interviews(
        &mut self,
        ticket: FetchTicket,
        items: Vec<Interview>,
        month: Option<(i32, u32)>,
    ) -> bool {
        if !self.accept(&ticket, Resource::Interviews) {
            return false;
        }
        self.interviews = items;
        self.interview_month = month;
        true
    }

    pub fn apply_profile(&mut self, ticket: FetchTicket, profile: Profile) -> bool {
        if !self.accept(&ticket, Resource::Profile) {
            return false;
        }
        self.profile = Some(profile);
        true
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn find_application(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }

    /// Replaces the entry with the same id in place, or appends it.
    pub fn upsert_application(&mut self, app: Application) {
        match self.applications.iter_mut().find(|a| a.id == app.id) {
            Some(slot) => *slot = app,
            None => self.applications.push(app),
        }
    }

    pub fn remove_application(&mut self, id: &str) -> Option<Application> {
        let idx = self.applications.iter().position(|a| a.id == id)?;
        Some(self.applications.remove(idx))
    }

    pub fn interviews(&self) -> &[Interview] {
        &self.interviews
    }

    pub fn interview_month(&self) -> Option<(i32, u32)> {
        self.interview_month
    }

    pub fn find_interview(&self, id: &str) -> Option<&Interview> {
        self.interviews.iter().find(|i| i.id == id)
    }

    pub fn upsert_interview(&mut self, interview: Interview) {
        match self.interviews.iter_mut().find(|i| i.id == interview.id) {
            Some(slot) => *slot = interview,
            None => self.interviews.push(interview),
        }
    }

    pub fn remove_interview(&mut self, id: &str) -> Option<Interview> {
        let idx = self.interviews.iter().position(|i| i.id == id)?;
        Some(self.interviews.remove(idx))
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn set_profile(&mut self, profile: Profile) -> &Profile {
        self.profile.insert(profile)
    }

    pub fn application_sort(&self) -> &SortState<ApplicationColumn> {
        &self.application_sort
    }

    pub fn application_sort_mut(&mut self) -> &mut SortState<ApplicationColumn> {
        &mut self.application_sort
    }

    pub fn interview_sort(&self) -> &SortState<InterviewColumn> {
        &self.interview_sort
    }

    pub fn interview_sort_mut(&mut self) -> &mut SortState<InterviewColumn> {
        &mut self.interview_sort
    }
}
