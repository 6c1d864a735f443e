use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::Interview;
use crate::models::profile::{Skill, SKILL_LEVELS};
use crate::utils::time::{self, Clock};

pub const TOP_TITLES: usize = 5;
const UNSPECIFIED: &str = "Unspecified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DashboardScope {
    Monthly { year: i32, month: u32 },
    AllTime,
}

impl DashboardScope {
    /// Whether an entity dated `date` is counted. Undated entities only count
    /// in the all-time view.
    fn admits(&self, date: Option<NaiveDate>) -> bool {
        match (self, date) {
            (DashboardScope::AllTime, _) => true,
            (DashboardScope::Monthly { year, month }, Some(d)) => {
                d.year() == *year && d.month() == *month
            }
            (DashboardScope::Monthly { .. }, None) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

impl Bucket {
    fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_applications: usize,
    pub total_interviews: usize,
    pub upcoming_interviews: usize,
    pub next_interview: Option<Interview>,
    /// Percentages, 0 when there are no applications.
    pub offer_rate: f64,
    pub response_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub scope: DashboardScope,
    pub summary: DashboardSummary,
    pub by_status: Vec<Bucket>,
    pub by_interview_type: Vec<Bucket>,
    pub by_skill_level: Vec<Bucket>,
    pub application_trend: Vec<Bucket>,
    pub interview_trend: Vec<Bucket>,
    pub top_job_titles: Vec<Bucket>,
}

pub struct DashboardService;

impl DashboardService {
    pub fn build<C: Clock + ?Sized>(
        applications: &[Application],
        interviews: &[Interview],
        skills: &[Skill],
        scope: DashboardScope,
        clock: &C,
    ) -> Result<Dashboard> {
        Ok(Dashboard {
            scope,
            summary: Self::summary(applications, interviews, scope, clock),
            by_status: Self::status_counts(applications, scope),
            by_interview_type: Self::interview_type_counts(interviews, scope),
            by_skill_level: Self::skill_level_counts(skills),
            application_trend: Self::application_trend(applications, scope)?,
            interview_trend: Self::interview_trend(interviews, scope)?,
            top_job_titles: Self::top_job_titles(applications, scope, TOP_TITLES),
        })
    }

    /// All four statuses, in declaration order, even when zero.
    pub fn status_counts(applications: &[Application], scope: DashboardScope) -> Vec<Bucket> {
        let mut counts: HashMap<ApplicationStatus, usize> = HashMap::new();
        for app in applications.iter().filter(|a| scope.admits(a.applied_on())) {
            *counts.entry(app.status).or_default() += 1;
        }
        ApplicationStatus::ALL
            .into_iter()
            .map(|status| Bucket::new(status.label(), counts.get(&status).copied().unwrap_or(0)))
            .collect()
    }

    pub fn interview_type_counts(interviews: &[Interview], scope: DashboardScope) -> Vec<Bucket> {
        count_first_seen(
            interviews
                .iter()
                .filter(|i| scope.admits(i.start().map(|s| s.date())))
                .map(|i| i.type_label().to_string()),
        )
    }

    /// Canonical levels first (zero-filled), then any custom level.
    pub fn skill_level_counts(skills: &[Skill]) -> Vec<Bucket> {
        let mut buckets: Vec<Bucket> = SKILL_LEVELS.iter().map(|l| Bucket::new(*l, 0)).collect();
        let extra = count_first_seen(skills.iter().map(|skill| {
            let level = skill.level.trim();
            if level.is_empty() {
                UNSPECIFIED.to_string()
            } else {
                level.to_string()
            }
        }));

        for bucket in extra {
            match buckets
                .iter_mut()
                .find(|b| b.label.eq_ignore_ascii_case(&bucket.label))
            {
                Some(known) => known.count += bucket.count,
                None => buckets.push(bucket),
            }
        }
        buckets
    }

    pub fn application_trend(
        applications: &[Application],
        scope: DashboardScope,
    ) -> Result<Vec<Bucket>> {
        trend(applications.iter().map(Application::applied_on), scope)
    }

    pub fn interview_trend(interviews: &[Interview], scope: DashboardScope) -> Result<Vec<Bucket>> {
        trend(interviews.iter().map(|i| i.start().map(|s| s.date())), scope)
    }

    /// Most frequent titles, ties in first-seen order.
    pub fn top_job_titles(
        applications: &[Application],
        scope: DashboardScope,
        limit: usize,
    ) -> Vec<Bucket> {
        let mut buckets = count_first_seen(
            applications
                .iter()
                .filter(|a| scope.admits(a.applied_on()))
                .map(|a| a.job_title.trim())
                .filter(|title| !title.is_empty())
                .map(str::to_string),
        );
        buckets.sort_by(|a, b| b.count.cmp(&a.count));
        buckets.truncate(limit);
        buckets
    }

    pub fn summary<C: Clock + ?Sized>(
        applications: &[Application],
        interviews: &[Interview],
        scope: DashboardScope,
        clock: &C,
    ) -> DashboardSummary {
        let scoped_apps: Vec<&Application> = applications
            .iter()
            .filter(|a| scope.admits(a.applied_on()))
            .collect();
        let total_interviews = interviews
            .iter()
            .filter(|i| scope.admits(i.start().map(|s| s.date())))
            .count();

        let now = clock.now();
        let mut upcoming: Vec<(chrono::NaiveDateTime, &Interview)> = interviews
            .iter()
            .filter_map(|i| i.start().map(|start| (start, i)))
            .filter(|(start, _)| *start >= now)
            .collect();
        upcoming.sort_by_key(|(start, _)| *start);

        let total = scoped_apps.len();
        let offers = scoped_apps
            .iter()
            .filter(|a| a.status == ApplicationStatus::Offer)
            .count();
        let responded = scoped_apps
            .iter()
            .filter(|a| a.status != ApplicationStatus::Applied)
            .count();

        DashboardSummary {
            total_applications: total,
            total_interviews,
            upcoming_interviews: upcoming.len(),
            next_interview: upcoming.first().map(|(_, i)| (*i).clone()),
            offer_rate: percent(offers, total),
            response_rate: percent(responded, total),
        }
    }
}

/// Monthly scope: one bucket per day of the month. All-time: one bucket per
/// `YYYY-MM`, in key order. Undated entries are skipped.
fn trend(
    dates: impl Iterator<Item = Option<NaiveDate>>,
    scope: DashboardScope,
) -> Result<Vec<Bucket>> {
    match scope {
        DashboardScope::Monthly { year, month } => {
            let days = time::days_in_month(year, month).ok_or_else(|| {
                Error::Validation(format!("{}-{:02} is not a valid month", year, month))
            })?;
            let mut counts = vec![0usize; days as usize];
            for date in dates.flatten() {
                if date.year() == year && date.month() == month {
                    counts[(date.day() - 1) as usize] += 1;
                }
            }
            Ok(counts
                .into_iter()
                .enumerate()
                .map(|(idx, count)| Bucket::new((idx + 1).to_string(), count))
                .collect())
        }
        DashboardScope::AllTime => {
            let mut months: BTreeMap<String, usize> = BTreeMap::new();
            for date in dates.flatten() {
                *months.entry(time::month_key(date)).or_default() += 1;
            }
            Ok(months
                .into_iter()
                .map(|(label, count)| Bucket::new(label, count))
                .collect())
        }
    }
}

fn count_first_seen(labels: impl Iterator<Item = String>) -> Vec<Bucket> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();
    for label in labels {
        match index.get(&label) {
            Some(&pos) => buckets[pos].count += 1,
            None => {
                index.insert(label.clone(), buckets.len());
                buckets.push(Bucket::new(label, 1));
            }
        }
    }
    buckets
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}
