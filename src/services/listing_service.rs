use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::utils::time;

/// Value a row is ordered by for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    /// Already lowercased.
    Text(String),
    /// `None` when the stored value does not parse.
    Time(Option<NaiveDateTime>),
}

impl SortKey {
    pub fn text(value: &str) -> Self {
        SortKey::Text(value.to_lowercase())
    }

    pub fn time(value: &str) -> Self {
        SortKey::Time(time::parse_datetime(value))
    }

    fn compare(&self, other: &SortKey, direction: SortDirection) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => direction.apply(a.cmp(b)),
            (SortKey::Time(Some(a)), SortKey::Time(Some(b))) => direction.apply(a.cmp(b)),
            // unreadable dates stay at the bottom whichever way the list runs
            (SortKey::Time(Some(_)), SortKey::Time(None)) => Ordering::Less,
            (SortKey::Time(None), SortKey::Time(Some(_))) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

pub trait Sortable {
    type Column: Copy + PartialEq + fmt::Debug;

    fn sort_key(&self, column: Self::Column) -> SortKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Remembers the last sorted column so a repeated request flips direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortState<C> {
    pub column: Option<C>,
    pub direction: SortDirection,
}

impl<C> Default for SortState<C> {
    fn default() -> Self {
        Self {
            column: None,
            direction: SortDirection::Ascending,
        }
    }
}

impl<C: Copy + PartialEq> SortState<C> {
    pub fn request(&mut self, column: C) -> SortDirection {
        if self.column == Some(column) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Ascending;
        }
        self.direction
    }

    pub fn current(&self) -> Option<(C, SortDirection)> {
        self.column.map(|column| (column, self.direction))
    }
}

pub struct ListingService;

impl ListingService {
    /// Case-insensitive substring match on any searchable field. A blank
    /// query keeps every item in its original order.
    pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return items.iter().collect();
        }
        items
            .iter()
            .filter(|item| {
                item.search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Stable sort: rows with equal keys keep their relative order in both
    /// directions. Keys are computed once per row.
    pub fn sort<'a, T: Sortable>(
        rows: &mut [&'a T],
        column: T::Column,
        direction: SortDirection,
    ) {
        let mut keyed: Vec<(SortKey, &'a T)> =
            rows.iter().map(|row| (row.sort_key(column), *row)).collect();
        keyed.sort_by(|(a, _), (b, _)| a.compare(b, direction));
        for (slot, (_, row)) in rows.iter_mut().zip(keyed) {
            *slot = row;
        }
    }

    pub fn view<'a, T: Searchable + Sortable>(
        items: &'a [T],
        query: &str,
        sort: Option<(T::Column, SortDirection)>,
    ) -> Vec<&'a T> {
        let mut rows = Self::filter(items, query);
        if let Some((column, direction)) = sort {
            Self::sort(&mut rows, column, direction);
        }
        rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationColumn {
    JobTitle,
    Company,
    ApplicationDate,
    Status,
}

impl FromStr for ApplicationColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "job_title" | "title" => Ok(Self::JobTitle),
            "company" => Ok(Self::Company),
            "application_date" | "date" => Ok(Self::ApplicationDate),
            "status" => Ok(Self::Status),
            other => Err(format!("cannot sort applications by '{}'", other)),
        }
    }
}

impl Searchable for Application {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.job_title.as_str(),
            self.company.as_str(),
            self.status.label(),
        ]
    }
}

impl Sortable for Application {
    type Column = ApplicationColumn;

    fn sort_key(&self, column: ApplicationColumn) -> SortKey {
        match column {
            ApplicationColumn::JobTitle => SortKey::text(&self.job_title),
            ApplicationColumn::Company => SortKey::text(&self.company),
            ApplicationColumn::ApplicationDate => SortKey::time(&self.application_date),
            ApplicationColumn::Status => SortKey::text(self.status.label()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewColumn {
    Title,
    Start,
    End,
    Location,
    Type,
}

impl FromStr for InterviewColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interview_title" | "title" => Ok(Self::Title),
            "start_datetime" | "start" => Ok(Self::Start),
            "end_datetime" | "end" => Ok(Self::End),
            "location" => Ok(Self::Location),
            "interview_type" | "type" => Ok(Self::Type),
            other => Err(format!("cannot sort interviews by '{}'", other)),
        }
    }
}

impl Searchable for Interview {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.interview_title.as_str(),
            self.location.as_deref().unwrap_or(""),
            self.interview_type.as_deref().unwrap_or(""),
        ]
    }
}

impl Sortable for Interview {
    type Column = InterviewColumn;

    fn sort_key(&self, column: InterviewColumn) -> SortKey {
        match column {
            InterviewColumn::Title => SortKey::text(&self.interview_title),
            InterviewColumn::Start => SortKey::time(&self.start_datetime),
            InterviewColumn::End => SortKey::time(&self.end_datetime),
            InterviewColumn::Location => SortKey::text(self.location.as_deref().unwrap_or("")),
            InterviewColumn::Type => SortKey::text(self.interview_type.as_deref().unwrap_or("")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;

    fn app(id: &str, title: &str, company: &str, date: &str, status: ApplicationStatus) -> Application {
        Application {
            id: id.into(),
            job_title: title.into(),
            company: company.into(),
            application_date: date.into(),
            status,
            link: None,
            description: None,
            cv_file: None,
            cover_letter_notes: None,
        }
    }

    fn sample() -> Vec<Application> {
        vec![
            app("1", "Backend Engineer", "Acme", "2024-03-10", ApplicationStatus::Applied),
            app("2", "data analyst", "Globex", "2024-01-02", ApplicationStatus::Offer),
            app("3", "Frontend Engineer", "Initech", "2024-02-20", ApplicationStatus::Interview),
            app("4", "Analyst", "acme labs", "2024-01-02", ApplicationStatus::Rejection),
        ]
    }

    fn ids(rows: &[&Application]) -> Vec<String> {
        rows.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn blank_query_returns_everything_in_order() {
        let apps = sample();
        assert_eq!(ids(&ListingService::filter(&apps, "")), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(&ListingService::filter(&apps, "   ")), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn query_matches_any_field_case_insensitively() {
        let apps = sample();
        assert_eq!(ids(&ListingService::filter(&apps, "ACME")), vec!["1", "4"]);
        assert_eq!(ids(&ListingService::filter(&apps, "analyst")), vec!["2", "4"]);
        assert_eq!(ids(&ListingService::filter(&apps, "offer")), vec!["2"]);
        assert!(ListingService::filter(&apps, "nothing").is_empty());
    }

    #[test]
    fn date_column_sorts_by_time_and_keeps_ties_stable() {
        let apps = sample();
        let mut rows: Vec<&Application> = apps.iter().collect();
        ListingService::sort(&mut rows, ApplicationColumn::ApplicationDate, SortDirection::Ascending);
        assert_eq!(ids(&rows), vec!["2", "4", "3", "1"]);

        ListingService::sort(&mut rows, ApplicationColumn::ApplicationDate, SortDirection::Descending);
        assert_eq!(ids(&rows), vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn text_columns_ignore_case() {
        let apps = sample();
        let rows = ListingService::view(
            &apps,
            "",
            Some((ApplicationColumn::Company, SortDirection::Ascending)),
        );
        assert_eq!(ids(&rows), vec!["1", "4", "2", "3"]);
    }

    #[test]
    fn toggling_twice_restores_ascending_order() {
        let apps = sample();
        let mut state = SortState::default();
        let column = ApplicationColumn::ApplicationDate;

        let first = ListingService::view(&apps, "", Some((column, state.request(column))));
        let second = ListingService::view(&apps, "", Some((column, state.request(column))));
        let third = ListingService::view(&apps, "", Some((column, state.request(column))));

        assert_eq!(state.direction, SortDirection::Ascending);
        assert_ne!(ids(&first), ids(&second));
        assert_eq!(ids(&first), ids(&third));
    }

    #[test]
    fn switching_column_resets_to_ascending() {
        let mut state = SortState::default();
        assert_eq!(state.request(ApplicationColumn::Company), SortDirection::Ascending);
        assert_eq!(state.request(ApplicationColumn::Company), SortDirection::Descending);
        assert_eq!(state.request(ApplicationColumn::Status), SortDirection::Ascending);
        assert_eq!(state.current(), Some((ApplicationColumn::Status, SortDirection::Ascending)));
    }

    #[test]
    fn unreadable_dates_sink_in_both_directions() {
        let apps = vec![
            app("bad", "A", "A", "someday", ApplicationStatus::Applied),
            app("old", "B", "B", "2023-01-01", ApplicationStatus::Applied),
            app("new", "C", "C", "2024-01-01", ApplicationStatus::Applied),
        ];
        let asc = ListingService::view(
            &apps,
            "",
            Some((ApplicationColumn::ApplicationDate, SortDirection::Ascending)),
        );
        assert_eq!(ids(&asc), vec!["old", "new", "bad"]);
        let desc = ListingService::view(
            &apps,
            "",
            Some((ApplicationColumn::ApplicationDate, SortDirection::Descending)),
        );
        assert_eq!(ids(&desc), vec!["new", "old", "bad"]);
    }

    #[test]
    fn interviews_search_title_location_and_type() {
        let interviews = vec![
            Interview {
                id: "i1".into(),
                interview_title: "Phone screen".into(),
                start_datetime: "2024-05-02T10:00".into(),
                end_datetime: "2024-05-02T10:30".into(),
                location: Some("Zoom".into()),
                interview_type: None,
                notes: None,
            },
            Interview {
                id: "i2".into(),
                interview_title: "Onsite".into(),
                start_datetime: "2024-05-01T10:00".into(),
                end_datetime: "2024-05-01T15:00".into(),
                location: None,
                interview_type: Some("Technical".into()),
                notes: Some("zoom link in email".into()),
            },
        ];
        let zoom = ListingService::filter(&interviews, "zoom");
        assert_eq!(zoom.len(), 1);
        assert_eq!(zoom[0].id, "i1");

        let by_start = ListingService::view(
            &interviews,
            "",
            Some((InterviewColumn::Start, SortDirection::Ascending)),
        );
        assert_eq!(by_start[0].id, "i2");
        assert_eq!("type".parse::<InterviewColumn>(), Ok(InterviewColumn::Type));
        assert!("salary".parse::<ApplicationColumn>().is_err());
    }
}
