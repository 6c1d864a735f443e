use chrono::NaiveDateTime;
use tracing::debug;

use crate::models::interview::Interview;
use crate::utils::time;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("This interview overlaps with \"{title}\" ({start} - {end})")]
    Overlap {
        id: String,
        title: String,
        start: String,
        end: String,
    },
}

/// Half-open interval `[start, end)` in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ScheduleError> {
        if start >= end {
            return Err(ScheduleError::InvalidTimeRange(
                "the end time must be after the start time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ScheduleError> {
        let start_at = time::parse_datetime(start).ok_or_else(|| {
            ScheduleError::InvalidTimeRange(format!("start '{}' is not a valid date and time", start))
        })?;
        let end_at = time::parse_datetime(end).ok_or_else(|| {
            ScheduleError::InvalidTimeRange(format!("end '{}' is not a valid date and time", end))
        })?;
        Self::new(start_at, end_at)
    }

    /// Range of a stored interview, if both of its timestamps are usable.
    pub fn of(interview: &Interview) -> Option<Self> {
        let (start, end) = (interview.start()?, interview.end()?);
        Self::new(start, end).ok()
    }

    /// Touching endpoints do not count as overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}

pub struct ScheduleService;

impl ScheduleService {
    /// First stored interview that intersects `candidate`, skipping the one
    /// being edited and any record whose own times cannot be read.
    pub fn find_conflict<'a>(
        candidate: &TimeRange,
        interviews: &'a [Interview],
        exclude_id: Option<&str>,
    ) -> Option<&'a Interview> {
        interviews
            .iter()
            .filter(|existing| exclude_id != Some(existing.id.as_str()))
            .find(|existing| {
                TimeRange::of(existing)
                    .map(|range| candidate.overlaps(&range))
                    .unwrap_or(false)
            })
    }

    /// Parses and checks a proposed slot against everything already booked.
    pub fn check(
        start: &str,
        end: &str,
        interviews: &[Interview],
        exclude_id: Option<&str>,
    ) -> Result<TimeRange, ScheduleError> {
        let range = TimeRange::parse(start, end)?;
        Self::ensure_free(&range, interviews, exclude_id)?;
        Ok(range)
    }

    pub fn ensure_free(
        range: &TimeRange,
        interviews: &[Interview],
        exclude_id: Option<&str>,
    ) -> Result<(), ScheduleError> {
        match Self::find_conflict(range, interviews, exclude_id) {
            Some(conflict) => {
                debug!(conflict_id = %conflict.id, "proposed interview overlaps an existing one");
                Err(ScheduleError::Overlap {
                    id: conflict.id.clone(),
                    title: conflict.interview_title.clone(),
                    start: conflict.start_datetime.clone(),
                    end: conflict.end_datetime.clone(),
                })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interview(id: &str, start: &str, end: &str) -> Interview {
        Interview {
            id: id.to_string(),
            interview_title: format!("Interview {}", id),
            start_datetime: start.to_string(),
            end_datetime: end.to_string(),
            location: None,
            interview_type: None,
            notes: None,
        }
    }

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).expect("valid range")
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = range("2024-05-01T09:00", "2024-05-01T10:00");
        let b = range("2024-05-01T10:00", "2024-05-01T11:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn intersecting_intervals_overlap() {
        let a = range("2024-05-01T09:00", "2024-05-01T10:30");
        let b = range("2024-05-01T10:00", "2024-05-01T11:00");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let outer = range("2024-05-01T08:00", "2024-05-01T12:00");
        assert!(outer.overlaps(&a));
        assert!(a.overlaps(&outer));
    }

    #[test]
    fn overlap_is_symmetric_over_a_grid_of_slots() {
        let hours: Vec<String> = (8..=12).map(|h| format!("2024-05-01T{:02}:00", h)).collect();
        for (i, s1) in hours.iter().enumerate() {
            for e1 in &hours[i + 1..] {
                for (j, s2) in hours.iter().enumerate() {
                    for e2 in &hours[j + 1..] {
                        let a = range(s1, e1);
                        let b = range(s2, e2);
                        let disjoint = a.end <= b.start || b.end <= a.start;
                        assert_eq!(a.overlaps(&b), !disjoint);
                        assert_eq!(a.overlaps(&b), b.overlaps(&a));
                    }
                }
            }
        }
    }

    #[test]
    fn rejects_unparseable_or_reversed_ranges() {
        assert!(matches!(
            TimeRange::parse("soon", "2024-05-01T10:00"),
            Err(ScheduleError::InvalidTimeRange(_))
        ));
        assert!(matches!(
            TimeRange::parse("2024-05-01T10:00", ""),
            Err(ScheduleError::InvalidTimeRange(_))
        ));
        assert!(matches!(
            TimeRange::parse("2024-05-01T10:00", "2024-05-01T10:00"),
            Err(ScheduleError::InvalidTimeRange(_))
        ));
    }

    #[test]
    fn conflict_scan_skips_the_edited_interview() {
        let booked = vec![
            interview("1", "2024-05-01T09:00", "2024-05-01T10:00"),
            interview("2", "2024-05-01T13:00", "2024-05-01T14:00"),
        ];
        let moved = range("2024-05-01T09:30", "2024-05-01T10:30");

        let conflict = ScheduleService::find_conflict(&moved, &booked, None);
        assert_eq!(conflict.map(|i| i.id.as_str()), Some("1"));
        assert!(ScheduleService::find_conflict(&moved, &booked, Some("1")).is_none());
    }

    #[test]
    fn records_with_broken_times_never_conflict() {
        let booked = vec![interview("x", "garbage", "2024-05-01T10:00")];
        let slot = range("2024-05-01T09:00", "2024-05-01T10:00");
        assert!(ScheduleService::ensure_free(&slot, &booked, None).is_ok());
    }

    #[test]
    fn check_reports_the_conflicting_interview() {
        let booked = vec![interview("7", "2024-05-02T15:00", "2024-05-02T16:00")];
        let err = ScheduleService::check("2024-05-02T15:30", "2024-05-02T17:00", &booked, None)
            .unwrap_err();
        match err {
            ScheduleError::Overlap { id, title, .. } => {
                assert_eq!(id, "7");
                assert_eq!(title, "Interview 7");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
