use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::interview::Interview;
use crate::utils::time;

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    /// Interviews starting on this date, earliest first.
    pub events: Vec<Interview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st; equals the weekday of the 1st (Sunday = 0).
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthGrid {
    pub fn weeks(&self) -> Vec<[Option<&CalendarDay>; 7]> {
        chunk_weeks(self.leading_blanks, &self.days)
    }

    pub fn event_count(&self) -> usize {
        self.days.iter().map(|d| d.events.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MiniDay {
    pub day: u32,
    pub has_event: bool,
}

/// Preview of a month: same shape as [`MonthGrid`], no event details.
#[derive(Debug, Clone, Serialize)]
pub struct MiniMonth {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days: Vec<MiniDay>,
}

impl MiniMonth {
    pub fn weeks(&self) -> Vec<[Option<&MiniDay>; 7]> {
        chunk_weeks(self.leading_blanks, &self.days)
    }
}

pub const MAX_MINI_MONTHS: usize = 24;

pub struct CalendarService;

impl CalendarService {
    pub fn month_grid(year: i32, month: u32, interviews: &[Interview]) -> Result<MonthGrid> {
        let (leading_blanks, day_count) = month_shape(year, month)?;
        let mut buckets: Vec<Vec<(NaiveDateTime, &Interview)>> = vec![Vec::new(); day_count as usize];

        for interview in interviews {
            let Some(start) = interview.start() else {
                continue;
            };
            if start.year() == year && start.month() == month {
                buckets[(start.day() - 1) as usize].push((start, interview));
            }
        }

        let days = buckets
            .into_iter()
            .enumerate()
            .filter_map(|(idx, mut events)| {
                let day = idx as u32 + 1;
                events.sort_by_key(|(start, _)| *start);
                NaiveDate::from_ymd_opt(year, month, day).map(|date| CalendarDay {
                    day,
                    date,
                    events: events.into_iter().map(|(_, i)| i.clone()).collect(),
                })
            })
            .collect();

        Ok(MonthGrid {
            year,
            month,
            leading_blanks,
            days,
        })
    }

    pub fn mini_month(year: i32, month: u32, interviews: &[Interview]) -> Result<MiniMonth> {
        let (leading_blanks, day_count) = month_shape(year, month)?;
        let mut marked = vec![false; day_count as usize];

        for start in interviews.iter().filter_map(Interview::start) {
            if start.year() == year && start.month() == month {
                marked[(start.day() - 1) as usize] = true;
            }
        }

        let days = marked
            .into_iter()
            .enumerate()
            .map(|(idx, has_event)| MiniDay {
                day: idx as u32 + 1,
                has_event,
            })
            .collect();

        Ok(MiniMonth {
            year,
            month,
            leading_blanks,
            days,
        })
    }

    /// Previews for the `count` months following (year, month). At most
    /// [`MAX_MINI_MONTHS`].
    pub fn upcoming_mini_months(
        year: i32,
        month: u32,
        count: usize,
        interviews: &[Interview],
    ) -> Result<Vec<MiniMonth>> {
        if count > MAX_MINI_MONTHS {
            return Err(Error::Validation(format!(
                "at most {} month previews can be shown, got {}",
                MAX_MINI_MONTHS, count
            )));
        }
        let mut cursor = (year, month);
        let mut months = Vec::new();
        for _ in 0..count {
            cursor = time::next_month(cursor.0, cursor.1);
            months.push(Self::mini_month(cursor.0, cursor.1, interviews)?);
        }
        Ok(months)
    }
}

fn month_shape(year: i32, month: u32) -> Result<(u32, u32)> {
    let invalid = || Error::Validation(format!("{}-{:02} is not a valid month", year, month));
    let blanks = time::first_weekday(year, month).ok_or_else(invalid)?;
    let days = time::days_in_month(year, month).ok_or_else(invalid)?;
    Ok((blanks, days))
}

fn chunk_weeks<T>(leading_blanks: u32, cells: &[T]) -> Vec<[Option<&T>; 7]> {
    let slots: Vec<Option<&T>> = std::iter::repeat(None)
        .take(leading_blanks as usize)
        .chain(cells.iter().map(Some))
        .collect();

    slots
        .chunks(7)
        .map(|chunk| {
            let mut week = [None; 7];
            week[..chunk.len()].copy_from_slice(chunk);
            week
        })
        .collect()
}
