//! Plain-text views over the data the controller hands out.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::controller::CalendarView;
use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::models::profile::Profile;
use crate::services::calendar_service::{MiniMonth, MonthGrid};
use crate::services::dashboard_service::{Bucket, Dashboard, DashboardScope};
use crate::services::listing_service::{ApplicationColumn, InterviewColumn, SortDirection};

const MAX_CELL: usize = 40;
const BAR_WIDTH: usize = 30;
const WEEKDAYS: &str = "Su Mo Tu We Th Fr Sa";

pub fn applications(
    rows: &[&Application],
    sort: Option<(ApplicationColumn, SortDirection)>,
) -> String {
    if rows.is_empty() {
        return "No applications found.\n".to_string();
    }
    let columns = [
        (ApplicationColumn::JobTitle, "Job title"),
        (ApplicationColumn::Company, "Company"),
        (ApplicationColumn::ApplicationDate, "Applied"),
        (ApplicationColumn::Status, "Status"),
    ];
    let mut headers = vec!["ID".to_string()];
    headers.extend(columns.iter().map(|(c, label)| header(label, *c, sort)));

    let body = rows
        .iter()
        .map(|app| {
            vec![
                app.id.clone(),
                app.job_title.clone(),
                app.company.clone(),
                date_cell(app.applied_on(), &app.application_date),
                app.status.label().to_string(),
            ]
        })
        .collect();
    table(&headers, body)
}

pub fn interviews(rows: &[&Interview], sort: Option<(InterviewColumn, SortDirection)>) -> String {
    if rows.is_empty() {
        return "No interviews found.\n".to_string();
    }
    let columns = [
        (InterviewColumn::Title, "Title"),
        (InterviewColumn::Start, "Start"),
        (InterviewColumn::End, "End"),
        (InterviewColumn::Location, "Location"),
        (InterviewColumn::Type, "Type"),
    ];
    let mut headers = vec!["ID".to_string()];
    headers.extend(columns.iter().map(|(c, label)| header(label, *c, sort)));

    let body = rows
        .iter()
        .map(|i| {
            vec![
                i.id.clone(),
                i.interview_title.clone(),
                datetime_cell(i.start(), &i.start_datetime),
                datetime_cell(i.end(), &i.end_datetime),
                i.location.clone().unwrap_or_default(),
                i.type_label().to_string(),
            ]
        })
        .collect();
    table(&headers, body)
}

pub fn calendar(view: &CalendarView) -> String {
    let mut out = month_grid(&view.grid);
    for mini in &view.upcoming {
        out.push('\n');
        out.push_str(&mini_month(mini));
    }
    out
}

/// Month grid with `*` on days that have interviews, followed by the agenda.
pub fn month_grid(grid: &MonthGrid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", month_title(grid.year, grid.month));
    let _ = writeln!(out, "{}", WEEKDAYS);
    for week in grid.weeks() {
        let cells: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(day) if !day.events.is_empty() => format!("{:>2}*", day.day),
                Some(day) => format!("{:>2} ", day.day),
                None => "   ".to_string(),
            })
            .collect();
        let _ = writeln!(out, "{}", cells.concat().trim_end());
    }

    if grid.event_count() > 0 {
        out.push('\n');
        for day in grid.days.iter().filter(|d| !d.events.is_empty()) {
            let _ = writeln!(out, "{}", day.date.format("%a %d %b"));
            for event in &day.events {
                let time = event
                    .start()
                    .map(|s| s.format("%H:%M").to_string())
                    .unwrap_or_default();
                let _ = writeln!(out, "  {} {} [{}]", time, event.interview_title, event.type_label());
            }
        }
    }
    out
}

pub fn mini_month(mini: &MiniMonth) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", month_title(mini.year, mini.month));
    let _ = writeln!(out, "{}", WEEKDAYS);
    for week in mini.weeks() {
        let cells: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(day) if day.has_event => format!("{:>2}*", day.day),
                Some(day) => format!("{:>2} ", day.day),
                None => "   ".to_string(),
            })
            .collect();
        let _ = writeln!(out, "{}", cells.concat().trim_end());
    }
    out
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let scope = match dashboard.scope {
        DashboardScope::Monthly { year, month } => month_title(year, month),
        DashboardScope::AllTime => "All time".to_string(),
    };
    let summary = &dashboard.summary;
    let _ = writeln!(out, "Dashboard: {}", scope);
    let _ = writeln!(out, "  Applications:        {}", summary.total_applications);
    let _ = writeln!(out, "  Interviews:          {}", summary.total_interviews);
    let _ = writeln!(out, "  Upcoming interviews: {}", summary.upcoming_interviews);
    let _ = writeln!(out, "  Offer rate:          {:.1}%", summary.offer_rate);
    let _ = writeln!(out, "  Response rate:       {:.1}%", summary.response_rate);
    if let Some(next) = &summary.next_interview {
        let _ = writeln!(
            out,
            "  Next interview:      {} ({})",
            next.interview_title,
            datetime_cell(next.start(), &next.start_datetime)
        );
    }

    let sections: [(&str, &[Bucket]); 6] = [
        ("Applications by status", dashboard.by_status.as_slice()),
        ("Interviews by type", dashboard.by_interview_type.as_slice()),
        ("Skills by level", dashboard.by_skill_level.as_slice()),
        ("Top job titles", dashboard.top_job_titles.as_slice()),
        ("Applications over time", dashboard.application_trend.as_slice()),
        ("Interviews over time", dashboard.interview_trend.as_slice()),
    ];
    for (title, buckets) in sections {
        out.push('\n');
        out.push_str(&bar_chart(title, buckets));
    }
    out
}

pub fn bar_chart(title: &str, buckets: &[Bucket]) -> String {
    let mut out = format!("{}\n", title);
    if buckets.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    let label_width = buckets.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    for bucket in buckets {
        let len = if max == 0 { 0 } else { bucket.count * BAR_WIDTH / max };
        let _ = writeln!(
            out,
            "  {:<width$} {:>4} {}",
            bucket.label,
            bucket.count,
            "#".repeat(len),
            width = label_width
        );
    }
    out
}

pub fn profile(profile: &Profile) -> String {
    let mut out = String::new();
    let or_dash = |s: &str| if s.trim().is_empty() { "-".to_string() } else { s.to_string() };
    let _ = writeln!(out, "{}", or_dash(&profile.full_name));
    let _ = writeln!(out, "  Email:    {}", or_dash(&profile.email));
    let _ = writeln!(out, "  Phone:    {}", or_dash(&profile.phone));
    let _ = writeln!(out, "  Location: {}", or_dash(&profile.location));
    for (label, link) in [
        ("LinkedIn", &profile.linkedin_url),
        ("GitHub", &profile.github_url),
        ("Website", &profile.portfolio_url),
    ] {
        if let Some(link) = link {
            let _ = writeln!(out, "  {:<9} {}", format!("{}:", label), link);
        }
    }
    if let Some(cv) = &profile.cv_profile_file {
        let _ = writeln!(out, "  CV:       {}", cv);
    }
    if !profile.summary.trim().is_empty() {
        let _ = writeln!(out, "\n{}", profile.summary.trim());
    }

    if !profile.experience.is_empty() {
        let _ = writeln!(out, "\nExperience");
        for (idx, e) in profile.experience.iter().enumerate() {
            let until = e.end_date.as_deref().unwrap_or("present");
            let _ = writeln!(out, "  [{}] {} at {} ({} - {})", idx, e.position, e.company, e.start_date, until);
        }
    }
    if !profile.education.is_empty() {
        let _ = writeln!(out, "\nEducation");
        for (idx, e) in profile.education.iter().enumerate() {
            let gpa = e.gpa.map(|g| format!(", GPA {:.2}", g)).unwrap_or_default();
            let _ = writeln!(out, "  [{}] {}, {} ({}{})", idx, e.degree, e.institution, e.graduation_year, gpa);
        }
    }
    if !profile.skills.is_empty() {
        let _ = writeln!(out, "\nSkills");
        for (idx, s) in profile.skills.iter().enumerate() {
            let _ = writeln!(out, "  [{}] {} ({})", idx, s.name, or_dash(&s.level));
        }
    }
    for (title, items) in [("Languages", &profile.languages), ("Certifications", &profile.certifications)] {
        if !items.is_empty() {
            let _ = writeln!(out, "\n{}", title);
            for (idx, item) in items.iter().enumerate() {
                let _ = writeln!(out, "  [{}] {}", idx, item);
            }
        }
    }
    out
}

fn header<C: PartialEq>(label: &str, column: C, sort: Option<(C, SortDirection)>) -> String {
    match sort {
        Some((sorted, SortDirection::Ascending)) if sorted == column => format!("{} ^", label),
        Some((sorted, SortDirection::Descending)) if sorted == column => format!("{} v", label),
        _ => label.to_string(),
    }
}

fn month_title(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", year, month))
}

/// Unreadable dates are shown as stored, flagged.
fn date_cell(parsed: Option<NaiveDate>, raw: &str) -> String {
    match parsed {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None if raw.trim().is_empty() => "-".to_string(),
        None => format!("{} (invalid)", raw),
    }
}

fn datetime_cell(parsed: Option<chrono::NaiveDateTime>, raw: &str) -> String {
    match parsed {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None if raw.trim().is_empty() => "-".to_string(),
        None => format!("{} (invalid)", raw),
    }
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL {
        return cell.to_string();
    }
    let mut short: String = cell.chars().take(MAX_CELL - 3).collect();
    short.push_str("...");
    short
}

fn table(headers: &[String], rows: Vec<Vec<String>>) -> String {
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.iter().map(|c| truncate(c)).collect())
        .collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(headers));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &rows {
        let _ = writeln!(out, "{}", line(row));
    }
    out
}
