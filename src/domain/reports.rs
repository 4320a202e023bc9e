//! Dashboard and report aggregates.
//!
//! All functions take the reference day or instant explicitly and are pure
//! over the snapshots they are given.

use crate::domain::{
    habit::{Habit, HabitId, HabitLog, LogDate},
    time_entry::{Project, ProjectId, TimeEntry},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Habit completion for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCompletion {
    pub date: LogDate,
    /// Percentage of active habits completed, rounded
    pub rate: u32,
}

/// Percentage of active habits completed on `date`.
///
/// Each (habit, date) pair counts once; logs of inactive habits and unchecked
/// logs are ignored. With no active habits the rate is 0.
pub fn completion_rate(habits: &[Habit], logs: &[HabitLog], date: LogDate) -> u32 {
    let active: HashSet<&HabitId> = habits.iter().filter(|h| h.active).map(|h| &h.id).collect();
    if active.is_empty() {
        return 0;
    }

    let completed: HashSet<&HabitId> = logs
        .iter()
        .filter(|log| log.completed && log.date == date && active.contains(&log.habit_id))
        .map(|log| &log.habit_id)
        .collect();

    percentage(completed.len() as f64, active.len() as f64)
}

/// Completion rate for each of the `days` days ending at `reference`,
/// oldest first
pub fn completion_history(
    habits: &[Habit],
    logs: &[HabitLog],
    reference: LogDate,
    days: u32,
) -> Vec<DailyCompletion> {
    (0..i64::from(days))
        .rev()
        .filter_map(|offset| reference.add_days(-offset))
        .map(|date| DailyCompletion {
            date,
            rate: completion_rate(habits, logs, date),
        })
        .collect()
}

/// Hours logged against one project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectHours {
    pub project_id: ProjectId,
    pub name: String,
    pub color: String,
    pub hours: f64,
}

/// Total tracked hours per project, in project order
pub fn time_per_project(projects: &[Project], entries: &[TimeEntry]) -> Vec<ProjectHours> {
    projects
        .iter()
        .map(|project| ProjectHours {
            project_id: project.id.clone(),
            name: project.name.clone(),
            color: project.color.clone(),
            hours: hours_for(entries.iter(), &project.id),
        })
        .collect()
}

fn hours_for<'a>(entries: impl Iterator<Item = &'a TimeEntry>, project: &ProjectId) -> f64 {
    let seconds: u64 = entries
        .filter(|entry| &entry.project_id == project)
        .map(|entry| entry.duration)
        .sum();
    seconds as f64 / 3600.0
}

/// One day of the weekly overview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdaySummary {
    pub date: LogDate,
    /// Short weekday name, e.g. `Mon`
    pub label: String,
    pub completion_rate: u32,
    pub hours_by_project: BTreeMap<ProjectId, f64>,
}

/// Monday-to-Sunday summary of the week containing `reference`.
///
/// Time entries are bucketed by the calendar day of their start time.
pub fn weekly_overview(
    habits: &[Habit],
    logs: &[HabitLog],
    projects: &[Project],
    entries: &[TimeEntry],
    reference: LogDate,
) -> Vec<WeekdaySummary> {
    let monday = reference.week_start();
    (0..7)
        .filter_map(|offset| monday.add_days(offset))
        .map(|date| {
            let day_entries: Vec<&TimeEntry> = entries
                .iter()
                .filter(|entry| LogDate::from_timestamp(&entry.start_time) == date)
                .collect();
            let hours_by_project = projects
                .iter()
                .map(|project| {
                    let hours = hours_for(day_entries.iter().copied(), &project.id);
                    (project.id.clone(), hours)
                })
                .collect();

            WeekdaySummary {
                date,
                label: date.as_naive().format("%a").to_string(),
                completion_rate: completion_rate(habits, logs, date),
                hours_by_project,
            }
        })
        .collect()
}

/// Progress of a project towards its weekly hour target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectGoalProgress {
    pub project_id: ProjectId,
    pub name: String,
    pub logged_hours: f64,
    pub target_hours: f64,
    pub progress_percent: f64,
    /// Zero once the goal is reached
    pub remaining_hours: f64,
}

impl ProjectGoalProgress {
    pub fn is_reached(&self) -> bool {
        self.remaining_hours <= 0.0
    }
}

/// Weekly goal progress for active projects with a positive target.
///
/// Counts entries that started between Monday 00:00 (UTC) of the current
/// week and `now`, inclusive.
pub fn project_goals(
    projects: &[Project],
    entries: &[TimeEntry],
    now: DateTime<Utc>,
) -> Vec<ProjectGoalProgress> {
    let week_start = LogDate::from_timestamp(&now)
        .week_start()
        .as_naive()
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc());
    let Some(week_start) = week_start else {
        return Vec::new();
    };

    let this_week: Vec<&TimeEntry> = entries
        .iter()
        .filter(|entry| entry.start_time >= week_start && entry.start_time <= now)
        .collect();

    projects
        .iter()
        .filter(|project| project.has_weekly_goal())
        .map(|project| {
            let logged_hours = hours_for(this_week.iter().copied(), &project.id);
            let target_hours = project.hours_per_week;
            ProjectGoalProgress {
                project_id: project.id.clone(),
                name: project.name.clone(),
                logged_hours,
                target_hours,
                progress_percent: logged_hours / target_hours * 100.0,
                remaining_hours: (target_hours - logged_hours).max(0.0),
            }
        })
        .collect()
}

fn percentage(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 {
        return 0;
    }
    (part / whole * 100.0).round() as u32
}
