use crate::domain::owner::OwnerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

record_id!(
    /// Unique identifier for a project
    ProjectId,
    "project"
);

record_id!(
    /// Unique identifier for a time entry
    TimeEntryId,
    "time entry"
);

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
    Completed,
}

/// A project that tasks and tracked time belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub color: String,
    pub status: ProjectStatus,
    /// Weekly target in hours, 0 when the project has no goal
    pub hours_per_week: f64,
    pub owner_id: OwnerId,
}

impl Project {
    pub fn new(name: String, owner_id: OwnerId) -> Self {
        Self {
            id: ProjectId::generate(),
            name,
            color: "hsl(var(--chart-1))".to_string(),
            status: ProjectStatus::Active,
            hours_per_week: 0.0,
            owner_id,
        }
    }

    /// Active projects with a positive weekly target
    pub fn has_weekly_goal(&self) -> bool {
        self.status == ProjectStatus::Active && self.hours_per_week > 0.0
    }
}

/// A block of time tracked against a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: TimeEntryId,
    pub project_id: ProjectId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Duration in whole seconds
    pub duration: u64,
    pub owner_id: OwnerId,
}

impl TimeEntry {
    /// Creates an entry whose duration is the wall time between start and end
    pub fn new(
        project_id: ProjectId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        owner_id: OwnerId,
    ) -> Self {
        let seconds = (end_time - start_time).num_seconds().max(0);
        Self::with_duration(project_id, start_time, end_time, seconds as u64, owner_id)
    }

    /// Creates an entry with an explicit duration, e.g. time actually spent
    /// running when the session was paused in between
    pub fn with_duration(
        project_id: ProjectId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        duration: u64,
        owner_id: OwnerId,
    ) -> Self {
        Self {
            id: TimeEntryId::generate(),
            project_id,
            start_time,
            end_time,
            duration,
            owner_id,
        }
    }

    pub fn hours(&self) -> f64 {
        self.duration as f64 / 3600.0
    }
}
