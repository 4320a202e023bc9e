use crate::domain::{board::ColumnId, owner::OwnerId, time_entry::ProjectId};
use crate::error::MonolithError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

record_id!(
    /// Unique identifier for a task
    TaskId,
    "task"
);

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Rank used for ordering, most pressing first
    pub fn rank(&self) -> u8 {
        match self {
            Self::Urgent => 1,
            Self::High => 2,
            Self::Medium => 3,
            Self::Low => 4,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Urgent => write!(f, "Urgent"),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = MonolithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(MonolithError::InvalidField {
                field: "priority",
                value: s.to_string(),
            }),
        }
    }
}

/// A card on the kanban board
///
/// `status` is the id of the column the task currently sits in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: ColumnId,
    pub priority: TaskPriority,
    /// Serialized as `null` when unset so a merge upsert clears it
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: ProjectId,
    pub created_at: DateTime<Utc>,
    pub owner_id: OwnerId,
}

impl Task {
    /// Creates a medium priority task in the given column
    pub fn new(title: String, status: ColumnId, project_id: ProjectId, owner_id: OwnerId) -> Self {
        Self {
            id: TaskId::generate(),
            title,
            status,
            priority: TaskPriority::Medium,
            due_date: None,
            project_id,
            created_at: Utc::now(),
            owner_id,
        }
    }

    /// Sets the title
    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn set_priority(&mut self, priority: TaskPriority) {
        self.priority = priority;
    }

    pub fn set_due_date(&mut self, due: DateTime<Utc>) {
        self.due_date = Some(due);
    }

    pub fn clear_due_date(&mut self) {
        self.due_date = None;
    }

    /// Whether the task sits in `column`
    pub fn is_in(&self, column: &ColumnId) -> bool {
        &self.status == column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, column: &str) -> Task {
        Task::new(
            title.to_string(),
            column.parse().unwrap(),
            "proj-1".parse().unwrap(),
            "u1".parse().unwrap(),
        )
    }

    #[test]
    fn test_task_creation() {
        let task = task("Write report", "todo");
        assert_eq!(task.title, "Write report");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.due_date.is_none());
        assert!(task.is_in(&"todo".parse().unwrap()));
        assert!(!task.is_in(&"done".parse().unwrap()));
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!(TaskPriority::from_str("URGENT").unwrap(), TaskPriority::Urgent);
        assert_eq!(TaskPriority::from_str(" low ").unwrap(), TaskPriority::Low);
        assert!(TaskPriority::from_str("critical").is_err());
    }

    #[test]
    fn test_priority_rank_orders_urgent_first() {
        let mut priorities = vec![
            TaskPriority::Low,
            TaskPriority::Urgent,
            TaskPriority::Medium,
            TaskPriority::High,
        ];
        priorities.sort_by_key(|p| p.rank());
        assert_eq!(
            priorities,
            vec![
                TaskPriority::Urgent,
                TaskPriority::High,
                TaskPriority::Medium,
                TaskPriority::Low
            ]
        );
    }

    #[test]
    fn test_setters() {
        let mut task = task("Draft", "todo");
        task.set_title("Final".to_string());
        task.set_priority(TaskPriority::High);
        let due = Utc::now();
        task.set_due_date(due);

        assert_eq!(task.title, "Final");
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.due_date, Some(due));

        task.clear_due_date();
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_task_serialization_without_due_date() {
        let task = task("Test", "todo");
        let json = serde_json::to_string(&task).unwrap();

        assert!(json.contains("\"dueDate\":null"));
        assert!(json.contains("\"projectId\":\"proj-1\""));
        assert!(json.contains("\"ownerId\":\"u1\""));
    }

    #[test]
    fn test_task_document_deserialization() {
        let json = r#"{
            "id": "task-2",
            "title": "Implement Kanban board",
            "status": "inprogress",
            "priority": "high",
            "dueDate": "2024-03-10T00:00:00Z",
            "projectId": "proj-1",
            "createdAt": "2024-03-06T00:00:00Z",
            "ownerId": "u1"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id.as_str(), "task-2");
        assert_eq!(task.status.as_str(), "inprogress");
        assert_eq!(task.priority, TaskPriority::High);
        assert!(task.due_date.is_some());
    }
}
