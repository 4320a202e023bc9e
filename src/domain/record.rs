use crate::domain::{
    board::Column, habit::Habit, habit::HabitLog, task::Task, time_entry::Project,
    time_entry::TimeEntry,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collections held by the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Habits,
    HabitLogs,
    Tasks,
    Columns,
    Projects,
    TimeEntries,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Habits,
        Collection::HabitLogs,
        Collection::Tasks,
        Collection::Columns,
        Collection::Projects,
        Collection::TimeEntries,
    ];

    /// Name of the collection in the store
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Habits => "habits",
            Self::HabitLogs => "habit_logs",
            Self::Tasks => "tasks",
            Self::Columns => "columns",
            Self::Projects => "projects",
            Self::TimeEntries => "time_entries",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any record the core can ask the store to persist
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Habit(Habit),
    HabitLog(HabitLog),
    Task(Task),
    Column(Column),
    Project(Project),
    TimeEntry(TimeEntry),
}

impl Record {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Habit(_) => Collection::Habits,
            Self::HabitLog(_) => Collection::HabitLogs,
            Self::Task(_) => Collection::Tasks,
            Self::Column(_) => Collection::Columns,
            Self::Project(_) => Collection::Projects,
            Self::TimeEntry(_) => Collection::TimeEntries,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Habit(habit) => habit.id.as_str(),
            Self::HabitLog(log) => log.id.as_str(),
            Self::Task(task) => task.id.as_str(),
            Self::Column(column) => column.id.as_str(),
            Self::Project(project) => project.id.as_str(),
            Self::TimeEntry(entry) => entry.id.as_str(),
        }
    }

    /// Serializes the record into a store document `{ id, ...fields }`
    pub fn to_document(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Self::Habit(habit) => serde_json::to_value(habit),
            Self::HabitLog(log) => serde_json::to_value(log),
            Self::Task(task) => serde_json::to_value(task),
            Self::Column(column) => serde_json::to_value(column),
            Self::Project(project) => serde_json::to_value(project),
            Self::TimeEntry(entry) => serde_json::to_value(entry),
        }
    }
}

/// A write the caller must issue to the store after an optimistic update
#[derive(Debug, Clone, PartialEq)]
pub enum PendingWrite {
    /// Upsert by id, merging fields into an existing document
    Upsert(Record),
    /// Delete by id
    Delete { collection: Collection, id: String },
}

impl PendingWrite {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Upsert(record) => record.collection(),
            Self::Delete { collection, .. } => *collection,
        }
    }

    pub fn record_id(&self) -> &str {
        match self {
            Self::Upsert(record) => record.id(),
            Self::Delete { id, .. } => id,
        }
    }
}

impl fmt::Display for PendingWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upsert(record) => write!(f, "upsert {}/{}", record.collection(), record.id()),
            Self::Delete { collection, id } => write!(f, "delete {}/{}", collection, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::habit::{HabitId, LogDate};

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::HabitLogs.as_str(), "habit_logs");
        assert_eq!(Collection::TimeEntries.to_string(), "time_entries");
        assert_eq!(
            serde_json::to_string(&Collection::HabitLogs).unwrap(),
            "\"habit_logs\""
        );
    }

    #[test]
    fn test_record_document_carries_id() {
        let habit_id: HabitId = "h1".parse().unwrap();
        let date: LogDate = "2024-03-09".parse().unwrap();
        let record = Record::HabitLog(HabitLog::completed(habit_id, date));

        let doc = record.to_document().unwrap();
        assert_eq!(doc["id"], "log-h1-2024-03-09");
        assert_eq!(doc["habitId"], "h1");
        assert_eq!(record.collection(), Collection::HabitLogs);
    }

    #[test]
    fn test_pending_write_display() {
        let write = PendingWrite::Delete {
            collection: Collection::Tasks,
            id: "task-1".to_string(),
        };
        assert_eq!(write.to_string(), "delete tasks/task-1");
        assert_eq!(write.record_id(), "task-1");
    }
}
