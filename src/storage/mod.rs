use crate::{
    domain::{Board, Collection, Column, Habit, HabitLog, PendingWrite, Project, Record, Task, TimeEntry},
    error::{MonolithError, Result},
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

#[cfg(feature = "file-storage")]
pub mod file_storage;

/// Document store holding the application's collections.
///
/// Documents are JSON objects shaped `{ id, ...fields }`. Upserts merge the
/// given fields into an existing document; deletes of missing documents
/// succeed.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Upserts a record by id with merge semantics
    async fn upsert(&self, record: &Record) -> Result<()>;

    /// Deletes a record by id
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;

    /// Loads one document
    async fn load_document(&self, collection: Collection, id: &str) -> Result<serde_json::Value>;

    /// Loads every document of a collection
    async fn load_collection(&self, collection: Collection) -> Result<Vec<serde_json::Value>>;

    /// Checks if the store is initialized
    async fn is_initialized(&self) -> bool;

    /// Issues a pending write
    async fn apply(&self, write: &PendingWrite) -> Result<()> {
        match write {
            PendingWrite::Upsert(record) => self.upsert(record).await,
            PendingWrite::Delete { collection, id } => self.delete(*collection, id).await,
        }
    }
}

/// Loads and decodes a whole collection
pub async fn load_records<T: DeserializeOwned>(
    storage: &dyn Storage,
    collection: Collection,
) -> Result<Vec<T>> {
    if !storage.is_initialized().await {
        return Err(MonolithError::StoreNotInitialized);
    }
    storage
        .load_collection(collection)
        .await?
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(MonolithError::from))
        .collect()
}

/// Loads the board from the `columns` and `tasks` collections
pub async fn load_board(storage: &dyn Storage) -> Result<Board> {
    let columns: Vec<Column> = load_records(storage, Collection::Columns).await?;
    let tasks: Vec<Task> = load_records(storage, Collection::Tasks).await?;
    Ok(Board::new(columns, tasks))
}

/// Everything the habit views and streaks need
#[derive(Debug, Clone, Default)]
pub struct HabitSnapshot {
    pub habits: Vec<Habit>,
    pub logs: Vec<HabitLog>,
}

pub async fn load_habits(storage: &dyn Storage) -> Result<HabitSnapshot> {
    Ok(HabitSnapshot {
        habits: load_records(storage, Collection::Habits).await?,
        logs: load_records(storage, Collection::HabitLogs).await?,
    })
}

/// Everything the time tracking reports need
#[derive(Debug, Clone, Default)]
pub struct TimeSnapshot {
    pub projects: Vec<Project>,
    pub entries: Vec<TimeEntry>,
}

pub async fn load_time_tracking(storage: &dyn Storage) -> Result<TimeSnapshot> {
    Ok(TimeSnapshot {
        projects: load_records(storage, Collection::Projects).await?,
        entries: load_records(storage, Collection::TimeEntries).await?,
    })
}
