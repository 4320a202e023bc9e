//! # Monolith Core
//!
//! Core business logic and domain models for Monolith, a personal
//! productivity workspace: a kanban board, habit tracking with streaks,
//! time tracking against projects, and markdown notes.
//!
//! Board and habit operations update in-memory state first and return the
//! [`PendingWrite`]s the document store still needs. A [`WriteQueue`]
//! delivers those writes to any [`Storage`] backend with retries.

pub mod config;
pub mod domain;
pub mod error;
pub mod notes;
pub mod storage;
pub mod sync;

// Re-export commonly used types
pub use config::MonolithConfig;
pub use domain::{
    board::{Board, Column, ColumnId, DragItem, DragSession},
    habit::{Habit, HabitId, HabitLog, LogDate},
    record::{Collection, PendingWrite, Record},
    streak::{calculate_streak, calculate_streaks},
    task::{Task, TaskId, TaskPriority},
};
pub use error::{MonolithError, Result};
pub use storage::Storage;
pub use sync::{FailedWrite, RetryPolicy, WriteQueue};
