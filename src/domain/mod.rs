/// Declares a string-backed record identifier.
///
/// Identifiers come from the document store and are opaque; the only
/// constraint enforced on parse is that they are non-empty and usable as a
/// single path segment.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random identifier
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Returns the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::MonolithError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
                    return Err(crate::error::MonolithError::InvalidId {
                        kind: $kind,
                        value: s.to_string(),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

pub mod board;
pub mod habit;
pub mod owner;
pub mod record;
pub mod reports;
pub mod sorting;
pub mod streak;
pub mod task;
pub mod time_entry;
pub mod timer;

pub use board::{array_move, Board, Column, ColumnId, DragItem, DragSession};
pub use habit::{toggle_log, Habit, HabitGoal, HabitId, HabitLog, HabitLogId, HabitPeriod, LogDate};
pub use owner::OwnerId;
pub use record::{Collection, PendingWrite, Record};
pub use sorting::{sort_tasks, upcoming_tasks, SortField, SortOrder};
pub use streak::{calculate_streak, calculate_streaks};
pub use task::{Task, TaskId, TaskPriority};
pub use time_entry::{Project, ProjectId, ProjectStatus, TimeEntry, TimeEntryId};
pub use timer::{PomodoroPhase, Timer, TimerMode};
