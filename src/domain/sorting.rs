use crate::domain::{board::ColumnId, task::Task};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::cmp::Ordering;
use std::str::FromStr;

/// Fields available for sorting tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Status,
    Priority,
    Due,
    Created,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "title" => Ok(SortField::Title),
            "status" => Ok(SortField::Status),
            "priority" => Ok(SortField::Priority),
            "due" => Ok(SortField::Due),
            "created" => Ok(SortField::Created),
            _ => Err(format!(
                "Invalid sort field '{}'. Valid fields: id, title, status, priority, due, created",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            )),
        }
    }
}

/// Sorts tasks in place by `field` in the given direction.
///
/// The sort is stable, so tasks that compare equal keep their board order.
/// Priority ascending means most pressing first.
///
/// # Examples
/// ```
/// use monolith_core::domain::sorting::{sort_tasks, SortField, SortOrder};
/// use monolith_core::domain::task::{Task, TaskPriority};
///
/// let new_task = |title: &str, priority| {
///     let mut task = Task::new(
///         title.to_string(),
///         "todo".parse().unwrap(),
///         "proj-1".parse().unwrap(),
///         "u1".parse().unwrap(),
///     );
///     task.set_priority(priority);
///     task
/// };
///
/// let mut tasks = vec![
///     new_task("Later", TaskPriority::Low),
///     new_task("Now", TaskPriority::Urgent),
/// ];
///
/// sort_tasks(&mut tasks, SortField::Priority, SortOrder::Ascending);
/// assert_eq!(tasks[0].title, "Now");
/// ```
pub fn sort_tasks(tasks: &mut [Task], field: SortField, order: SortOrder) {
    tasks.sort_by(|a, b| {
        let cmp = match field {
            SortField::Id => a.id.as_str().cmp(b.id.as_str()),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
            SortField::Due => compare_option_dates(a.due_date, b.due_date),
            SortField::Created => a.created_at.cmp(&b.created_at),
        };

        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Compare Option<DateTime> with None always sorting to end
fn compare_option_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a_date), Some(b_date)) => a_date.cmp(&b_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Tasks due soon, most pressing first.
///
/// A task qualifies when it is not in `done`, and its due date falls strictly
/// after the start of `today` and strictly before the start of the day
/// `window_days` later.
pub fn upcoming_tasks<'a>(
    tasks: &'a [Task],
    today: NaiveDate,
    window_days: u32,
    done: &ColumnId,
) -> Vec<&'a Task> {
    let start = today.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    let Some(start) = start else {
        return Vec::new();
    };
    let end = start + Duration::days(i64::from(window_days));

    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|task| !task.is_in(done))
        .filter(|task| matches!(task.due_date, Some(due) if due > start && due < end))
        .collect();
    upcoming.sort_by_key(|task| task.priority.rank());
    upcoming
}
