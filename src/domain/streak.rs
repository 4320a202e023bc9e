use crate::domain::habit::{Habit, HabitId, HabitLog, LogDate};
use std::collections::{HashMap, HashSet};

/// Length of the current run of consecutive completed days.
///
/// The run is anchored at `reference` when that day is completed, otherwise at
/// the day before; when neither is completed the streak is broken and the
/// result is 0. Duplicate dates count once and dates after `reference` are
/// never visited.
pub fn calculate_streak<I>(reference: LogDate, dates: I) -> u32
where
    I: IntoIterator<Item = LogDate>,
{
    let days: HashSet<LogDate> = dates.into_iter().collect();
    if days.is_empty() {
        return 0;
    }

    let mut cursor = if days.contains(&reference) {
        Some(reference)
    } else {
        match reference.pred() {
            Some(yesterday) if days.contains(&yesterday) => Some(yesterday),
            _ => return 0,
        }
    };

    let mut streak = 0;
    while let Some(day) = cursor.filter(|day| days.contains(day)) {
        streak += 1;
        cursor = day.pred();
    }
    streak
}

/// Streak for every habit, computed independently per habit.
///
/// Only logs with `completed` set count as completions.
pub fn calculate_streaks(
    habits: &[Habit],
    logs: &[HabitLog],
    reference: LogDate,
) -> HashMap<HabitId, u32> {
    let mut dates_by_habit: HashMap<&HabitId, Vec<LogDate>> = HashMap::new();
    for log in logs.iter().filter(|log| log.completed) {
        dates_by_habit.entry(&log.habit_id).or_default().push(log.date);
    }

    habits
        .iter()
        .map(|habit| {
            let dates = dates_by_habit.get(&habit.id).cloned().unwrap_or_default();
            (habit.id.clone(), calculate_streak(reference, dates))
        })
        .collect()
}
