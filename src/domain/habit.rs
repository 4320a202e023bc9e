use crate::domain::owner::OwnerId;
use crate::domain::record::{Collection, PendingWrite, Record};
use crate::error::MonolithError;
use chrono::{DateTime, Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

record_id!(
    /// Unique identifier for a habit
    HabitId,
    "habit"
);

record_id!(
    /// Unique identifier for a habit log entry
    HabitLogId,
    "habit log"
);

impl HabitLogId {
    /// Derives the identifier from the (habit, date) natural key, so marking
    /// the same habit twice on one day targets the same document.
    pub fn natural(habit_id: &HabitId, date: LogDate) -> Self {
        Self(format!("log-{}-{}", habit_id, date))
    }
}

/// A calendar day at `YYYY-MM-DD` granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogDate(NaiveDate);

impl LogDate {
    const FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Builds a date from its components, `None` when the day does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Normalizes a timestamp to the calendar day in its own offset
    pub fn from_timestamp<Tz: chrono::TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        Self(timestamp.date_naive())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// The previous calendar day
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The next calendar day
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Shifts the date by a signed number of days
    pub fn add_days(&self, days: i64) -> Option<Self> {
        self.0.checked_add_signed(Duration::days(days)).map(Self)
    }

    /// Monday of the week containing this date
    pub fn week_start(&self) -> Self {
        let offset = i64::from(self.0.weekday().num_days_from_monday());
        Self(self.0 - Duration::days(offset))
    }
}

impl From<NaiveDate> for LogDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for LogDate {
    type Err = MonolithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, Self::FORMAT) {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|ts| Self::from_timestamp(&ts))
            .map_err(|_| MonolithError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for LogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl Serialize for LogDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// How often a habit recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitPeriod {
    Day,
    Week,
}

/// Whether the user wants to build the habit or break it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitGoal {
    Build,
    Stop,
}

/// A recurring behaviour tracked by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub active: bool,
    pub period: HabitPeriod,
    pub frequency: u32,
    pub goal: HabitGoal,
    pub color: String,
    pub owner_id: OwnerId,
}

impl Habit {
    const DEFAULT_COLOR: &'static str = "hsl(var(--chart-1))";

    /// Creates an active daily habit the user wants to build
    pub fn new(name: String, owner_id: OwnerId) -> Self {
        Self {
            id: HabitId::generate(),
            name,
            active: true,
            period: HabitPeriod::Day,
            frequency: 1,
            goal: HabitGoal::Build,
            color: Self::DEFAULT_COLOR.to_string(),
            owner_id,
        }
    }

    /// Sets the target number of completions per period
    pub fn set_frequency(&mut self, frequency: u32) -> Result<(), MonolithError> {
        if frequency == 0 {
            return Err(MonolithError::InvalidField {
                field: "frequency",
                value: frequency.to_string(),
            });
        }
        self.frequency = frequency;
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Record that a habit was completed on a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub id: HabitLogId,
    pub habit_id: HabitId,
    pub date: LogDate,
    pub completed: bool,
}

impl HabitLog {
    /// Creates a completed log keyed by its natural key
    pub fn completed(habit_id: HabitId, date: LogDate) -> Self {
        Self {
            id: HabitLogId::natural(&habit_id, date),
            habit_id,
            date,
            completed: true,
        }
    }

    /// Whether this log marks `habit_id` as done on `date`
    pub fn is_for(&self, habit_id: &HabitId, date: LogDate) -> bool {
        self.completed && &self.habit_id == habit_id && self.date == date
    }
}

/// Returns the write that marks or unmarks a habit on a day.
///
/// Marking upserts the natural-key log; unmarking deletes it. Both are safe to
/// repeat.
pub fn toggle_log(habit_id: &HabitId, date: LogDate, completed: bool) -> PendingWrite {
    if completed {
        PendingWrite::Upsert(Record::HabitLog(HabitLog::completed(habit_id.clone(), date)))
    } else {
        PendingWrite::Delete {
            collection: Collection::HabitLogs,
            id: HabitLogId::natural(habit_id, date).to_string(),
        }
    }
}
