use crate::config::TimerSettings;
use crate::domain::{
    owner::OwnerId,
    time_entry::{ProjectId, TimeEntry},
};
use crate::error::{MonolithError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Mode of the time tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Stopwatch,
    Pomodoro,
    Timer,
}

impl TimerMode {
    /// Next mode in the stopwatch → pomodoro → timer cycle
    pub fn next(self) -> Self {
        match self {
            Self::Stopwatch => Self::Pomodoro,
            Self::Pomodoro => Self::Timer,
            Self::Timer => Self::Stopwatch,
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopwatch => write!(f, "Stopwatch"),
            Self::Pomodoro => write!(f, "Pomodoro"),
            Self::Timer => write!(f, "Timer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

/// Stopwatch, countdown and pomodoro tracker.
///
/// The caller drives the clock by calling [`Timer::tick`] once per second
/// while the timer runs. Work that should be recorded comes back as a
/// [`TimeEntry`] from `tick` or `stop`; persisting it is up to the caller.
#[derive(Debug, Clone)]
pub struct Timer {
    settings: TimerSettings,
    owner_id: OwnerId,
    mode: TimerMode,
    running: bool,
    /// Elapsed seconds for the stopwatch, remaining seconds otherwise
    seconds: u64,
    /// Seconds actually run since the session started
    elapsed: u64,
    started_at: Option<DateTime<Utc>>,
    project: Option<ProjectId>,
    phase: PomodoroPhase,
    completed_work: u32,
}

impl Timer {
    /// Creates a stopwatch. Settings with a zero duration or a zero long
    /// break interval are rejected.
    pub fn new(settings: TimerSettings, owner_id: OwnerId) -> Result<Self> {
        settings
            .validate()
            .map_err(|e| MonolithError::ConfigError(e.to_string()))?;
        Ok(Self {
            settings,
            owner_id,
            mode: TimerMode::Stopwatch,
            running: false,
            seconds: 0,
            elapsed: 0,
            started_at: None,
            project: None,
            phase: PomodoroPhase::Work,
            completed_work: 0,
        })
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work
    }

    pub fn project(&self) -> Option<&ProjectId> {
        self.project.as_ref()
    }

    /// Chooses the project time is tracked against. Not allowed while running.
    pub fn select_project(&mut self, project: Option<ProjectId>) -> Result<()> {
        if self.running {
            return Err(MonolithError::TimerError(
                "cannot change project while the timer is running".to_string(),
            ));
        }
        self.project = project;
        Ok(())
    }

    /// Switches mode, stopping and resetting without recording anything
    pub fn set_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn cycle_mode(&mut self) {
        self.set_mode(self.mode.next());
    }

    /// Starts or resumes. The stopwatch needs a project to track against.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.running {
            return Ok(());
        }
        if self.mode == TimerMode::Stopwatch && self.project.is_none() {
            return Err(MonolithError::TimerError(
                "select a project before starting the stopwatch".to_string(),
            ));
        }
        self.started_at.get_or_insert(now);
        self.running = true;
        debug!(mode = %self.mode, "Timer started");
        Ok(())
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Primary button: start when paused, pause when running
    pub fn toggle(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.running {
            self.pause();
            Ok(())
        } else {
            self.start(now)
        }
    }

    /// Advances the clock by one second
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TimeEntry> {
        if !self.running {
            return None;
        }
        if self.mode == TimerMode::Stopwatch {
            self.seconds += 1;
            self.elapsed += 1;
            return None;
        }

        if self.seconds > 0 {
            self.seconds -= 1;
            self.elapsed += 1;
        }
        if self.seconds > 0 {
            return None;
        }

        match self.mode {
            TimerMode::Pomodoro => self.finish_phase(now),
            _ => {
                self.running = false;
                self.started_at = None;
                self.elapsed = 0;
                None
            }
        }
    }

    fn finish_phase(&mut self, now: DateTime<Utc>) -> Option<TimeEntry> {
        let entry = if self.phase == PomodoroPhase::Work {
            let entry = self.record(now);
            self.completed_work += 1;
            self.phase = if self.completed_work % self.settings.long_break_every == 0 {
                PomodoroPhase::LongBreak
            } else {
                PomodoroPhase::ShortBreak
            };
            entry
        } else {
            self.phase = PomodoroPhase::Work;
            None
        };
        debug!(phase = ?self.phase, completed = self.completed_work, "Pomodoro phase finished");

        self.seconds = self.phase_secs(self.phase);
        self.started_at = Some(now);
        self.elapsed = 0;
        entry
    }

    /// Stops the session, recording the work done so far, and resets
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<TimeEntry> {
        self.running = false;
        let records = match self.mode {
            TimerMode::Stopwatch => true,
            TimerMode::Pomodoro => self.phase == PomodoroPhase::Work,
            TimerMode::Timer => false,
        };
        let entry = if records { self.record(now) } else { None };
        self.reset();
        entry
    }

    /// Back to the initial time of the current mode, nothing recorded
    pub fn reset(&mut self) {
        self.running = false;
        self.started_at = None;
        self.elapsed = 0;
        self.phase = PomodoroPhase::Work;
        self.completed_work = 0;
        self.seconds = self.initial_secs();
    }

    fn initial_secs(&self) -> u64 {
        match self.mode {
            TimerMode::Stopwatch => 0,
            TimerMode::Pomodoro => self.settings.work_secs(),
            TimerMode::Timer => self.settings.countdown_secs(),
        }
    }

    fn phase_secs(&self, phase: PomodoroPhase) -> u64 {
        match phase {
            PomodoroPhase::Work => self.settings.work_secs(),
            PomodoroPhase::ShortBreak => self.settings.short_break_secs(),
            PomodoroPhase::LongBreak => self.settings.long_break_secs(),
        }
    }

    fn record(&self, now: DateTime<Utc>) -> Option<TimeEntry> {
        let project = self.project.clone()?;
        let started_at = self.started_at?;
        if self.elapsed == 0 {
            return None;
        }
        Some(TimeEntry::with_duration(
            project,
            started_at,
            now,
            self.elapsed,
            self.owner_id.clone(),
        ))
    }

    /// `MM:SS`, or `HH:MM:SS` from one hour up
    pub fn display(&self) -> String {
        format_clock(self.seconds)
    }
}

/// Formats seconds as `MM:SS`, or `HH:MM:SS` from one hour up
pub fn format_clock(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
