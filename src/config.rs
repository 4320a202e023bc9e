//! Configuration loaded from `.monolith/config.toml`.
//!
//! Every section is optional; a missing file or a missing key falls back to
//! the defaults below.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const CONFIG_DIR: &str = ".monolith";
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonolithConfig {
    pub timer: TimerSettings,
    pub sync: SyncSettings,
    pub dashboard: DashboardSettings,
}

impl MonolithConfig {
    /// Path of the config file under a project root
    pub fn path(project_root: impl AsRef<Path>) -> PathBuf {
        project_root.as_ref().join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Loads the configuration for a project root, defaults when absent
    pub fn load(project_root: impl AsRef<Path>) -> Result<Self> {
        let config_path = Self::path(project_root);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))
    }

    /// Parses and validates a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        self.timer.validate()?;
        self.sync.validate()
    }
}

/// Default durations of the timer modes, in minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub countdown_minutes: u32,
    pub pomodoro_work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Every n-th completed work phase is followed by a long break
    pub long_break_every: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            countdown_minutes: 15,
            pomodoro_work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_every: 4,
        }
    }
}

impl TimerSettings {
    pub(crate) fn validate(&self) -> Result<()> {
        let durations = [
            ("countdown_minutes", self.countdown_minutes),
            ("pomodoro_work_minutes", self.pomodoro_work_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
            ("long_break_every", self.long_break_every),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, value)| *value == 0) {
            bail!("timer.{name} must be greater than zero");
        }
        Ok(())
    }

    pub fn countdown_secs(&self) -> u64 {
        u64::from(self.countdown_minutes) * 60
    }

    pub fn work_secs(&self) -> u64 {
        u64::from(self.pomodoro_work_minutes) * 60
    }

    pub fn short_break_secs(&self) -> u64 {
        u64::from(self.short_break_minutes) * 60
    }

    pub fn long_break_secs(&self) -> u64 {
        u64::from(self.long_break_minutes) * 60
    }
}

/// Retry policy for optimistic writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 200,
            max_delay_ms: 10_000,
        }
    }
}

impl SyncSettings {
    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            bail!("sync.max_attempts must be at least 1");
        }
        if self.base_delay_ms > self.max_delay_ms {
            bail!(
                "sync.base_delay_ms ({}) exceeds sync.max_delay_ms ({})",
                self.base_delay_ms,
                self.max_delay_ms
            );
        }
        Ok(())
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Dashboard and report windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub upcoming_window_days: u32,
    pub completion_window_days: u32,
    /// Column whose tasks count as finished
    pub done_column: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            upcoming_window_days: 7,
            completion_window_days: 7,
            done_column: "done".to_string(),
        }
    }
}
