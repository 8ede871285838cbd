//! Task status and priority vocabularies

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    New,
    InProgress,
    Done,
    Paused,
    Canceled,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::New,
        Status::InProgress,
        Status::Done,
        Status::Paused,
        Status::Canceled,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Status::New => "new",
            Status::InProgress => "in_progress",
            Status::Done => "done",
            Status::Paused => "paused",
            Status::Canceled => "canceled",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::invalid_status(format!("{s:?}")))
    }
}

/// Importance tier of a task. Persisted as its numeric level (1..=3).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub enum Priority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub const fn level(self) -> i64 {
        self as i64
    }

    pub const fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Priority::Low),
            2 => Some(Priority::Medium),
            3 => Some(Priority::High),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Zero-based slot, handy for per-tier arrays
    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for Priority {
    type Error = Error;

    fn try_from(level: i64) -> Result<Self> {
        Priority::from_level(level).ok_or_else(|| Error::invalid_priority(level))
    }
}

impl From<Priority> for i64 {
    fn from(priority: Priority) -> Self {
        priority.level()
    }
}

impl FromStr for Priority {
    type Err = Error;

    /// Accepts either the tier name or its numeric level
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        if let Ok(level) = wanted.parse::<i64>() {
            return Priority::try_from(level);
        }
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::invalid_priority(format!("{s:?}")))
    }
}
