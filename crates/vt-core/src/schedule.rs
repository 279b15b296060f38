//! Scheduled sessions and the people they belong to.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{PersonId, SessionId};

/// Lifecycle status of a scheduled session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    Canceled,
}

impl SessionStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("invalid session status: {s}")),
        }
    }
}

/// A time-boxed session on a person's schedule.
///
/// Start and end times are kept as the raw clock-time text the source of
/// truth stores (`"14:00"` or `"2:00 PM"`); the window evaluator parses
/// them leniently and treats unparseable values as ineligible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub session_id: SessionId,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: Option<String>,
    #[serde(default)]
    pub status: SessionStatus,
}

/// A person in the directory.
///
/// Aggregate totals are mutated by surrounding workflows and are
/// read-only to the reconciliation core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub full_name: String,
    pub total_hours: f64,
    pub total_sessions: i64,
}

/// Optional display metadata for a session, from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionDetails {
    pub label: Option<String>,
    pub location: Option<String>,
}

/// Returns the sessions falling on the given calendar day.
#[must_use]
pub fn sessions_on(sessions: &[ScheduledSession], date: NaiveDate) -> Vec<ScheduledSession> {
    sessions.iter().filter(|s| s.date == date).cloned().collect()
}
