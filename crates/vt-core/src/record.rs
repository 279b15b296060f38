//! Attendance record model.
//!
//! A record is either tied to a scheduled session (`kind = session`) or
//! tracks a facility visit (`kind = facility`, open until checked out).
//! Session records are immutable after creation; a facility record is
//! mutated exactly once, when the visit end is set.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{PersonId, RecordId, SessionId};

/// What an attendance record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceKind {
    /// Attendance for a scheduled session.
    Session,
    /// A facility visit (check-in/check-out), not tied to a session.
    Facility,
}

impl AttendanceKind {
    /// Returns the string representation for store persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Facility => "facility",
        }
    }
}

impl std::fmt::Display for AttendanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttendanceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(Self::Session),
            "facility" => Ok(Self::Facility),
            _ => Err(format!("invalid attendance kind: {s}")),
        }
    }
}

/// Attendance outcome for a record.
///
/// `Present` and `Late` are derived from session timing at write time.
/// `Absent` exists for records entered through manual workflows outside
/// this crate; the reconciliation path never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Present,
    Late,
    Absent,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Late => "late",
            Self::Absent => "absent",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "late" => Ok(Self::Late),
            "absent" => Ok(Self::Absent),
            _ => Err(format!("invalid outcome: {s}")),
        }
    }
}

/// Who confirmed the attendance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmedBy {
    /// Self-confirmed by the volunteer.
    #[default]
    Volunteer,
    /// Confirmed by a facility manager.
    Manager,
}

impl ConfirmedBy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Volunteer => "volunteer",
            Self::Manager => "manager",
        }
    }
}

impl std::fmt::Display for ConfirmedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfirmedBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volunteer" => Ok(Self::Volunteer),
            "manager" => Ok(Self::Manager),
            _ => Err(format!("invalid confirmation source: {s}")),
        }
    }
}

/// A single attendance record.
///
/// Instants carry sub-second precision; `date` is the calendar day in
/// facility-local time. `visit_ended_at = None` on a facility record
/// means the visit is still open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub kind: AttendanceKind,
    /// The session this record logs. `None` for pure facility visits.
    pub session_id: Option<SessionId>,
    pub date: NaiveDate,
    pub person_id: PersonId,
    pub outcome: Outcome,
    pub confirmed_by: ConfirmedBy,
    pub confirmed_at: DateTime<Utc>,
    pub visit_started_at: Option<DateTime<Utc>>,
    pub visit_ended_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl AttendanceRecord {
    /// Whether this record is an open facility visit.
    #[must_use]
    pub fn is_open_visit(&self) -> bool {
        self.kind == AttendanceKind::Facility && self.visit_ended_at.is_none()
    }
}
