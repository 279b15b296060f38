//! The "smart log" reconciliation entry point.
//!
//! One invocation always makes forward progress: it either logs at
//! least one pending session, or toggles facility presence. The only
//! silent path out is an error.

use serde::Serialize;

use crate::error::AttendanceError;
use crate::presence;
use crate::record::AttendanceRecord;
use crate::schedule::sessions_on;
use crate::store::{AttendanceStore, Clock, PersonDirectory};
use crate::types::PersonId;
use crate::writer::{self, LogSummary};

/// What a reconciliation pass decided to do.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReconcileAction {
    /// Pending eligible sessions were logged.
    LoggedSessions(LogSummary),
    /// No sessions to log; a facility visit was opened.
    CheckedIn(AttendanceRecord),
    /// No sessions to log; the facility visit was closed.
    CheckedOut(AttendanceRecord),
}

/// Reconciles a person's attendance for the current instant.
///
/// Decision sequence:
/// 1. Log today's eligible, not-yet-logged sessions. If anything was
///    written, report it.
/// 2. Otherwise fall back to the facility-presence toggle: check out if
///    a visit is open, check in if not.
pub fn smart_log<B, C>(
    backend: &mut B,
    clock: &C,
    person_id: &PersonId,
) -> Result<ReconcileAction, AttendanceError<<B as AttendanceStore>::Error>>
where
    B: AttendanceStore + PersonDirectory<Error = <B as AttendanceStore>::Error>,
    C: Clock,
{
    let summary = writer::log_eligible_sessions(backend, clock, person_id)?;
    if summary.logged > 0 {
        return Ok(ReconcileAction::LoggedSessions(summary));
    }

    // No eligible session needed logging right now; toggle presence so
    // the action still records something.
    let sessions = backend
        .scheduled_sessions(person_id)
        .map_err(AttendanceError::Store)?;
    let today_sessions = sessions_on(&sessions, clock.today());
    let snapshot = presence::resolve(backend, clock.today(), person_id, &today_sessions)
        .map_err(AttendanceError::Store)?;

    if snapshot.checked_in {
        let record = writer::check_out(backend, clock, person_id)?;
        Ok(ReconcileAction::CheckedOut(record))
    } else {
        let record = writer::check_in(backend, clock, person_id)?;
        Ok(ReconcileAction::CheckedIn(record))
    }
}
