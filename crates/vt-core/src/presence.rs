//! Presence state resolution.
//!
//! Derives a person's current facility presence and "joined a session
//! today" evidence from the raw record store. Per the store contract,
//! every fetch is single-field (plus session-id membership) and all
//! cross-field filtering happens here, in memory.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::AttendanceError;
use crate::record::AttendanceRecord;
use crate::schedule::{ScheduledSession, sessions_on};
use crate::store::{AttendanceStore, Clock, PersonDirectory, RECENT_FETCH_LIMIT};
use crate::types::{PersonId, SessionId};

/// A person's presence state at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct PresenceSnapshot {
    /// Whether an open facility visit exists today.
    pub checked_in: bool,
    /// The open facility record, if any.
    pub open_record: Option<AttendanceRecord>,
    /// Whether any of today's scheduled sessions has an attendance record.
    pub has_joined_today: bool,
    /// Earliest confirmation instant across today's session records.
    pub earliest_confirmation: Option<DateTime<Utc>>,
}

/// Resolves presence from the store given today's scheduled sessions.
///
/// More than one open facility record violates the at-most-one-open
/// invariant (a concurrent check-in race can produce it); the most
/// recently confirmed record wins and the rest are reported as a
/// warning, never as a failure.
pub(crate) fn resolve<S: AttendanceStore>(
    store: &S,
    today: NaiveDate,
    person: &PersonId,
    today_sessions: &[ScheduledSession],
) -> Result<PresenceSnapshot, S::Error> {
    let recent = store.recent_for_person(person, RECENT_FETCH_LIMIT)?;
    let mut open: Vec<AttendanceRecord> = recent
        .into_iter()
        .filter(|r| r.is_open_visit() && r.date == today)
        .collect();
    open.sort_by(|a, b| b.confirmed_at.cmp(&a.confirmed_at));
    if open.len() > 1 {
        tracing::warn!(
            person = %person,
            open_records = open.len(),
            "multiple open facility visits found; keeping the most recent"
        );
    }
    let open_record = open.into_iter().next();

    let session_ids: Vec<SessionId> = today_sessions
        .iter()
        .map(|s| s.session_id.clone())
        .collect();
    let joined = if session_ids.is_empty() {
        Vec::new()
    } else {
        store.records_for_sessions(person, &session_ids)?
    };
    let earliest_confirmation = joined.iter().map(|r| r.confirmed_at).min();

    Ok(PresenceSnapshot {
        checked_in: open_record.is_some(),
        open_record,
        has_joined_today: !joined.is_empty(),
        earliest_confirmation,
    })
}

/// Public snapshot operation: resolves the person's schedule and derives
/// presence for today.
pub fn presence_snapshot<B, C>(
    backend: &B,
    clock: &C,
    person_id: &PersonId,
) -> Result<PresenceSnapshot, AttendanceError<<B as AttendanceStore>::Error>>
where
    B: AttendanceStore + PersonDirectory<Error = <B as AttendanceStore>::Error>,
    C: Clock,
{
    let person = backend
        .person(person_id)
        .map_err(AttendanceError::Store)?
        .ok_or_else(|| AttendanceError::UnknownPerson(person_id.clone()))?;
    let sessions = backend
        .scheduled_sessions(&person.id)
        .map_err(AttendanceError::Store)?;
    let today = clock.today();
    let today_sessions = sessions_on(&sessions, today);
    resolve(backend, today, person_id, &today_sessions).map_err(AttendanceError::Store)
}
