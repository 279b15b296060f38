//! State-changing attendance operations.
//!
//! Every write is either "insert a new record" or "set the visit end on
//! an open record". Session logging is deduplicated per (person,
//! session) by querying existing records first; check-in re-resolves
//! presence immediately before inserting. Both are check-then-act
//! against a shared store: a concurrent writer racing inside the same
//! read-write window can still slip a duplicate in, which the resolver
//! then heals by picking the most recent record.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::AttendanceError;
use crate::presence;
use crate::record::{AttendanceKind, AttendanceRecord, ConfirmedBy, Outcome};
use crate::schedule::{Person, sessions_on};
use crate::store::{AttendanceStore, Clock, PersonDirectory};
use crate::types::{PersonId, RecordId, SessionId};
use crate::window::{compute_outcome, is_eligible};

/// What a session-logging pass actually wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogSummary {
    /// Number of session records created.
    pub logged: usize,
    /// Whether any created record carries a late outcome.
    pub any_late: bool,
}

fn lookup<D: PersonDirectory>(
    directory: &D,
    person_id: &PersonId,
) -> Result<Person, AttendanceError<D::Error>> {
    directory
        .person(person_id)
        .map_err(AttendanceError::Store)?
        .ok_or_else(|| AttendanceError::UnknownPerson(person_id.clone()))
}

/// Opens a facility visit for the person.
///
/// Re-resolves presence first; an existing open visit fails with
/// [`AttendanceError::AlreadyCheckedIn`] and writes nothing.
pub fn check_in<B, C>(
    backend: &mut B,
    clock: &C,
    person_id: &PersonId,
) -> Result<AttendanceRecord, AttendanceError<<B as AttendanceStore>::Error>>
where
    B: AttendanceStore + PersonDirectory<Error = <B as AttendanceStore>::Error>,
    C: Clock,
{
    lookup(backend, person_id)?;
    let today = clock.today();
    let snapshot =
        presence::resolve(backend, today, person_id, &[]).map_err(AttendanceError::Store)?;
    if let Some(open) = snapshot.open_record {
        return Err(AttendanceError::AlreadyCheckedIn {
            since: open.confirmed_at,
        });
    }

    let now = clock.now();
    let record = AttendanceRecord {
        id: RecordId::random(),
        kind: AttendanceKind::Facility,
        session_id: None,
        date: today,
        person_id: person_id.clone(),
        outcome: Outcome::Present,
        confirmed_by: ConfirmedBy::Volunteer,
        confirmed_at: now,
        visit_started_at: Some(now),
        visit_ended_at: None,
        note: Some(format!(
            "Facility check-in at {}",
            clock.local_now().format("%H:%M:%S")
        )),
    };
    backend.insert(&record).map_err(AttendanceError::Store)?;
    tracing::debug!(person = %person_id, record = %record.id, "opened facility visit");
    Ok(record)
}

/// Closes the person's facility visit.
///
/// If no visit is open but the person joined a session today, a closed
/// visit is reconstructed for reporting, spanning from the earliest
/// session confirmation to now. With neither, this is a
/// [`AttendanceError::NotEligibleForCheckout`] no-op.
pub fn check_out<B, C>(
    backend: &mut B,
    clock: &C,
    person_id: &PersonId,
) -> Result<AttendanceRecord, AttendanceError<<B as AttendanceStore>::Error>>
where
    B: AttendanceStore + PersonDirectory<Error = <B as AttendanceStore>::Error>,
    C: Clock,
{
    lookup(backend, person_id)?;
    let sessions = backend
        .scheduled_sessions(person_id)
        .map_err(AttendanceError::Store)?;
    let today = clock.today();
    let today_sessions = sessions_on(&sessions, today);
    let snapshot = presence::resolve(backend, today, person_id, &today_sessions)
        .map_err(AttendanceError::Store)?;

    let now = clock.now();
    if let Some(open) = snapshot.open_record {
        let note = format!(
            "Facility check-out at {}",
            clock.local_now().format("%H:%M:%S")
        );
        let closed = backend
            .close_visit(&open.id, now, Some(&note))
            .map_err(AttendanceError::Store)?;
        if closed {
            tracing::debug!(person = %person_id, record = %open.id, "closed facility visit");
            let mut record = open;
            record.visit_ended_at = Some(now);
            record.note = Some(note);
            return Ok(record);
        }
        // Lost a race: another client closed this visit between our read
        // and our write. Fall through to the evidence-based path.
        tracing::warn!(person = %person_id, record = %open.id, "open visit was already closed");
    }

    if snapshot.has_joined_today {
        let started = snapshot.earliest_confirmation.unwrap_or(now);
        let record = AttendanceRecord {
            id: RecordId::random(),
            kind: AttendanceKind::Facility,
            session_id: None,
            date: today,
            person_id: person_id.clone(),
            outcome: Outcome::Present,
            confirmed_by: ConfirmedBy::Volunteer,
            confirmed_at: started,
            visit_started_at: Some(started),
            visit_ended_at: Some(now),
            note: Some(format!(
                "Facility check-out reconstructed from session attendance at {}",
                clock.local_now().format("%H:%M:%S")
            )),
        };
        backend.insert(&record).map_err(AttendanceError::Store)?;
        tracing::debug!(person = %person_id, record = %record.id, "reconstructed facility visit");
        return Ok(record);
    }

    Err(AttendanceError::NotEligibleForCheckout)
}

/// Logs attendance for every currently-eligible, not-yet-logged session
/// on today's schedule.
///
/// The fan-out is best-effort: one session's write failure does not
/// block the others, and partial success still reports what was
/// written. Only a pass where every attempted write failed surfaces an
/// error. Calling again immediately logs nothing and reports zero.
pub fn log_eligible_sessions<B, C>(
    backend: &mut B,
    clock: &C,
    person_id: &PersonId,
) -> Result<LogSummary, AttendanceError<<B as AttendanceStore>::Error>>
where
    B: AttendanceStore + PersonDirectory<Error = <B as AttendanceStore>::Error>,
    C: Clock,
{
    lookup(backend, person_id)?;
    let sessions = backend
        .scheduled_sessions(person_id)
        .map_err(AttendanceError::Store)?;
    let today = clock.today();
    let local_now = clock.local_now();
    let eligible: Vec<_> = sessions_on(&sessions, today)
        .into_iter()
        .filter(|s| is_eligible(s, local_now))
        .collect();
    if eligible.is_empty() {
        return Ok(LogSummary::default());
    }

    let ids: Vec<SessionId> = eligible.iter().map(|s| s.session_id.clone()).collect();
    let existing = backend
        .records_for_sessions(person_id, &ids)
        .map_err(AttendanceError::Store)?;
    let logged_ids: HashSet<&SessionId> = existing
        .iter()
        .filter_map(|r| r.session_id.as_ref())
        .collect();

    let now = clock.now();
    let mut summary = LogSummary::default();
    let mut first_error = None;
    for session in eligible
        .iter()
        .filter(|s| !logged_ids.contains(&s.session_id))
    {
        let outcome = compute_outcome(session, local_now);
        let record = AttendanceRecord {
            id: RecordId::random(),
            kind: AttendanceKind::Session,
            session_id: Some(session.session_id.clone()),
            date: today,
            person_id: person_id.clone(),
            outcome,
            confirmed_by: ConfirmedBy::Volunteer,
            confirmed_at: now,
            visit_started_at: None,
            visit_ended_at: None,
            note: Some(format!(
                "Session logged at {}",
                local_now.format("%H:%M:%S")
            )),
        };
        match backend.insert(&record) {
            Ok(()) => {
                summary.logged += 1;
                summary.any_late |= outcome == Outcome::Late;
                tracing::debug!(
                    person = %person_id,
                    session = %session.session_id,
                    %outcome,
                    "logged session attendance"
                );
            }
            Err(error) => {
                tracing::warn!(
                    person = %person_id,
                    session = %session.session_id,
                    %error,
                    "failed to log session attendance"
                );
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
    }

    if summary.logged == 0 {
        if let Some(error) = first_error {
            return Err(AttendanceError::Store(error));
        }
    }
    Ok(summary)
}
