//! In-memory store and fixtures shared by the core unit tests.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::record::{AttendanceKind, AttendanceRecord, ConfirmedBy, Outcome};
use crate::schedule::{Person, ScheduledSession, SessionStatus};
use crate::store::{AttendanceStore, PersonDirectory};
use crate::types::{PersonId, RecordId, SessionId};

#[derive(Debug, Error)]
#[error("memory store unavailable")]
pub struct MemError;

/// Simple in-memory backend with switchable failure modes.
#[derive(Debug, Default)]
pub struct MemStore {
    pub records: Vec<AttendanceRecord>,
    pub people: Vec<Person>,
    pub sessions: Vec<ScheduledSession>,
    pub fail_reads: bool,
    pub fail_session_query: bool,
    /// Fails inserts of session records for this session id only.
    pub fail_insert_for: Option<SessionId>,
    /// Makes `close_visit` report the record as already closed, as if a
    /// concurrent client had closed it first.
    pub refuse_close: bool,
}

impl MemStore {
    pub fn with_person(id: &str) -> Self {
        Self {
            people: vec![Person {
                id: person_id(id),
                full_name: format!("Person {id}"),
                total_hours: 0.0,
                total_sessions: 0,
            }],
            ..Self::default()
        }
    }
}

impl AttendanceStore for MemStore {
    type Error = MemError;

    fn recent_for_person(
        &self,
        person: &PersonId,
        limit: usize,
    ) -> Result<Vec<AttendanceRecord>, Self::Error> {
        if self.fail_reads {
            return Err(MemError);
        }
        let mut records: Vec<AttendanceRecord> = self
            .records
            .iter()
            .filter(|r| &r.person_id == person)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.confirmed_at.cmp(&a.confirmed_at));
        records.truncate(limit);
        Ok(records)
    }

    fn records_for_sessions(
        &self,
        person: &PersonId,
        sessions: &[SessionId],
    ) -> Result<Vec<AttendanceRecord>, Self::Error> {
        if self.fail_reads || self.fail_session_query {
            return Err(MemError);
        }
        Ok(self
            .records
            .iter()
            .filter(|r| {
                &r.person_id == person
                    && r.session_id
                        .as_ref()
                        .is_some_and(|id| sessions.contains(id))
            })
            .cloned()
            .collect())
    }

    fn insert(&mut self, record: &AttendanceRecord) -> Result<(), Self::Error> {
        if self.fail_insert_for.is_some() && record.session_id == self.fail_insert_for {
            return Err(MemError);
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn close_visit(
        &mut self,
        id: &RecordId,
        ended_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> Result<bool, Self::Error> {
        if self.refuse_close {
            return Ok(false);
        }
        match self
            .records
            .iter_mut()
            .find(|r| &r.id == id && r.visit_ended_at.is_none())
        {
            Some(record) => {
                record.visit_ended_at = Some(ended_at);
                if let Some(note) = note {
                    record.note = Some(note.to_string());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl PersonDirectory for MemStore {
    type Error = MemError;

    fn person(&self, id: &PersonId) -> Result<Option<Person>, Self::Error> {
        Ok(self.people.iter().find(|p| &p.id == id).cloned())
    }

    fn scheduled_sessions(&self, id: &PersonId) -> Result<Vec<ScheduledSession>, Self::Error> {
        if self.people.iter().any(|p| &p.id == id) {
            Ok(self.sessions.clone())
        } else {
            Ok(Vec::new())
        }
    }
}

pub fn person_id(id: &str) -> PersonId {
    PersonId::new(id).unwrap()
}

pub fn slot(id: &str, date: &str, start: &str, end: Option<&str>) -> ScheduledSession {
    ScheduledSession {
        session_id: SessionId::new(id).unwrap(),
        date: date.parse().unwrap(),
        start_time: start.to_string(),
        end_time: end.map(String::from),
        status: SessionStatus::Scheduled,
    }
}

pub fn facility_record(
    person: &str,
    date: &str,
    confirmed_at: &str,
    ended_at: Option<&str>,
) -> AttendanceRecord {
    let confirmed_at: DateTime<Utc> = confirmed_at.parse().unwrap();
    AttendanceRecord {
        id: RecordId::random(),
        kind: AttendanceKind::Facility,
        session_id: None,
        date: date.parse().unwrap(),
        person_id: person_id(person),
        outcome: Outcome::Present,
        confirmed_by: ConfirmedBy::Volunteer,
        confirmed_at,
        visit_started_at: Some(confirmed_at),
        visit_ended_at: ended_at.map(|e| e.parse().unwrap()),
        note: None,
    }
}

pub fn session_record(
    person: &str,
    session: &str,
    date: &str,
    confirmed_at: &str,
) -> AttendanceRecord {
    AttendanceRecord {
        id: RecordId::random(),
        kind: AttendanceKind::Session,
        session_id: Some(SessionId::new(session).unwrap()),
        date: date.parse().unwrap(),
        person_id: person_id(person),
        outcome: Outcome::Present,
        confirmed_by: ConfirmedBy::Volunteer,
        confirmed_at: confirmed_at.parse().unwrap(),
        visit_started_at: None,
        visit_ended_at: None,
        note: None,
    }
}
