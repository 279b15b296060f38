//! Storage layer for the volunteer tracker.
//!
//! Provides persistence for attendance records, people, and schedules
//! using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send`
//! but not `Sync`. A `Database` instance can be moved between threads
//! but cannot be shared without external synchronization.
//!
//! # Query discipline
//!
//! The attendance table deliberately mirrors a document store that only
//! guarantees single-field indexes: every attendance query filters on
//! one column (`person_id` or `kind`), optionally restricted by a
//! session-id membership list, and all cross-field filtering happens in
//! the caller. Keeping that discipline here means the [`vt_core`]
//! algorithms port unchanged to a backend without composite indexes.
//!
//! # Timestamp format
//!
//! Instants are stored as TEXT in RFC 3339 with millisecond precision
//! (e.g. `2025-06-01T14:10:00.000Z`), so lexicographic ordering matches
//! chronological ordering and values stay human-readable. Calendar days
//! are `YYYY-MM-DD` strings in facility-local time.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use thiserror::Error;

use vt_core::{
    AttendanceRecord, AttendanceStore, Person, PersonDirectory, PersonId, RecordId,
    ScheduledSession, SessionCatalog, SessionDetails, SessionId,
};

/// Maximum number of session ids per membership query, matching the
/// `in`-clause limit of the document store this schema mirrors.
const SESSION_ID_CHUNK: usize = 10;

/// How many facility records the report view fetches at most.
pub const FACILITY_FETCH_LIMIT: usize = 500;

/// Database errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for record {record_id}: {timestamp}")]
    TimestampParse {
        record_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored field holds a value outside the domain model.
    #[error("invalid field for record {record_id}: {message}")]
    InvalidField { record_id: String, message: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized
    /// database. Attendance indexes are single-field only, on purpose.
    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS people (
                id TEXT PRIMARY KEY,
                full_name TEXT NOT NULL,
                total_hours REAL NOT NULL DEFAULT 0,
                total_sessions INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS schedule (
                session_id TEXT NOT NULL,
                person_id TEXT NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT,
                status TEXT NOT NULL DEFAULT 'scheduled',
                PRIMARY KEY (session_id, person_id)
            );

            CREATE INDEX IF NOT EXISTS idx_schedule_person ON schedule(person_id);

            CREATE TABLE IF NOT EXISTS session_catalog (
                session_id TEXT PRIMARY KEY,
                label TEXT,
                location TEXT
            );

            -- Attendance records: kind is 'session' or 'facility'.
            -- session_id is NULL for pure facility visits.
            -- visit_ended_at is NULL while a facility visit is open.
            CREATE TABLE IF NOT EXISTS attendance (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                session_id TEXT,
                date TEXT NOT NULL,
                person_id TEXT NOT NULL,
                outcome TEXT NOT NULL,
                confirmed_by TEXT NOT NULL,
                confirmed_at TEXT NOT NULL,
                visit_started_at TEXT,
                visit_ended_at TEXT,
                note TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_attendance_person ON attendance(person_id);
            CREATE INDEX IF NOT EXISTS idx_attendance_kind ON attendance(kind);
            CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
            ",
        )?;
        Ok(())
    }

    /// Inserts or updates a person, preserving existing totals.
    pub fn upsert_person(&mut self, person: &Person) -> Result<(), StoreError> {
        self.conn.execute(
            "
            INSERT INTO people (id, full_name, total_hours, total_sessions)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET full_name = excluded.full_name
            ",
            params![
                person.id.as_str(),
                person.full_name,
                person.total_hours,
                person.total_sessions,
            ],
        )?;
        Ok(())
    }

    /// Lists all people ordered by id.
    pub fn list_people(&self) -> Result<Vec<Person>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, full_name, total_hours, total_sessions FROM people ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;
        let mut people = Vec::new();
        for row in rows {
            let (id, full_name, total_hours, total_sessions) = row?;
            people.push(Person {
                id: PersonId::new(&id).map_err(|e| StoreError::InvalidField {
                    record_id: id.clone(),
                    message: e.to_string(),
                })?,
                full_name,
                total_hours,
                total_sessions,
            });
        }
        Ok(people)
    }

    /// Adds a session to a person's schedule, replacing any previous
    /// entry for the same (session, person) pair. Catalog metadata is
    /// stored alongside when given.
    pub fn add_scheduled_session(
        &mut self,
        person: &PersonId,
        session: &ScheduledSession,
        label: Option<&str>,
        location: Option<&str>,
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "
            INSERT OR REPLACE INTO schedule (session_id, person_id, date, start_time, end_time, status)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
            params![
                session.session_id.as_str(),
                person.as_str(),
                session.date.to_string(),
                session.start_time,
                session.end_time,
                session.status.as_str(),
            ],
        )?;
        if label.is_some() || location.is_some() {
            tx.execute(
                "
                INSERT INTO session_catalog (session_id, label, location)
                VALUES (?, ?, ?)
                ON CONFLICT(session_id) DO UPDATE SET
                    label = COALESCE(excluded.label, session_catalog.label),
                    location = COALESCE(excluded.location, session_catalog.location)
                ",
                params![session.session_id.as_str(), label, location],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Fetches a bounded set of facility-kind records for the report
    /// view. Single-field filter on `kind`; callers filter by date or
    /// open-visit status in memory.
    pub fn facility_records(&self, limit: usize) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance
            WHERE kind = 'facility'
            ORDER BY confirmed_at DESC
            LIMIT ?
            ",
        ))?;
        let rows = stmt.query_map([bounded(limit)], raw_attendance_row)?;
        collect_records(rows)
    }
}

const ATTENDANCE_COLUMNS: &str = "id, kind, session_id, date, person_id, outcome, \
     confirmed_by, confirmed_at, visit_started_at, visit_ended_at, note";

impl AttendanceStore for Database {
    type Error = StoreError;

    fn recent_for_person(
        &self,
        person: &PersonId,
        limit: usize,
    ) -> Result<Vec<AttendanceRecord>, Self::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance
            WHERE person_id = ?
            ORDER BY confirmed_at DESC
            LIMIT ?
            ",
        ))?;
        let rows = stmt.query_map(params![person.as_str(), bounded(limit)], raw_attendance_row)?;
        collect_records(rows)
    }

    fn records_for_sessions(
        &self,
        person: &PersonId,
        sessions: &[SessionId],
    ) -> Result<Vec<AttendanceRecord>, Self::Error> {
        let mut records = Vec::new();
        for chunk in sessions.chunks(SESSION_ID_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut stmt = self.conn.prepare(&format!(
                "
                SELECT {ATTENDANCE_COLUMNS}
                FROM attendance
                WHERE person_id = ? AND session_id IN ({placeholders})
                ",
            ))?;
            let mut values: Vec<&str> = Vec::with_capacity(chunk.len() + 1);
            values.push(person.as_str());
            values.extend(chunk.iter().map(SessionId::as_str));
            let rows = stmt.query_map(params_from_iter(values), raw_attendance_row)?;
            records.extend(collect_records(rows)?);
        }
        Ok(records)
    }

    fn insert(&mut self, record: &AttendanceRecord) -> Result<(), Self::Error> {
        self.conn.execute(
            &format!(
                "
                INSERT INTO attendance ({ATTENDANCE_COLUMNS})
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            ),
            params![
                record.id.as_str(),
                record.kind.as_str(),
                record.session_id.as_ref().map(SessionId::as_str),
                record.date.to_string(),
                record.person_id.as_str(),
                record.outcome.as_str(),
                record.confirmed_by.as_str(),
                format_timestamp(record.confirmed_at),
                record.visit_started_at.map(format_timestamp),
                record.visit_ended_at.map(format_timestamp),
                record.note,
            ],
        )?;
        Ok(())
    }

    fn close_visit(
        &mut self,
        id: &RecordId,
        ended_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> Result<bool, Self::Error> {
        // The IS NULL guard makes the close conditional: an already
        // closed record is never rewritten.
        let updated = self.conn.execute(
            "
            UPDATE attendance
            SET visit_ended_at = ?, note = COALESCE(?, note)
            WHERE id = ? AND visit_ended_at IS NULL
            ",
            params![format_timestamp(ended_at), note, id.as_str()],
        )?;
        Ok(updated > 0)
    }
}

impl PersonDirectory for Database {
    type Error = StoreError;

    fn person(&self, id: &PersonId) -> Result<Option<Person>, Self::Error> {
        let row = self
            .conn
            .query_row(
                "SELECT full_name, total_hours, total_sessions FROM people WHERE id = ?",
                [id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;
        Ok(row.map(|(full_name, total_hours, total_sessions)| Person {
            id: id.clone(),
            full_name,
            total_hours,
            total_sessions,
        }))
    }

    fn scheduled_sessions(&self, id: &PersonId) -> Result<Vec<ScheduledSession>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "
            SELECT session_id, date, start_time, end_time, status
            FROM schedule
            WHERE person_id = ?
            ORDER BY date ASC, start_time ASC
            ",
        )?;
        let rows = stmt.query_map([id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        let mut sessions = Vec::new();
        for row in rows {
            let (session_id, date, start_time, end_time, status) = row?;
            sessions.push(ScheduledSession {
                session_id: SessionId::new(&session_id).map_err(|e| {
                    StoreError::InvalidField {
                        record_id: session_id.clone(),
                        message: e.to_string(),
                    }
                })?,
                date: parse_date(&date, &session_id)?,
                start_time,
                end_time,
                status: parse_field(&status, &session_id)?,
            });
        }
        Ok(sessions)
    }
}

impl SessionCatalog for Database {
    type Error = StoreError;

    fn resolve(&self, id: &SessionId) -> Result<Option<SessionDetails>, Self::Error> {
        let row = self
            .conn
            .query_row(
                "SELECT label, location FROM session_catalog WHERE session_id = ?",
                [id.as_str()],
                |row| {
                    Ok(SessionDetails {
                        label: row.get(0)?,
                        location: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

/// Raw attendance row before domain conversion.
struct RawAttendance {
    id: String,
    kind: String,
    session_id: Option<String>,
    date: String,
    person_id: String,
    outcome: String,
    confirmed_by: String,
    confirmed_at: String,
    visit_started_at: Option<String>,
    visit_ended_at: Option<String>,
    note: Option<String>,
}

fn raw_attendance_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAttendance> {
    Ok(RawAttendance {
        id: row.get(0)?,
        kind: row.get(1)?,
        session_id: row.get(2)?,
        date: row.get(3)?,
        person_id: row.get(4)?,
        outcome: row.get(5)?,
        confirmed_by: row.get(6)?,
        confirmed_at: row.get(7)?,
        visit_started_at: row.get(8)?,
        visit_ended_at: row.get(9)?,
        note: row.get(10)?,
    })
}

fn collect_records<I>(rows: I) -> Result<Vec<AttendanceRecord>, StoreError>
where
    I: Iterator<Item = rusqlite::Result<RawAttendance>>,
{
    let mut records = Vec::new();
    for row in rows {
        records.push(convert_record(row?)?);
    }
    Ok(records)
}

fn convert_record(raw: RawAttendance) -> Result<AttendanceRecord, StoreError> {
    let confirmed_at = parse_timestamp(&raw.confirmed_at, &raw.id)?;
    let visit_started_at = raw
        .visit_started_at
        .as_deref()
        .map(|ts| parse_timestamp(ts, &raw.id))
        .transpose()?;
    let visit_ended_at = raw
        .visit_ended_at
        .as_deref()
        .map(|ts| parse_timestamp(ts, &raw.id))
        .transpose()?;
    Ok(AttendanceRecord {
        id: RecordId::new(&raw.id).map_err(|e| StoreError::InvalidField {
            record_id: raw.id.clone(),
            message: e.to_string(),
        })?,
        kind: parse_field(&raw.kind, &raw.id)?,
        session_id: raw
            .session_id
            .map(|s| {
                SessionId::new(&s).map_err(|e| StoreError::InvalidField {
                    record_id: raw.id.clone(),
                    message: e.to_string(),
                })
            })
            .transpose()?,
        date: parse_date(&raw.date, &raw.id)?,
        person_id: PersonId::new(&raw.person_id).map_err(|e| StoreError::InvalidField {
            record_id: raw.id.clone(),
            message: e.to_string(),
        })?,
        outcome: parse_field(&raw.outcome, &raw.id)?,
        confirmed_by: parse_field(&raw.confirmed_by, &raw.id)?,
        confirmed_at,
        visit_started_at,
        visit_ended_at,
        note: raw.note,
    })
}

fn parse_field<T>(value: &str, record_id: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|message| StoreError::InvalidField {
        record_id: record_id.to_string(),
        message,
    })
}

fn parse_date(value: &str, record_id: &str) -> Result<NaiveDate, StoreError> {
    value
        .parse()
        .map_err(|e: chrono::ParseError| StoreError::InvalidField {
            record_id: record_id.to_string(),
            message: e.to_string(),
        })
}

fn parse_timestamp(timestamp: &str, record_id: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| StoreError::TimestampParse {
            record_id: record_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn bounded(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vt_core::{
        AttendanceKind, ConfirmedBy, FixedClock, Outcome, SessionStatus, check_in, check_out,
        log_eligible_sessions, presence_snapshot,
    };

    fn person(id: &str) -> Person {
        Person {
            id: PersonId::new(id).unwrap(),
            full_name: format!("Person {id}"),
            total_hours: 12.5,
            total_sessions: 4,
        }
    }

    fn slot(id: &str, date: &str, start: &str, end: Option<&str>) -> ScheduledSession {
        ScheduledSession {
            session_id: SessionId::new(id).unwrap(),
            date: date.parse().unwrap(),
            start_time: start.to_string(),
            end_time: end.map(String::from),
            status: SessionStatus::Scheduled,
        }
    }

    fn record(id: &str, person: &str, kind: AttendanceKind, confirmed_at: &str) -> AttendanceRecord {
        let confirmed_at: DateTime<Utc> = confirmed_at.parse().unwrap();
        AttendanceRecord {
            id: RecordId::new(id).unwrap(),
            kind,
            session_id: None,
            date: confirmed_at.date_naive(),
            person_id: PersonId::new(person).unwrap(),
            outcome: Outcome::Present,
            confirmed_by: ConfirmedBy::Volunteer,
            confirmed_at,
            visit_started_at: Some(confirmed_at),
            visit_ended_at: None,
            note: Some("note".to_string()),
        }
    }

    #[test]
    fn insert_and_read_back_roundtrip() {
        let mut db = Database::open_in_memory().unwrap();
        let original = record("rec-1", "vol-1", AttendanceKind::Facility, "2025-06-01T14:10:00.250Z");
        db.insert(&original).unwrap();

        let fetched = db
            .recent_for_person(&PersonId::new("vol-1").unwrap(), 10)
            .unwrap();
        assert_eq!(fetched, vec![original]);
    }

    #[test]
    fn recent_is_ordered_and_bounded() {
        let mut db = Database::open_in_memory().unwrap();
        for (i, ts) in ["2025-06-01T08:00:00Z", "2025-06-01T09:00:00Z", "2025-06-01T10:00:00Z"]
            .iter()
            .enumerate()
        {
            db.insert(&record(&format!("rec-{i}"), "vol-1", AttendanceKind::Facility, ts))
                .unwrap();
        }
        db.insert(&record("other", "vol-2", AttendanceKind::Facility, "2025-06-01T11:00:00Z"))
            .unwrap();

        let fetched = db
            .recent_for_person(&PersonId::new("vol-1").unwrap(), 2)
            .unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].id.as_str(), "rec-2");
        assert_eq!(fetched[1].id.as_str(), "rec-1");
    }

    #[test]
    fn session_membership_query_chunks_past_the_in_limit() {
        let mut db = Database::open_in_memory().unwrap();
        let person_id = PersonId::new("vol-1").unwrap();
        let mut ids = Vec::new();
        for i in 0..25 {
            let session_id = SessionId::new(format!("slot-{i}")).unwrap();
            let mut r = record(
                &format!("rec-{i}"),
                "vol-1",
                AttendanceKind::Session,
                "2025-06-01T14:00:00Z",
            );
            r.session_id = Some(session_id.clone());
            r.visit_started_at = None;
            db.insert(&r).unwrap();
            ids.push(session_id);
        }

        let fetched = db.records_for_sessions(&person_id, &ids).unwrap();
        assert_eq!(fetched.len(), 25);
    }

    #[test]
    fn close_visit_is_write_once() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert(&record("rec-1", "vol-1", AttendanceKind::Facility, "2025-06-01T09:00:00Z"))
            .unwrap();
        let id = RecordId::new("rec-1").unwrap();
        let first_end: DateTime<Utc> = "2025-06-01T11:00:00Z".parse().unwrap();
        let second_end: DateTime<Utc> = "2025-06-01T12:00:00Z".parse().unwrap();

        assert!(db.close_visit(&id, first_end, Some("done")).unwrap());
        assert!(!db.close_visit(&id, second_end, None).unwrap());

        let fetched = db
            .recent_for_person(&PersonId::new("vol-1").unwrap(), 10)
            .unwrap();
        assert_eq!(fetched[0].visit_ended_at, Some(first_end));
        assert_eq!(fetched[0].note.as_deref(), Some("done"));
    }

    #[test]
    fn duplicate_record_id_is_rejected() {
        let mut db = Database::open_in_memory().unwrap();
        let r = record("rec-1", "vol-1", AttendanceKind::Facility, "2025-06-01T09:00:00Z");
        db.insert(&r).unwrap();
        assert!(matches!(db.insert(&r), Err(StoreError::Sqlite(_))));
    }

    #[test]
    fn directory_roundtrip() {
        let mut db = Database::open_in_memory().unwrap();
        let p = person("vol-1");
        db.upsert_person(&p).unwrap();
        db.add_scheduled_session(
            &p.id,
            &slot("slot-a", "2025-06-01", "14:00", Some("15:00")),
            Some("Garden walk"),
            None,
        )
        .unwrap();

        assert_eq!(db.person(&p.id).unwrap(), Some(p.clone()));
        assert_eq!(db.person(&PersonId::new("ghost").unwrap()).unwrap(), None);

        let sessions = db.scheduled_sessions(&p.id).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start_time, "14:00");

        let details = db
            .resolve(&SessionId::new("slot-a").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(details.label.as_deref(), Some("Garden walk"));
        assert_eq!(details.location, None);
        assert_eq!(db.resolve(&SessionId::new("slot-x").unwrap()).unwrap(), None);
    }

    #[test]
    fn upsert_person_preserves_totals() {
        let mut db = Database::open_in_memory().unwrap();
        let p = person("vol-1");
        db.upsert_person(&p).unwrap();

        // A rename must not clobber the aggregate totals.
        let renamed = Person {
            full_name: "New Name".to_string(),
            total_hours: 0.0,
            total_sessions: 0,
            ..p.clone()
        };
        db.upsert_person(&renamed).unwrap();

        let fetched = db.person(&p.id).unwrap().unwrap();
        assert_eq!(fetched.full_name, "New Name");
        assert!((fetched.total_hours - 12.5).abs() < f64::EPSILON);
        assert_eq!(fetched.total_sessions, 4);
    }

    #[test]
    fn facility_records_excludes_session_kind() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert(&record("rec-1", "vol-1", AttendanceKind::Facility, "2025-06-01T09:00:00Z"))
            .unwrap();
        let mut session = record("rec-2", "vol-1", AttendanceKind::Session, "2025-06-01T10:00:00Z");
        session.session_id = Some(SessionId::new("slot-a").unwrap());
        db.insert(&session).unwrap();

        let fetched = db.facility_records(FACILITY_FETCH_LIMIT).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].kind, AttendanceKind::Facility);
    }

    #[test]
    fn core_operations_run_against_sqlite() {
        // Full check-in/log/check-out flow with the real store.
        let temp = tempfile::tempdir().unwrap();
        let mut db = Database::open(&temp.path().join("vt.db")).unwrap();
        let p = person("vol-1");
        db.upsert_person(&p).unwrap();
        db.add_scheduled_session(
            &p.id,
            &slot("slot-a", "2025-06-01", "14:00", Some("15:00")),
            None,
            None,
        )
        .unwrap();

        let clock = FixedClock::at("2025-06-01T14:10:00".parse().unwrap());
        let summary = log_eligible_sessions(&mut db, &clock, &p.id).unwrap();
        assert_eq!(summary.logged, 1);
        assert!(!summary.any_late);

        check_in(&mut db, &clock, &p.id).unwrap();
        let snap = presence_snapshot(&db, &clock, &p.id).unwrap();
        assert!(snap.checked_in);
        assert!(snap.has_joined_today);

        let later = FixedClock::at("2025-06-01T16:00:00".parse().unwrap());
        let closed = check_out(&mut db, &later, &p.id).unwrap();
        assert!(closed.visit_ended_at.unwrap() >= closed.visit_started_at.unwrap());

        let snap = presence_snapshot(&db, &later, &p.id).unwrap();
        assert!(!snap.checked_in);
    }
}
