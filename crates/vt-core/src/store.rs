//! Seams to the outside world: record store, directory, catalog, clock.
//!
//! # Store contract
//!
//! The attendance store is shared across many independent client
//! instances and cannot be assumed to provide multi-field composite
//! indexes. Implementations must therefore answer every query here from
//! a single-field filter (plus, for [`AttendanceStore::records_for_sessions`],
//! an id-membership restriction); all cross-field filtering happens in
//! memory on the caller's side. Reads that fail must return an error,
//! never an empty default, so callers can tell "confirmed absent" from
//! "unknown".

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::record::AttendanceRecord;
use crate::schedule::{Person, ScheduledSession, SessionDetails};
use crate::types::{PersonId, RecordId, SessionId};

/// How many recent records to fetch per person when resolving presence.
///
/// Large enough to cover any plausible single-day history; the actual
/// filtering (kind, date, open visit) happens client-side.
pub const RECENT_FETCH_LIMIT: usize = 200;

/// The shared attendance record store.
///
/// Writes are restricted to two shapes: insert a new record, or set the
/// visit end on an open record. Outcomes are never updated and records
/// are never deleted.
pub trait AttendanceStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches a bounded recent window of one person's records, most
    /// recently confirmed first.
    fn recent_for_person(
        &self,
        person: &PersonId,
        limit: usize,
    ) -> Result<Vec<AttendanceRecord>, Self::Error>;

    /// Fetches one person's records restricted to the given session ids.
    fn records_for_sessions(
        &self,
        person: &PersonId,
        sessions: &[SessionId],
    ) -> Result<Vec<AttendanceRecord>, Self::Error>;

    /// Inserts a new record.
    fn insert(&mut self, record: &AttendanceRecord) -> Result<(), Self::Error>;

    /// Sets the visit end on an open record, replacing its note when one
    /// is given. Returns `false` if the record is missing or was already
    /// closed, in which case nothing is written.
    fn close_visit(
        &mut self,
        id: &RecordId,
        ended_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> Result<bool, Self::Error>;
}

/// Read-only view of people and their schedules.
pub trait PersonDirectory {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Looks up a person by id.
    fn person(&self, id: &PersonId) -> Result<Option<Person>, Self::Error>;

    /// All scheduled sessions for a person, past and future.
    fn scheduled_sessions(&self, id: &PersonId) -> Result<Vec<ScheduledSession>, Self::Error>;
}

/// Optional display metadata for sessions.
///
/// Callers substitute defaults when a session has no catalog entry.
pub trait SessionCatalog {
    type Error: std::error::Error + Send + Sync + 'static;

    fn resolve(&self, id: &SessionId) -> Result<Option<SessionDetails>, Self::Error>;
}

/// Source of the current time.
///
/// Injected everywhere a decision depends on "now" so the reconciliation
/// logic stays deterministic under test.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current facility-local wall-clock time.
    fn local_now(&self) -> NaiveDateTime;

    /// The current facility-local calendar day.
    fn today(&self) -> NaiveDate {
        self.local_now().date()
    }
}

/// Clock backed by the system time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a fixed local wall-clock time.
///
/// The UTC instant is derived by reading the local time as UTC, which
/// keeps instants and wall-clock comparisons consistent within a test.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    local: NaiveDateTime,
}

impl FixedClock {
    #[must_use]
    pub const fn at(local: NaiveDateTime) -> Self {
        Self { local }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.local)
    }

    fn local_now(&self) -> NaiveDateTime {
        self.local
    }
}
