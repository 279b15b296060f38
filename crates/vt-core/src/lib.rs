//! Core domain logic for the volunteer tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Time window evaluation: eligibility and on-time/late outcomes for
//!   scheduled sessions
//! - Presence resolution: deriving facility presence from attendance
//!   records without composite store indexes
//! - Attendance writing: idempotent check-in, check-out, and session
//!   logging against a shared record store
//! - Reconciliation: the single "smart log" entry point

mod error;
pub mod presence;
pub mod reconcile;
pub mod record;
pub mod schedule;
pub mod store;
pub mod types;
pub mod window;
pub mod writer;

pub use error::AttendanceError;
pub use presence::{PresenceSnapshot, presence_snapshot};
pub use reconcile::{ReconcileAction, smart_log};
pub use record::{AttendanceKind, AttendanceRecord, ConfirmedBy, Outcome};
pub use schedule::{Person, ScheduledSession, SessionDetails, SessionStatus};
pub use store::{AttendanceStore, Clock, FixedClock, PersonDirectory, SessionCatalog, SystemClock};
pub use types::{PersonId, RecordId, SessionId, ValidationError};
pub use window::{compute_outcome, is_eligible, parse_clock_time};
pub use writer::{LogSummary, check_in, check_out, log_eligible_sessions};

#[cfg(test)]
pub(crate) mod testutil;
