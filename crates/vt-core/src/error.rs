//! Error taxonomy for the reconciliation core.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::PersonId;

/// Errors from the public attendance operations.
///
/// `Store` carries the backing store's own error (unreachable, timed
/// out) so callers can retry explicitly. The state-conflict variants are
/// clear no-ops: nothing was written. Duplicate open visits are not an
/// error at all; the resolver heals them and logs a warning.
#[derive(Debug, Error)]
pub enum AttendanceError<E> {
    /// The person id is not in the directory.
    #[error("unknown person: {0}")]
    UnknownPerson(PersonId),

    /// An open facility visit already exists.
    #[error("already checked in since {since}")]
    AlreadyCheckedIn { since: DateTime<Utc> },

    /// No open visit and no session attendance today to close against.
    #[error("not eligible for checkout: no open visit or session attendance today")]
    NotEligibleForCheckout,

    /// The backing store failed; the operation may be retried.
    #[error("attendance store error: {0}")]
    Store(#[source] E),
}

impl<E> AttendanceError<E> {
    /// Whether this error is a state conflict (a no-op, not a failure).
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyCheckedIn { .. } | Self::NotEligibleForCheckout
        )
    }
}
