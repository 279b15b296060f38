//! CLI subcommand implementations.

pub mod attendance;
pub mod checkin;
pub mod checkout;
pub mod log;
pub mod person;
pub mod schedule;
pub mod status;

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats an instant for human-readable output.
fn fmt_instant(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
