//! The smart log command.
//!
//! One invocation either records eligible sessions or toggles facility
//! presence. The outcome is always reported.

use std::io::Write;

use anyhow::Result;

use vt_core::{Clock, PersonId, ReconcileAction, smart_log};
use vt_store::Database;

use super::fmt_instant;

pub fn run<W: Write, C: Clock>(
    writer: &mut W,
    db: &mut Database,
    clock: &C,
    person: &PersonId,
) -> Result<()> {
    match smart_log(db, clock, person) {
        Ok(ReconcileAction::LoggedSessions(summary)) => {
            if summary.any_late {
                writeln!(writer, "Logged {} session(s), arrival was late", summary.logged)?;
            } else {
                writeln!(writer, "Logged {} session(s)", summary.logged)?;
            }
        }
        Ok(ReconcileAction::CheckedIn(record)) => {
            writeln!(
                writer,
                "No sessions to log; checked in at {}",
                fmt_instant(record.confirmed_at)
            )?;
        }
        Ok(ReconcileAction::CheckedOut(record)) => {
            let ended = record.visit_ended_at.unwrap_or(record.confirmed_at);
            writeln!(
                writer,
                "No sessions to log; checked out at {}",
                fmt_instant(ended)
            )?;
        }
        Err(err) if err.is_conflict() => {
            writeln!(writer, "Nothing to do: {err}")?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
