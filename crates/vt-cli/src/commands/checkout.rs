//! Facility check-out command.

use std::io::Write;

use anyhow::Result;

use vt_core::{Clock, PersonId, check_out};
use vt_store::Database;

use super::fmt_instant;

pub fn run<W: Write, C: Clock>(
    writer: &mut W,
    db: &mut Database,
    clock: &C,
    person: &PersonId,
) -> Result<()> {
    match check_out(db, clock, person) {
        Ok(record) => match (record.visit_started_at, record.visit_ended_at) {
            (Some(started), Some(ended)) => {
                let minutes = (ended - started).num_minutes().max(0);
                writeln!(
                    writer,
                    "Checked out at {} ({minutes} min)",
                    fmt_instant(ended)
                )?;
            }
            _ => writeln!(writer, "Checked out")?,
        },
        Err(err) if err.is_conflict() => {
            writeln!(writer, "Nothing to do: {err}")?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
