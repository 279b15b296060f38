//! Facility check-in command.

use std::io::Write;

use anyhow::Result;

use vt_core::{Clock, PersonId, check_in};
use vt_store::Database;

use super::fmt_instant;

pub fn run<W: Write, C: Clock>(
    writer: &mut W,
    db: &mut Database,
    clock: &C,
    person: &PersonId,
) -> Result<()> {
    match check_in(db, clock, person) {
        Ok(record) => {
            writeln!(writer, "Checked in at {}", fmt_instant(record.confirmed_at))?;
        }
        Err(err) if err.is_conflict() => {
            writeln!(writer, "Nothing to do: {err}")?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
