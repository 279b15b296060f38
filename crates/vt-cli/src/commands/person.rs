//! Volunteer directory commands.

use std::io::Write;

use anyhow::Result;

use vt_core::{Person, PersonDirectory, PersonId};
use vt_store::Database;

pub fn add<W: Write>(writer: &mut W, db: &mut Database, id: &PersonId, name: &str) -> Result<()> {
    let renamed = db.person(id)?.is_some();
    db.upsert_person(&Person {
        id: id.clone(),
        full_name: name.to_string(),
        total_hours: 0.0,
        total_sessions: 0,
    })?;
    if renamed {
        writeln!(writer, "Updated {id}")?;
    } else {
        writeln!(writer, "Registered {id}")?;
    }
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let people = db.list_people()?;
    if people.is_empty() {
        writeln!(writer, "No volunteers registered.")?;
        return Ok(());
    }
    for person in people {
        writeln!(
            writer,
            "- {}: {} ({} h, {} sessions)",
            person.id, person.full_name, person.total_hours, person.total_sessions
        )?;
    }
    Ok(())
}
