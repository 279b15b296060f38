//! Facility attendance report.
//!
//! Lists facility visits either for one calendar day or restricted to
//! visits that are still open. Works from a bounded fetch of
//! facility-kind records, filtered in memory.

use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use vt_core::{Clock, PersonDirectory, PersonId};
use vt_store::{Database, FACILITY_FETCH_LIMIT};

use super::fmt_instant;

#[derive(Debug, Serialize)]
struct VisitRow {
    person_id: String,
    name: String,
    date: NaiveDate,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    minutes: Option<i64>,
    note: Option<String>,
}

pub fn run<W: Write, C: Clock>(
    writer: &mut W,
    db: &Database,
    clock: &C,
    active: bool,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let day = date.unwrap_or_else(|| clock.today());
    let records = db.facility_records(FACILITY_FETCH_LIMIT)?;

    let mut names: HashMap<PersonId, String> = HashMap::new();
    let mut rows = Vec::new();
    for record in records {
        let keep = if active {
            record.is_open_visit()
        } else {
            record.date == day
        };
        if !keep {
            continue;
        }
        let name = match names.get(&record.person_id) {
            Some(name) => name.clone(),
            None => {
                let name = db
                    .person(&record.person_id)?
                    .map_or_else(|| record.person_id.to_string(), |p| p.full_name);
                names.insert(record.person_id.clone(), name.clone());
                name
            }
        };
        rows.push(VisitRow {
            person_id: record.person_id.to_string(),
            name,
            date: record.date,
            started_at: record.visit_started_at,
            ended_at: record.visit_ended_at,
            minutes: record
                .visit_started_at
                .zip(record.visit_ended_at)
                .map(|(started, ended)| (ended - started).num_minutes().max(0)),
            note: record.note,
        });
    }

    if json {
        serde_json::to_writer_pretty(&mut *writer, &rows)?;
        writeln!(writer)?;
        return Ok(());
    }

    if active {
        writeln!(writer, "Open facility visits:")?;
    } else {
        writeln!(writer, "Facility visits on {day}:")?;
    }
    if rows.is_empty() {
        writeln!(writer, "No visits found.")?;
        return Ok(());
    }
    for row in &rows {
        let started = row.started_at.map_or_else(|| "?".to_string(), fmt_instant);
        match (row.ended_at, row.minutes) {
            (Some(ended), Some(minutes)) => writeln!(
                writer,
                "- {}: {started} to {} ({minutes} min)",
                row.name,
                fmt_instant(ended)
            )?,
            _ => writeln!(writer, "- {}: {started}, still in", row.name)?,
        }
    }

    Ok(())
}
