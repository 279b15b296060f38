//! Status command showing presence and today's schedule.

use std::io::Write;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::Serialize;

use vt_core::{
    Clock, PersonDirectory, PersonId, SessionCatalog, is_eligible, presence_snapshot,
    schedule::sessions_on,
};
use vt_store::Database;

use super::fmt_instant;

#[derive(Debug, Serialize)]
struct StatusReport {
    person_id: String,
    name: String,
    total_hours: f64,
    total_sessions: i64,
    checked_in: bool,
    checked_in_since: Option<DateTime<Utc>>,
    has_joined_today: bool,
    sessions_today: Vec<SessionLine>,
}

#[derive(Debug, Serialize)]
struct SessionLine {
    session_id: String,
    label: Option<String>,
    start_time: String,
    end_time: Option<String>,
    eligible_now: bool,
}

pub fn run<W: Write, C: Clock>(
    writer: &mut W,
    db: &Database,
    clock: &C,
    person: &PersonId,
    json: bool,
) -> Result<()> {
    let snapshot = presence_snapshot(db, clock, person)?;
    let record = db
        .person(person)?
        .ok_or_else(|| anyhow!("unknown person: {person}"))?;

    let sessions = db.scheduled_sessions(person)?;
    let mut lines = Vec::new();
    for session in sessions_on(&sessions, clock.today()) {
        let details = db.resolve(&session.session_id)?.unwrap_or_default();
        lines.push(SessionLine {
            eligible_now: is_eligible(&session, clock.local_now()),
            session_id: session.session_id.to_string(),
            label: details.label,
            start_time: session.start_time,
            end_time: session.end_time,
        });
    }

    let report = StatusReport {
        person_id: record.id.to_string(),
        name: record.full_name,
        total_hours: record.total_hours,
        total_sessions: record.total_sessions,
        checked_in: snapshot.checked_in,
        checked_in_since: snapshot.open_record.and_then(|r| r.visit_started_at),
        has_joined_today: snapshot.has_joined_today,
        sessions_today: lines,
    };

    if json {
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "{} ({})", report.name, report.person_id)?;
    writeln!(
        writer,
        "Totals: {} h over {} sessions",
        report.total_hours, report.total_sessions
    )?;
    match report.checked_in_since {
        Some(since) if report.checked_in => {
            writeln!(writer, "Checked in since {}", fmt_instant(since))?;
        }
        _ => writeln!(writer, "Not checked in")?,
    }

    if report.sessions_today.is_empty() {
        writeln!(writer, "No sessions scheduled today.")?;
        return Ok(());
    }

    writeln!(writer, "Sessions today:")?;
    for line in &report.sessions_today {
        let span = match &line.end_time {
            Some(end) => format!("{}-{end}", line.start_time),
            None => format!("{}-?", line.start_time),
        };
        let name = line.label.as_deref().unwrap_or(&line.session_id);
        let marker = if line.eligible_now {
            " [eligible now]"
        } else {
            ""
        };
        writeln!(writer, "- {span} {name}{marker}")?;
    }

    Ok(())
}
