//! Schedule management commands.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDate;

use vt_core::{
    Clock, PersonDirectory, PersonId, ScheduledSession, SessionCatalog, SessionId, SessionStatus,
    parse_clock_time,
};
use vt_store::Database;

#[expect(
    clippy::too_many_arguments,
    reason = "mirrors the flag surface of the subcommand"
)]
pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    person: &PersonId,
    session: &SessionId,
    date: NaiveDate,
    start: &str,
    end: Option<&str>,
    label: Option<&str>,
    location: Option<&str>,
) -> Result<()> {
    if db.person(person)?.is_none() {
        bail!("unknown person: {person}");
    }
    if parse_clock_time(start).is_none() {
        bail!("unrecognized start time: {start:?}");
    }
    if let Some(end) = end {
        if parse_clock_time(end).is_none() {
            writeln!(
                writer,
                "Warning: unrecognized end time {end:?}; eligibility will close one hour after start"
            )?;
        }
    }

    db.add_scheduled_session(
        person,
        &ScheduledSession {
            session_id: session.clone(),
            date,
            start_time: start.to_string(),
            end_time: end.map(String::from),
            status: SessionStatus::Scheduled,
        },
        label,
        location,
    )?;
    writeln!(writer, "Scheduled {session} on {date} at {start}")?;
    Ok(())
}

pub fn upcoming<W: Write, C: Clock>(
    writer: &mut W,
    db: &Database,
    clock: &C,
    person: &PersonId,
) -> Result<()> {
    if db.person(person)?.is_none() {
        bail!("unknown person: {person}");
    }

    let today = clock.today();
    let now = clock.local_now().time();
    let mut sessions: Vec<ScheduledSession> = db
        .scheduled_sessions(person)?
        .into_iter()
        .filter(|s| {
            if s.status != SessionStatus::Scheduled || s.date < today {
                return false;
            }
            if s.date > today {
                return true;
            }
            // Today's sessions drop off once their start time has passed.
            parse_clock_time(&s.start_time).is_none_or(|start| now < start)
        })
        .collect();
    // Sort on the parsed start time so "9:00 AM" lands before "10:00";
    // raw text breaks ties and orders anything unparseable.
    sessions.sort_by(|a, b| {
        (a.date, parse_clock_time(&a.start_time), a.start_time.as_str()).cmp(&(
            b.date,
            parse_clock_time(&b.start_time),
            b.start_time.as_str(),
        ))
    });

    if sessions.is_empty() {
        writeln!(writer, "No upcoming sessions.")?;
        return Ok(());
    }
    for session in sessions {
        let details = db.resolve(&session.session_id)?.unwrap_or_default();
        let name = details.label.as_deref().unwrap_or(session.session_id.as_str());
        let place = details
            .location
            .as_deref()
            .map(|l| format!(" @ {l}"))
            .unwrap_or_default();
        let span = match &session.end_time {
            Some(end) => format!("{}-{end}", session.start_time),
            None => format!("{}-?", session.start_time),
        };
        writeln!(writer, "- {} {span} {name}{place}", session.date)?;
    }
    Ok(())
}
