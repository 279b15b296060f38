//! Time window evaluation for scheduled sessions.
//!
//! Pure functions, no I/O. Attendance may be logged for a session while
//! the current instant lies within one hour of its scheduled bounds;
//! arriving more than an hour after the start yields a `Late` outcome.
//!
//! All computation happens in facility-local wall-clock time on the
//! session's own calendar day.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::record::Outcome;
use crate::schedule::ScheduledSession;

/// Margin on both sides of the scheduled bounds, in minutes.
const ELIGIBILITY_MARGIN_MIN: i64 = 60;

/// Grace period after the scheduled start before an outcome turns late,
/// in minutes.
const LATE_GRACE_MIN: i64 = 60;

/// Parses a clock-time string from the schedule.
///
/// Accepts 24-hour (`"14:00"`, `"14:00:30"`) and 12-hour (`"2:00 PM"`,
/// `"2:00pm"`) forms. Returns `None` for anything else; callers treat
/// that as "no usable time" rather than an error.
#[must_use]
pub fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(text, format) {
            return Some(time);
        }
    }
    // 12-hour forms; normalize case so "pm" and "PM" both parse.
    let upper = text.to_uppercase();
    for format in ["%I:%M:%S %p", "%I:%M %p", "%I:%M%p", "%I %p", "%I%p"] {
        if let Ok(time) = NaiveTime::parse_from_str(&upper, format) {
            return Some(time);
        }
    }
    None
}

/// Scheduled start of the session as a local datetime, if parseable.
fn session_start(session: &ScheduledSession) -> Option<NaiveDateTime> {
    parse_clock_time(&session.start_time).map(|t| session.date.and_time(t))
}

/// Scheduled end of the session as a local datetime, if present and parseable.
fn session_end(session: &ScheduledSession) -> Option<NaiveDateTime> {
    session
        .end_time
        .as_deref()
        .and_then(parse_clock_time)
        .map(|t| session.date.and_time(t))
}

/// Whether attendance may be logged for `session` at local instant `now`.
///
/// True iff `now` lies in `[start - 1h, end + 1h]` on the session's own
/// date. A missing or unparseable end time narrows the window to
/// `[start - 1h, start + 1h]`. A malformed start time fails closed: the
/// session is simply never eligible.
#[must_use]
pub fn is_eligible(session: &ScheduledSession, now: NaiveDateTime) -> bool {
    let Some(start) = session_start(session) else {
        return false;
    };
    let margin = Duration::minutes(ELIGIBILITY_MARGIN_MIN);
    let window_end = session_end(session).unwrap_or(start) + margin;
    now >= start - margin && now <= window_end
}

/// Outcome for a session logged at local instant `now`.
///
/// `Late` iff `now` is strictly more than the grace period past the
/// scheduled start; the boundary instant itself is `Present`. An
/// unparseable start (only reachable for sessions that were never
/// eligible) defaults to `Present`.
#[must_use]
pub fn compute_outcome(session: &ScheduledSession, now: NaiveDateTime) -> Outcome {
    let Some(start) = session_start(session) else {
        return Outcome::Present;
    };
    if now > start + Duration::minutes(LATE_GRACE_MIN) {
        Outcome::Late
    } else {
        Outcome::Present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::SessionStatus;
    use crate::types::SessionId;
    use chrono::NaiveDate;

    fn session(start: &str, end: Option<&str>) -> ScheduledSession {
        ScheduledSession {
            session_id: SessionId::new("slot-1").unwrap(),
            date: date(),
            start_time: start.to_string(),
            end_time: end.map(String::from),
            status: SessionStatus::Scheduled,
        }
    }

    fn date() -> NaiveDate {
        "2025-06-01".parse().unwrap()
    }

    fn at(time: &str) -> NaiveDateTime {
        date().and_time(time.parse().unwrap())
    }

    #[test]
    fn eligible_exactly_on_window_bounds() {
        let s = session("14:00", Some("15:00"));
        // Window is [13:00, 16:00], inclusive at both ends.
        assert!(!is_eligible(&s, at("12:59:59")));
        assert!(is_eligible(&s, at("13:00:00")));
        assert!(is_eligible(&s, at("14:10:00")));
        assert!(is_eligible(&s, at("16:00:00")));
        assert!(!is_eligible(&s, at("16:00:01")));
    }

    #[test]
    fn missing_end_narrows_to_start_window() {
        let s = session("14:00", None);
        assert!(is_eligible(&s, at("13:00:00")));
        assert!(is_eligible(&s, at("15:00:00")));
        assert!(!is_eligible(&s, at("15:00:01")));
    }

    #[test]
    fn unparseable_end_narrows_to_start_window() {
        let s = session("14:00", Some("whenever"));
        assert!(is_eligible(&s, at("15:00:00")));
        assert!(!is_eligible(&s, at("15:30:00")));
    }

    #[test]
    fn malformed_start_fails_closed() {
        let s = session("half past two", Some("15:00"));
        assert!(!is_eligible(&s, at("14:00:00")));

        let s = session("", None);
        assert!(!is_eligible(&s, at("14:00:00")));
    }

    #[test]
    fn wrong_day_is_not_eligible() {
        let mut s = session("14:00", Some("15:00"));
        s.date = "2025-06-02".parse().unwrap();
        assert!(!is_eligible(&s, at("14:10:00")));
    }

    #[test]
    fn outcome_boundary_is_present() {
        let s = session("14:00", Some("15:00"));
        assert_eq!(compute_outcome(&s, at("14:10:00")), Outcome::Present);
        // Exactly one hour after the start is still on time.
        assert_eq!(compute_outcome(&s, at("15:00:00")), Outcome::Present);
        assert_eq!(compute_outcome(&s, at("15:00:01")), Outcome::Late);
    }

    #[test]
    fn late_arrival_within_window() {
        // 14:00-15:00 session: 15:45 is still inside the window (ends
        // 16:00) but 1h45m past the start, so the outcome is late.
        let s = session("14:00", Some("15:00"));
        assert!(is_eligible(&s, at("15:45:00")));
        assert_eq!(compute_outcome(&s, at("15:45:00")), Outcome::Late);
        // 16:30 is past the window entirely.
        assert!(!is_eligible(&s, at("16:30:00")));
    }

    #[test]
    fn parses_twelve_hour_times() {
        assert_eq!(parse_clock_time("2:00 PM"), "14:00".parse().ok());
        assert_eq!(parse_clock_time("2:00pm"), "14:00".parse().ok());
        assert_eq!(parse_clock_time("12:00 AM"), "00:00".parse().ok());
        assert_eq!(parse_clock_time("12:30 PM"), "12:30".parse().ok());
    }

    #[test]
    fn parses_twenty_four_hour_times() {
        assert_eq!(parse_clock_time("14:00"), "14:00".parse().ok());
        assert_eq!(parse_clock_time(" 09:15 "), "09:15".parse().ok());
        assert_eq!(parse_clock_time("23:59:59"), "23:59:59".parse().ok());
    }

    #[test]
    fn rejects_garbage_times() {
        assert_eq!(parse_clock_time(""), None);
        assert_eq!(parse_clock_time("25:00"), None);
        assert_eq!(parse_clock_time("noonish"), None);
        assert_eq!(parse_clock_time("14"), None);
    }

    #[test]
    fn twelve_hour_session_times_evaluate() {
        let s = session("2:00 PM", Some("3:00 PM"));
        assert!(is_eligible(&s, at("14:10:00")));
        assert_eq!(compute_outcome(&s, at("15:45:00")), Outcome::Late);
    }
}
